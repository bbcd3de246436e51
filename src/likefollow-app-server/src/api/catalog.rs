//! Reference table endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use likefollow_engine::{Platform, Tone};

use crate::state::AppState;

use super::types::ModelSummary;

/// List platforms with their effective character limits.
pub async fn list_platforms(State(state): State<Arc<AppState>>) -> Json<Vec<Platform>> {
    let platforms = state
        .resolver
        .catalog()
        .platforms()
        .iter()
        .map(|p| Platform {
            character_limit: Some(p.effective_limit()),
            ..p.clone()
        })
        .collect();
    Json(platforms)
}

/// List tones.
pub async fn list_tones(State(state): State<Arc<AppState>>) -> Json<Vec<Tone>> {
    Json(state.resolver.catalog().tones().to_vec())
}

/// List models and whether the server holds a key for each.
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<Vec<ModelSummary>> {
    let catalog = state.resolver.catalog();
    let credentials = state.resolver.credentials();

    Json(
        catalog
            .models()
            .iter()
            .map(|m| ModelSummary {
                key: m.key.clone(),
                label: m.label.clone(),
                default: m.key == catalog.default_model_key(),
                has_api_key: credentials.has(&m.key),
            })
            .collect(),
    )
}
