//! REST API routes and handlers.

mod catalog;
mod content;
mod health;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub use types::{HealthResponse, ModelSummary, RootResponse, StatusResponse};

/// Create the API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        // Service info
        .route("/api", get(health::root))
        .route("/api/", get(health::root))
        .route("/api/status", get(health::status))
        // Content generation
        .route("/api/generate-content", post(content::generate_content))
        // Reference tables
        .route("/api/platforms", get(catalog::list_platforms))
        .route("/api/tones", get(catalog::list_tones))
        .route("/api/models", get(catalog::list_models))
        // Health
        .route("/health", get(health::health_check))
}
