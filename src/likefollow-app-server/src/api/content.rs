//! Content generation endpoint.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use likefollow_engine::{ContentRequest, ContentResult};
use tracing::debug;

use crate::error::AppResult;
use crate::state::AppState;

/// Generate social media content for a platform, tone and model.
pub async fn generate_content(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> AppResult<Json<ContentResult>> {
    let Json(request) = payload?;
    debug!(?request, "Generate content request");

    let result = state.resolver.resolve(request).await?;
    Ok(Json(result))
}
