//! Service info and health endpoints.

use axum::Json;

use super::types::{HealthResponse, RootResponse, StatusResponse};

/// API root.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Like Follow Social Media Backend API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/docs".to_string(),
    })
}

/// Backend status with a fresh id and timestamp.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::now())
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
