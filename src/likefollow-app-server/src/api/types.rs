//! API request and response types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Service info
// ============================================================================

/// API root response.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub docs: String,
}

/// Backend status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusResponse {
    pub fn now() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message: "Backend is running".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

// ============================================================================
// Reference tables
// ============================================================================

/// Model entry as exposed to clients. Never carries the key itself.
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub key: String,
    pub label: String,
    /// Whether this is the model used when a request names none.
    pub default: bool,
    /// Whether the server holds a key for this model.
    pub has_api_key: bool,
}
