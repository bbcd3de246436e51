//! Error types for the app server.
//!
//! Every error renders as `{"error": "<message>"}`. Internal causes are
//! logged here and replaced with a generic message.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use likefollow_engine::ResolveError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message returned for any internal failure.
pub const INTERNAL_MESSAGE: &str = "Failed to generate content";

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Content request was rejected or failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Request body could not be parsed.
    #[error("{0}")]
    InvalidBody(String),

    /// Unsupported request content type.
    #[error("Unsupported content type: {0}")]
    UnsupportedMediaType(String),

    /// Payload too large.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Resolve(e) => match e {
                ResolveError::InvalidModel
                | ResolveError::InvalidPlatform
                | ResolveError::InvalidTone
                | ResolveError::MissingCredential { .. } => StatusCode::BAD_REQUEST,
                ResolveError::QuotaExceeded { .. } => StatusCode::PAYMENT_REQUIRED,
                ResolveError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Resolve(e) => e.error_code(),
            Self::InvalidBody(_) => "invalid_body",
            Self::UnsupportedMediaType(_) => "unsupported_media_type",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Timeout => "timeout",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Message safe to show to clients.
    pub fn client_message(&self) -> String {
        match self {
            Self::Resolve(e) => e.to_string(),
            Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            let detail = match &self {
                Self::Resolve(e) => e.detail(),
                other => other.to_string(),
            };
            error!(code = self.error_code(), "Error generating content: {}", detail);
        }

        let body = ErrorResponse {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for the app server.
pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(e) => Self::UnsupportedMediaType(e.body_text()),
            other => Self::InvalidBody(other.body_text()),
        }
    }
}
