//! Error types for the content engine.

use thiserror::Error;

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors returned while resolving a content request.
///
/// The `Display` output of every variant is the message shown to clients.
/// `Internal` keeps its cause out of `Display`; use [`ResolveError::detail`]
/// for logging.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid model")]
    InvalidModel,

    #[error("Invalid platform")]
    InvalidPlatform,

    #[error("Invalid tone")]
    InvalidTone,

    #[error("{label} API key required")]
    MissingCredential { label: String },

    #[error("API key usage exceeded. Please provide your own {label} API key to continue.")]
    QuotaExceeded { label: String },

    #[error("Failed to generate content")]
    Internal(String),
}

impl ResolveError {
    /// Create an internal error from any displayable cause.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        Self::Internal(cause.to_string())
    }

    /// Server-side detail for logging. Never sent to clients.
    pub fn detail(&self) -> String {
        match self {
            Self::Internal(detail) => detail.clone(),
            other => other.to_string(),
        }
    }

    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidModel => "invalid_model",
            Self::InvalidPlatform => "invalid_platform",
            Self::InvalidTone => "invalid_tone",
            Self::MissingCredential { .. } => "missing_credential",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<ProviderError> for ResolveError {
    fn from(error: ProviderError) -> Self {
        Self::Internal(error.to_string())
    }
}

/// Errors raised by a generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider {provider} failed: {message}")]
    Failed { provider: String, message: String },

    #[error("Provider timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Errors raised while loading catalog configuration.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse {var}: {source}")]
    Parse {
        var: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate {table} entry: {value}")]
    Duplicate { table: &'static str, value: String },
}
