//! Generation provider capability.
//!
//! The resolver never talks to a backend directly. It looks up the provider
//! registered for the requested model key and hands it a fully validated
//! [`GenerationRequest`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProviderError;

/// Input handed to a provider after validation.
#[derive(Clone)]
pub struct GenerationRequest {
    pub api_key: String,
    pub prompt: String,
    pub model_key: String,
    pub model_label: String,
    pub platform: String,
    pub tone: String,
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("api_key", &"<redacted>")
            .field("prompt", &self.prompt)
            .field("model_key", &self.model_key)
            .field("platform", &self.platform)
            .field("tone", &self.tone)
            .finish()
    }
}

/// Outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Generated text.
    Text(String),
    /// The credential's usage allowance is exhausted.
    UsageExceeded,
}

/// A content-generation backend.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Generate content for a validated request.
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError>;
}

/// Deterministic stand-in used until a real backend is wired up.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderProvider;

impl PlaceholderProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationProvider for PlaceholderProvider {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError> {
        Ok(Generation::Text(format!(
            "AI-generated {} for {} using {} (tone: {})",
            request.prompt, request.platform, request.model_label, request.tone
        )))
    }
}

/// Providers keyed by model key, with a fallback for unregistered keys.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn GenerationProvider>>,
    fallback: Arc<dyn GenerationProvider>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("providers", &keys)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(Arc::new(PlaceholderProvider::new()))
    }
}

impl ProviderRegistry {
    pub fn new(fallback: Arc<dyn GenerationProvider>) -> Self {
        Self {
            providers: HashMap::new(),
            fallback,
        }
    }

    /// Register a provider for a model key.
    pub fn register(
        mut self,
        model_key: impl Into<String>,
        provider: Arc<dyn GenerationProvider>,
    ) -> Self {
        self.providers.insert(model_key.into(), provider);
        self
    }

    /// Provider for a model key, or the fallback.
    pub fn get(&self, model_key: &str) -> Arc<dyn GenerationProvider> {
        self.providers
            .get(model_key)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }
}
