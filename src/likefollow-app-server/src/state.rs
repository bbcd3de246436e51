//! Application state shared across request handlers.

use likefollow_engine::{Catalog, ContentResolver, CredentialStore, ProviderRegistry};
use tracing::info;

use crate::config::ServerConfig;

/// Application state. Read-only after construction.
#[derive(Debug)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Content request resolver.
    pub resolver: ContentResolver,
}

impl AppState {
    /// Build state from configuration, resolving credentials from the process
    /// environment and using the placeholder provider for every model.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let credentials = CredentialStore::from_env(&config.catalog.models);
        Self::with_parts(config, credentials, ProviderRegistry::default())
    }

    /// Build state with explicit credentials and providers.
    pub fn with_parts(
        config: ServerConfig,
        credentials: CredentialStore,
        providers: ProviderRegistry,
    ) -> anyhow::Result<Self> {
        let catalog = Catalog::new(config.catalog.clone())?;
        info!(
            platforms = catalog.platforms().len(),
            tones = catalog.tones().len(),
            models = catalog.models().len(),
            default_model = catalog.default_model_key(),
            "Reference tables loaded"
        );

        let resolver = ContentResolver::new(catalog, credentials, providers)
            .with_timeout(config.generation_timeout_duration());

        Ok(Self { config, resolver })
    }
}
