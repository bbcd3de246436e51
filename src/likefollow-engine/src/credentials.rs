//! Per-model API key resolution.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::catalog::ModelDescriptor;

/// Suffix appended to the uppercased model key to form the variable name.
pub const API_KEY_SUFFIX: &str = "_API_KEY";

/// Environment variable holding the server-side key for a model.
pub fn env_var_for(model_key: &str) -> String {
    format!("{}{}", model_key.to_uppercase(), API_KEY_SUFFIX)
}

/// Server-side credentials keyed by model key.
#[derive(Clone, Default)]
pub struct CredentialStore {
    keys: HashMap<String, String>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut configured: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        configured.sort_unstable();
        f.debug_struct("CredentialStore")
            .field("configured", &configured)
            .finish()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve keys for every model from the process environment.
    pub fn from_env(models: &[ModelDescriptor]) -> Self {
        Self::from_lookup(models, |name| std::env::var(name).ok())
    }

    /// Resolve keys for every model through an arbitrary lookup.
    pub fn from_lookup<F>(models: &[ModelDescriptor], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut store = Self::new();
        for model in models {
            let var = env_var_for(&model.key);
            if let Some(key) = lookup(&var) {
                store = store.with_key(&model.key, key);
            } else {
                debug!(model = %model.key, var = %var, "No server-side API key");
            }
        }
        store
    }

    /// Add a key. Blank keys are ignored.
    pub fn with_key(mut self, model_key: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.trim().is_empty() {
            self.keys.insert(model_key.into(), key);
        }
        self
    }

    /// Whether a server-side key exists for the model.
    pub fn has(&self, model_key: &str) -> bool {
        self.keys.contains_key(model_key)
    }

    /// Pick the credential for a request: a non-empty override wins over the
    /// server-side key.
    pub fn resolve(&self, model_key: &str, override_key: Option<&str>) -> Option<String> {
        override_key
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .or_else(|| self.keys.get(model_key).cloned())
    }
}
