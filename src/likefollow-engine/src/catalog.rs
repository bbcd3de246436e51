//! Reference tables for platforms, tones and models.
//!
//! The catalog is built once at startup and shared read-only afterwards.
//! Every lookup is by exact identifier equality.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CatalogError;

/// Character limit used when a platform does not declare one.
pub const DEFAULT_CHARACTER_LIMIT: u32 = 2200;

/// Fallback platform when no default is configured.
pub const FALLBACK_PLATFORM: &str = "instagram";

/// Fallback tone when no default is configured.
pub const FALLBACK_TONE: &str = "engaging";

/// Fallback model key when no model is configured.
pub const FALLBACK_MODEL: &str = "gemini";

pub const PLATFORMS_VAR: &str = "EXPO_PUBLIC_PLATFORMS";
pub const TONES_VAR: &str = "EXPO_PUBLIC_TONES";
pub const MODELS_VAR: &str = "EXPO_AI_MODELS";
pub const DEFAULT_PLATFORM_VAR: &str = "EXPO_PUBLIC_DEFAULT_PLATFORM";
pub const DEFAULT_TONE_VAR: &str = "EXPO_PUBLIC_DEFAULT_TONE";

/// Target social network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_limit: Option<u32>,
}

impl Platform {
    /// Declared limit or [`DEFAULT_CHARACTER_LIMIT`].
    pub fn effective_limit(&self) -> u32 {
        self.character_limit.unwrap_or(DEFAULT_CHARACTER_LIMIT)
    }
}

/// Stylistic modifier for generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A selectable generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub key: String,
    pub label: String,
}

/// Raw catalog configuration, as read from the environment or a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub tones: Vec<Tone>,
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tone: Option<String>,
}

impl CatalogConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// Table variables hold JSON arrays. A missing or blank variable yields an
    /// empty table; malformed JSON is an error naming the variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CatalogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            platforms: parse_table(PLATFORMS_VAR, non_empty(PLATFORMS_VAR))?,
            tones: parse_table(TONES_VAR, non_empty(TONES_VAR))?,
            models: parse_table(MODELS_VAR, non_empty(MODELS_VAR))?,
            default_platform: non_empty(DEFAULT_PLATFORM_VAR),
            default_tone: non_empty(DEFAULT_TONE_VAR),
        })
    }
}

fn parse_table<T>(var: &str, raw: Option<String>) -> Result<Vec<T>, CatalogError>
where
    T: for<'de> Deserialize<'de>,
{
    let Some(raw) = raw else {
        warn!("No entries found in {}", var);
        return Ok(Vec::new());
    };
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        var: var.to_string(),
        source,
    })
}

/// Immutable reference tables with resolved defaults.
#[derive(Debug, Clone)]
pub struct Catalog {
    platforms: Vec<Platform>,
    tones: Vec<Tone>,
    models: Vec<ModelDescriptor>,
    default_platform: String,
    default_tone: String,
    default_model: String,
}

impl Catalog {
    /// Build the catalog, rejecting duplicate identifiers.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        ensure_unique("platform", config.platforms.iter().map(|p| &p.value))?;
        ensure_unique("tone", config.tones.iter().map(|t| &t.value))?;
        ensure_unique("model", config.models.iter().map(|m| &m.key))?;

        let default_platform = config
            .default_platform
            .unwrap_or_else(|| FALLBACK_PLATFORM.to_string());
        let default_tone = config
            .default_tone
            .unwrap_or_else(|| FALLBACK_TONE.to_string());
        let default_model = config
            .models
            .first()
            .map(|m| m.key.clone())
            .unwrap_or_else(|| FALLBACK_MODEL.to_string());

        debug!(
            platforms = config.platforms.len(),
            tones = config.tones.len(),
            models = config.models.len(),
            %default_platform,
            %default_tone,
            %default_model,
            "Catalog loaded"
        );

        Ok(Self {
            platforms: config.platforms,
            tones: config.tones,
            models: config.models,
            default_platform,
            default_tone,
            default_model,
        })
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn platform(&self, value: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.value == value)
    }

    pub fn tone(&self, value: &str) -> Option<&Tone> {
        self.tones.iter().find(|t| t.value == value)
    }

    pub fn model(&self, key: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.key == key)
    }

    /// Character limit for a platform, falling back to the default.
    pub fn platform_limit(&self, value: &str) -> u32 {
        self.platform(value)
            .map(Platform::effective_limit)
            .unwrap_or(DEFAULT_CHARACTER_LIMIT)
    }

    pub fn default_platform(&self) -> &str {
        &self.default_platform
    }

    pub fn default_tone(&self) -> &str {
        &self.default_tone
    }

    pub fn default_model_key(&self) -> &str {
        &self.default_model
    }
}

fn ensure_unique<'a>(
    table: &'static str,
    values: impl Iterator<Item = &'a String>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value.as_str()) {
            return Err(CatalogError::Duplicate {
                table,
                value: value.clone(),
            });
        }
    }
    Ok(())
}
