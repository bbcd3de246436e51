//! Server configuration.

use std::time::Duration;

use likefollow_engine::CatalogConfig;
use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:5000").
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// CORS origins (empty or "*" = allow all).
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Request timeout in seconds (applies to full request lifecycle).
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Timeout for a single generation provider call in seconds.
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout: u64,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Platforms, tones and models.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

fn default_request_timeout() -> u64 {
    60
}

fn default_generation_timeout() -> u64 {
    30
}

fn default_shutdown_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_origins: vec![],
            max_body_size: default_max_body_size(),
            request_timeout: default_request_timeout(),
            generation_timeout: default_generation_timeout(),
            shutdown_timeout: default_shutdown_timeout(),
            logging: LoggingConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            catalog: CatalogConfig::from_lookup(&lookup)?,
            ..Self::default()
        };

        if let Some(addr) = lookup("LIKEFOLLOW_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(origins) = lookup("CORS_ORIGINS") {
            config.cors_origins = parse_origins(&origins);
        }

        if let Some(level) = lookup("LIKEFOLLOW_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(format) = lookup("LIKEFOLLOW_LOG_FORMAT") {
            config.logging.format = format;
        }

        if let Some(secs) = lookup("LIKEFOLLOW_GENERATION_TIMEOUT") {
            config.generation_timeout = secs
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid LIKEFOLLOW_GENERATION_TIMEOUT: {e}"))?;
        }

        Ok(config)
    }

    /// Get request timeout as Duration.
    pub fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Get generation timeout as Duration.
    pub fn generation_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.generation_timeout)
    }
}

/// Split a comma-separated origin list. A "*" entry is kept as is.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json or pretty).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Apply command-line overrides on top of the configured values.
    pub fn with_overrides(mut self, level: Option<String>, json: bool) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if json {
            self.format = "json".to_string();
        }
        self
    }

    /// Whether log lines should be emitted as JSON.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}
