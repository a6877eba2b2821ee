//! Configuration management for the marketplace views

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Hosted backend configuration
    pub backend: BackendConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Hosted backend (REST + RPC) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the project, without the `/rest/v1` suffix
    pub url: String,

    /// Public API key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: String,

    /// Database schema exposed by the REST layer
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log to file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_schema() -> String {
    "public".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        let url = std::env::var("MARKETPLACE_BACKEND_URL")
            .or_else(|_| std::env::var("SUPABASE_URL"))
            .unwrap_or_else(|_| "http://localhost:54321".to_string());
        let api_key = std::env::var("MARKETPLACE_BACKEND_API_KEY")
            .or_else(|_| std::env::var("SUPABASE_ANON_KEY"))
            .unwrap_or_default();

        Self {
            url,
            api_key,
            schema: default_schema(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an optional `config` file and `MARKETPLACE_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("MARKETPLACE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        debug!(
            backend_url = %loaded.backend.url,
            host = %loaded.server.host,
            port = loaded.server.port,
            "Configuration loaded"
        );
        Ok(loaded)
    }

    /// Check the values that cannot be caught by deserialization alone
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending field.
    pub fn validate(&self) -> crate::Result<()> {
        let url = self.backend.url.trim();
        if url.is_empty() {
            return Err(crate::Error::Configuration {
                message: "backend.url must not be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(crate::Error::Configuration {
                message: format!("backend.url must be an http(s) URL, got '{url}'"),
            });
        }
        if self.backend.request_timeout == 0 {
            return Err(crate::Error::Configuration {
                message: "backend.request_timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
