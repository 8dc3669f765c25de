//! Configuration module for statuswatch
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`STATUSWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use statuswatch::config::StatusWatchConfig;
//!
//! let config = StatusWatchConfig::default();
//! assert_eq!(config.client.interval_seconds, 60);
//!
//! let toml = r#"
//! [client]
//! interval_seconds = 15
//! "#;
//! let config: StatusWatchConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.client.interval_seconds, 15);
//! assert_eq!(config.client.timeout_seconds, 10);
//! ```

pub mod board;
pub mod error;
pub mod logging;

pub use board::{BoardConfig, ServiceConfig};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

// Re-export ClientConfig from poller module
pub use crate::poller::ClientConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the status board.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StatusWatchConfig {
    /// Status endpoint polling
    pub client: ClientConfig,
    /// Board layout and charts
    pub board: BoardConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl StatusWatchConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports STATUSWATCH_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        // Client settings
        if let Ok(endpoint) = std::env::var("STATUSWATCH_ENDPOINT") {
            self.client.endpoint = endpoint;
        }
        if let Ok(interval) = std::env::var("STATUSWATCH_INTERVAL") {
            if let Ok(i) = interval.parse() {
                self.client.interval_seconds = i;
            }
        }
        if let Ok(timeout) = std::env::var("STATUSWATCH_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.client.timeout_seconds = t;
            }
        }

        // Logging settings
        if let Ok(level) = std::env::var("STATUSWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("STATUSWATCH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.client.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Validation {
                field: "client.endpoint".to_string(),
                message: "endpoint cannot be empty".to_string(),
            });
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::Validation {
                field: "client.endpoint".to_string(),
                message: format!("expected an http(s) URL, got '{}'", endpoint),
            });
        }
        if self.client.interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "client.interval_seconds".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }
        if self.client.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "client.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        self.board.resolved_services()?;
        self.logging.validate()?;

        Ok(())
    }
}
