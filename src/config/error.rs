//! Configuration error types

use crate::status::KeyError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Invalid service key in '{field}': {source}")]
    InvalidKey {
        field: String,
        #[source]
        source: KeyError,
    },

    #[error("Duplicate service key '{key}' (services[{first}] and services[{second}])")]
    DuplicateKey {
        key: String,
        first: usize,
        second: usize,
    },
}
