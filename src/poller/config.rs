//! Configuration for the status poller.

use serde::{Deserialize, Serialize};

/// Endpoint the dashboard polls when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/status";

/// Configuration for polling the status API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the status endpoint
    pub endpoint: String,
    /// Seconds between poll cycles
    pub interval_seconds: u64,
    /// Timeout for each status request
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            interval_seconds: 60,
            timeout_seconds: 10,
        }
    }
}
