//! Error types for status fetches.

use thiserror::Error;

/// Errors that can occur while fetching the status report.
///
/// All of them are recovered at the poller boundary: they only ever change
/// the shared "last updated" indicator.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// Non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Body was not a valid status report
    #[error("invalid response: {0}")]
    Decode(String),

    /// HTTP client could not be built
    #[error("client setup failed: {0}")]
    Client(String),
}
