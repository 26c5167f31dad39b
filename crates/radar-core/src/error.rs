//! Error types for Issue Radar

use thiserror::Error;

/// Main error type for Issue Radar
///
/// `DirectoryUnavailable` and "no territory match" are deliberately distinct:
/// the first is a retryable infrastructure failure, the second is a legitimate
/// unrouted ticket and is reported as `Ok(None)` by the resolver.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Territory directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Ticket store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
