// src/error.rs
use thiserror::Error;

/// Problems that stop the service from starting. Nothing in the scoring or
/// classification path returns these.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid pattern '{pattern}' for theme '{theme}': {reason}")]
    InvalidPattern {
        theme: String,
        pattern: String,
        reason: String,
    },

    #[error("{0} connector is not configured")]
    NotConfigured(&'static str),
}
