//! Error types for journal-geo
//!
//! Location resolution itself never fails: parse, cache and geocoding lookups
//! answer with `Option`. This type covers the layers around it (config files,
//! HTTP client construction, the server, the repair utility).

use thiserror::Error;

/// Main error type for journal-geo operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Repair error: {0}")]
    Repair(String),
}

/// Result type alias for journal-geo operations
pub type Result<T> = std::result::Result<T, Error>;
