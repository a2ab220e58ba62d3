use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Timed out after {after:?} waiting for {operation}")]
    Timeout { operation: String, after: Duration },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScraperError {
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        ScraperError::Timeout {
            operation: operation.into(),
            after,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
