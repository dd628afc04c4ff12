//! ADK proxy error types

use thiserror::Error;

/// ADK proxy error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side error (bad input, unusable proxy response)
    #[error("Client error: {0}")]
    Client(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Message without the category prefix, for user-facing envelopes
    pub fn detail(&self) -> String {
        match self {
            Self::Config(msg) | Self::Client(msg) => msg.clone(),
            Self::Io(e) => e.to_string(),
            Self::Serialization(e) => e.to_string(),
            Self::Http(e) => e.to_string(),
        }
    }
}

/// Result type alias for ADK proxy operations
pub type Result<T> = std::result::Result<T, Error>;
