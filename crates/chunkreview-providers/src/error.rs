//! Error types for the providers module

use thiserror::Error;

/// Errors that can occur when interacting with providers
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ProviderError {
    /// Authentication failed (never includes key details)
    #[error("Authentication failed")]
    AuthError,

    /// Rate limited by provider
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Network error occurred
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Generic provider error
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Response did not have the expected shape
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_connect() {
            ProviderError::NetworkError(err.to_string())
        } else if err.is_decode() {
            ProviderError::ParseError(err.to_string())
        } else {
            ProviderError::ProviderError(err.to_string())
        }
    }
}
