//! Error types for the StockView core

use thiserror::Error;

/// Core-wide error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StockViewError {
    /// No API token configured. Not retryable without reconfiguration.
    #[error("No Finnhub API key configured")]
    MissingCredential,

    /// Provider answered HTTP 429
    #[error("Rate limited by data provider (429)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// Payload decoded but lacks fields the caller needs
    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StockViewError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        StockViewError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        StockViewError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        StockViewError::Parse(msg.into())
    }

    pub fn unexpected_shape(msg: impl Into<String>) -> Self {
        StockViewError::UnexpectedShape(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        StockViewError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        StockViewError::Internal(msg.into())
    }

    /// True for HTTP 429 responses
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StockViewError::RateLimited { .. })
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, StockViewError::MissingCredential)
    }
}

/// Result type alias for StockView operations
pub type StockViewResult<T> = Result<T, StockViewError>;
