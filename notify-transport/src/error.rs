//! Error types for the transport library

use thiserror::Error;

/// Transport error types
#[derive(Debug, Error)]
pub enum TransportError {
    /// Provider rejected the request (non-2xx response)
    #[error("Provider rejected send ({status}): {detail}")]
    Provider { status: u16, detail: String },

    /// Request could not be performed (connection, DNS, TLS)
    #[error("Request failed: {0}")]
    Request(String),

    /// Invalid transport configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Request(e.to_string())
    }
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
