//! Fetch error taxonomy
//!
//! Every resource fails the same way: either the transport reported a
//! problem (network, timeout, non-2xx status) or something else went wrong
//! and is wrapped as an unexpected error.

use thiserror::Error;

/// Network or HTTP-level failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Server answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Uniform error returned by every remote fetch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl FetchError {
    pub fn unexpected(detail: impl std::fmt::Display) -> Self {
        FetchError::Unexpected(detail.to_string())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }

    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.into())
    }
}

/// Result type for remote fetches
pub type FetchResult<T> = Result<T, FetchError>;
