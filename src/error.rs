//! Fetch error types.

use thiserror::Error;

/// Result type for catalog fetches.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors surfaced by the data fetcher. None of them are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API request timed out ({secs} seconds).")]
    Timeout { secs: f64 },

    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }

    /// Status code for HTTP failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}
