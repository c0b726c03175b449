//! Error types for protocol operations

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported locale: {0}")]
    InvalidLocale(String),

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Rate limited")]
    RateLimited {
        /// Duration from the HTTP Retry-After header, if present
        retry_after: Option<Duration>,
    },

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Server error: {0}")]
    ServerError(u16),

    /// Any other non-success status, with the `text` field of the error body
    #[error("API error {status}: {text}")]
    Api { status: u16, text: String },

    #[error("Request cancelled")]
    Cancelled,
}

impl ProtocolError {
    /// Whether the failure came from the caller cancelling the request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether a caller may reasonably try the same request again later.
    ///
    /// The client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::ServiceUnavailable | Self::ServerError(_) => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Get the Retry-After hint duration, if this is a rate-limited error with one.
    pub fn retry_after_hint(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
