//! Conversion errors

use thiserror::Error;

/// Raised only when contractually required data is missing or malformed.
///
/// Unknown discriminators, enum values and flag tokens are not errors; they
/// degrade to the target's default or `Unknown` variant.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Expected at most {expected} elements, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Unwrap a field the wire contract guarantees.
pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(ConvertError::MissingField(field))
}
