//! Error types for cache operations

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// Invalid cache configuration
    #[error("Invalid cache configuration: {0}")]
    InvalidConfiguration(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
