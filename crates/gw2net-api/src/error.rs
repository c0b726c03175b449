//! Error types for repository operations

use thiserror::Error;

use gw2net_cache::CacheError;
use gw2net_convert::ConvertError;
use gw2net_protocol::ProtocolError;

use crate::repository::Operation;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport, status or decoding failure, including cancellation
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Required data missing or malformed in a response
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The resource has no endpoint backing this operation
    #[error("{operation} is not supported for {resource}")]
    Unsupported {
        operation: Operation,
        resource: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Protocol(e) if e.is_cancelled())
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
