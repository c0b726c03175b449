//! # gw2net-protocol - Wire contracts for the Guild Wars 2 public API
//!
//! This crate holds everything between a repository and the network:
//!
//! 1. **Requests** ([`Request`]): resource path, ordered query parameters, the
//!    selected entities and an optional [`Locale`]
//! 2. **Responses** ([`Response`]): status classification, JSON decoding and the
//!    paging/localization headers as [`ResponseMetadata`]
//! 3. **Transport** ([`ServiceClient`]): synchronous and cancellable asynchronous
//!    sending, with [`HttpServiceClient`] as the reqwest-backed implementation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gw2net_protocol::{HttpServiceClient, Locale, Request, Response, ServiceClient};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpServiceClient::new()?;
//!     let request = Request::builder("v2/worlds")
//!         .ids([1001, 2204])
//!         .locale(Some(Locale::German))
//!         .build()?;
//!
//!     let raw = client.send_async(&request, &CancellationToken::new()).await?;
//!     let response = Response::<serde_json::Value>::decode(raw)?;
//!     println!("{} worlds", response.metadata.result_count.unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! A 404 is not an error at this layer: [`Response::decode`] returns an envelope
//! without content so repositories can map it to "not found". Rate limiting and
//! server failures surface as [`ProtocolError`] variants; the client never retries
//! on its own, but [`ProtocolError::is_transient`] tells callers when a retry makes
//! sense.

pub mod error;
pub mod locale;
pub mod request;
pub mod response;
pub mod transport;

pub use error::{ProtocolError, Result};
pub use locale::Locale;
pub use request::{Request, RequestBuilder, Selection};
pub use response::{ErrorResult, RawResponse, Response, ResponseMetadata};
pub use transport::{DEFAULT_BASE_URL, HttpConfig, HttpServiceClient, ServiceClient};

// Callers need the token type to use the async operations
pub use tokio_util::sync::CancellationToken;
