//! Response envelope and status classification
//!
//! Transports hand back a [`RawResponse`]: status, headers and body bytes.
//! [`Response::decode`] turns that into a typed envelope, so every transport
//! classifies statuses the same way:
//!
//! | Status            | Result                                                   |
//! |-------------------|----------------------------------------------------------|
//! | 2xx               | `content` decoded from JSON (absent for an empty body)   |
//! | 404               | `content` absent, `error` carries the server's text      |
//! | 429               | [`ProtocolError::RateLimited`]                           |
//! | 503               | [`ProtocolError::ServiceUnavailable`]                    |
//! | other 5xx         | [`ProtocolError::ServerError`]                           |
//! | other             | [`ProtocolError::Api`]                                   |

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::locale::Locale;

pub const HEADER_RESULT_COUNT: &str = "x-result-count";
pub const HEADER_RESULT_TOTAL: &str = "x-result-total";
pub const HEADER_PAGE_SIZE: &str = "x-page-size";
pub const HEADER_PAGE_TOTAL: &str = "x-page-total";
pub const HEADER_CONTENT_LANGUAGE: &str = "content-language";
pub const HEADER_RETRY_AFTER: &str = "retry-after";

/// Undecoded transport output. Header names are stored lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Error body returned by the API, e.g. `{"text": "no such id"}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    #[serde(default)]
    pub text: String,
}

/// Paging and localization headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// Number of entities in this response (`X-Result-Count`)
    pub result_count: Option<u32>,
    /// Number of entities the server knows about (`X-Result-Total`)
    pub result_total: Option<u32>,
    pub page_size: Option<u32>,
    /// Number of pages at the current page size (`X-Page-Total`)
    pub page_total: Option<u32>,
    /// Language of localized strings (`Content-Language`)
    pub locale: Option<Locale>,
}

impl ResponseMetadata {
    pub fn from_headers(headers: &BTreeMap<String, String>) -> Self {
        let number = |name: &str| headers.get(name).and_then(|v| v.trim().parse().ok());

        Self {
            result_count: number(HEADER_RESULT_COUNT),
            result_total: number(HEADER_RESULT_TOTAL),
            page_size: number(HEADER_PAGE_SIZE),
            page_total: number(HEADER_PAGE_TOTAL),
            locale: headers
                .get(HEADER_CONTENT_LANGUAGE)
                .and_then(|v| v.parse().ok()),
        }
    }
}

/// Typed response envelope
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub status: u16,
    pub content: Option<T>,
    pub metadata: ResponseMetadata,
    pub error: Option<ErrorResult>,
}

impl<T: DeserializeOwned> Response<T> {
    pub fn decode(raw: RawResponse) -> Result<Self> {
        let metadata = ResponseMetadata::from_headers(&raw.headers);

        match raw.status {
            200..=299 => {
                // Blank bodies and a literal `null` both mean no content.
                let content = if raw.body.iter().all(u8::is_ascii_whitespace) {
                    None
                } else {
                    serde_json::from_slice::<Option<T>>(&raw.body)?
                };

                Ok(Self {
                    status: raw.status,
                    content,
                    metadata,
                    error: None,
                })
            }
            404 => Ok(Self {
                status: raw.status,
                content: None,
                metadata,
                error: Some(error_result(&raw.body)),
            }),
            429 => Err(ProtocolError::RateLimited {
                retry_after: raw
                    .headers
                    .get(HEADER_RETRY_AFTER)
                    .and_then(|v| v.trim().parse().ok())
                    .map(Duration::from_secs),
            }),
            503 => Err(ProtocolError::ServiceUnavailable),
            status @ 500..=599 => Err(ProtocolError::ServerError(status)),
            status => Err(ProtocolError::Api {
                status,
                text: error_result(&raw.body).text,
            }),
        }
    }
}

impl<T> Response<T> {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Transform the content while keeping the metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            status: self.status,
            content: self.content.map(f),
            metadata: self.metadata,
            error: self.error,
        }
    }
}

fn error_result(body: &[u8]) -> ErrorResult {
    serde_json::from_slice(body).unwrap_or_else(|_| ErrorResult {
        text: String::from_utf8_lossy(body).trim().to_string(),
    })
}
