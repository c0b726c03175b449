//! Transport layer abstractions for protocol operations
//!
//! [`ServiceClient`] is the only thing the repositories need from the network:
//! hand over a [`Request`], get a [`RawResponse`] back. [`HttpServiceClient`]
//! implements it on top of reqwest, with a blocking client for the synchronous
//! path and an async client for the cancellable path.

use std::collections::BTreeMap;
use std::sync::{Arc, Once, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{ProtocolError, Result};
use crate::request::Request;
use crate::response::RawResponse;

/// Public API host
pub const DEFAULT_BASE_URL: &str = "https://api.guildwars2.com/";

const USER_AGENT: &str = concat!("gw2net/", env!("CARGO_PKG_VERSION"));

/// Install the ring crypto provider for rustls once per process.
pub(crate) fn ensure_crypto_provider() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        // Another component may have installed a provider already
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Sends requests to the API.
///
/// Implementations perform I/O only; status classification and JSON decoding
/// happen in [`crate::Response::decode`].
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Send on the calling thread, blocking until the response arrives.
    fn send(&self, request: &Request) -> Result<RawResponse>;

    /// Send asynchronously.
    ///
    /// Must return [`ProtocolError::Cancelled`] without touching the network when
    /// `cancel` is already triggered, and should stop waiting when it triggers later.
    async fn send_async(&self, request: &Request, cancel: &CancellationToken)
    -> Result<RawResponse>;
}

#[async_trait]
impl<C: ServiceClient + ?Sized> ServiceClient for Arc<C> {
    fn send(&self, request: &Request) -> Result<RawResponse> {
        (**self).send(request)
    }

    async fn send_async(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        (**self).send_async(request, cancel).await
    }
}

/// HTTP transport backed by reqwest
#[derive(Clone)]
pub struct HttpServiceClient {
    base_url: Url,
    config: HttpConfig,
    client: reqwest::Client,
    // Created on first synchronous call; a blocking client must not be
    // dropped inside an async runtime, so async-only users never build one.
    blocking: Arc<OnceLock<reqwest::blocking::Client>>,
}

impl std::fmt::Debug for HttpServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServiceClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpServiceClient {
    /// Client for the public API host with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(Url::parse(DEFAULT_BASE_URL)?, HttpConfig::default())
    }

    pub fn with_config(base_url: Url, config: HttpConfig) -> Result<Self> {
        ensure_crypto_provider();

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(config.user_agent.clone());

        if config.enable_compression {
            builder = builder.gzip(true);
        }

        let client = builder.build()?;

        Ok(Self {
            base_url: normalize_base(base_url),
            config,
            client,
            blocking: Arc::new(OnceLock::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn blocking_client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.blocking.get() {
            return Ok(client);
        }

        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .connect_timeout(self.config.connect_timeout)
            .pool_idle_timeout(self.config.pool_idle_timeout)
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
            .user_agent(self.config.user_agent.clone());

        if self.config.enable_compression {
            builder = builder.gzip(true);
        }

        let client = builder.build()?;
        Ok(self.blocking.get_or_init(|| client))
    }

    async fn execute(&self, url: Url) -> Result<RawResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    fn send(&self, request: &Request) -> Result<RawResponse> {
        let url = request.url(&self.base_url)?;
        tracing::debug!("GET {}", url);

        let response = self.blocking_client()?.get(url).send()?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes()?;

        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    async fn send_async(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        if cancel.is_cancelled() {
            return Err(ProtocolError::Cancelled);
        }

        let url = request.url(&self.base_url)?;
        tracing::debug!("GET {}", url);

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("request cancelled while in flight");
                return Err(ProtocolError::Cancelled);
            }
            response = self.execute(url) => response?,
        };

        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            "response received"
        );
        Ok(response)
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}

/// `Url::join` drops the last path segment unless the base ends with a slash.
fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    pub user_agent: String,

    /// Accept gzip-compressed responses
    pub enable_compression: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: USER_AGENT.to_string(),
            enable_compression: true,
        }
    }
}

impl HttpConfig {
    /// Read overrides from `GW2NET_CONNECT_TIMEOUT` and `GW2NET_REQUEST_TIMEOUT` (seconds)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: env_secs("GW2NET_REQUEST_TIMEOUT").unwrap_or(defaults.timeout),
            connect_timeout: env_secs("GW2NET_CONNECT_TIMEOUT")
                .unwrap_or(defaults.connect_timeout),
            ..defaults
        }
    }

    /// Short timeouts, few idle connections
    pub fn low_latency() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
            pool_idle_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 4,
            ..Self::default()
        }
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_appends_slash() {
        let base = normalize_base(Url::parse("http://localhost:8080/proxy").expect("url"));
        assert_eq!(base.as_str(), "http://localhost:8080/proxy/");

        let base = normalize_base(Url::parse("https://api.guildwars2.com").expect("url"));
        assert_eq!(base.as_str(), "https://api.guildwars2.com/");
    }

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("gw2net/"));
        assert!(config.enable_compression);
    }

    #[tokio::test]
    async fn test_cancelled_before_dispatch() {
        // Port 9 (discard) is never contacted: the token is checked first
        let base = Url::parse("http://127.0.0.1:9/").expect("url");
        let client = HttpServiceClient::with_config(base, HttpConfig::default())
            .expect("client builds");
        let request = Request::builder("v2/worlds").build().expect("request");

        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = client.send_async(&request, &cancel).await;
        assert!(matches!(result, Err(ProtocolError::Cancelled)));
    }
}
