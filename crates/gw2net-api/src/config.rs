//! Client configuration

use serde::{Deserialize, Serialize};
use url::Url;

use gw2net_cache::CacheConfig;
use gw2net_protocol::{DEFAULT_BASE_URL, HttpConfig, Locale};

use crate::error::{Error, Result};

/// Configuration shared by every repository a [`crate::Gw2Client`] creates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API host, `https://api.guildwars2.com/` unless proxied
    pub base_url: Url,

    /// Language for localized resources; `None` lets the server choose
    pub locale: Option<Locale>,

    pub http: HttpConfig,

    /// Applies to caching repositories only
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            locale: None,
            http: HttpConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads `GW2NET_BASE_URL`, `GW2NET_LANG`, `GW2NET_CONNECT_TIMEOUT`,
    /// `GW2NET_REQUEST_TIMEOUT` and `GW2NET_CACHE_TTL`. Unset variables keep
    /// their defaults; malformed ones are an error.
    pub fn from_env() -> Result<Self> {
        let base_url = match std::env::var("GW2NET_BASE_URL") {
            Ok(value) => Url::parse(value.trim())
                .map_err(|e| Error::Config(format!("GW2NET_BASE_URL: {e}")))?,
            Err(_) => default_base_url(),
        };

        let locale = match std::env::var("GW2NET_LANG") {
            Ok(value) => Some(
                value
                    .parse()
                    .map_err(|_| Error::Config(format!("GW2NET_LANG: unsupported language {value}")))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            locale,
            http: HttpConfig::from_env(),
            cache: CacheConfig::from_env()?,
        })
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "https://api.guildwars2.com/");
        assert_eq!(config.locale, None);
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default().with_locale(Locale::Spanish);
        assert_eq!(config.locale, Some(Locale::Spanish));
    }
}
