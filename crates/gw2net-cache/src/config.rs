//! Cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

/// Environment variable holding the time-to-stale in seconds
pub const ENV_CACHE_TTL: &str = "GW2NET_CACHE_TTL";

/// Staleness cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Age after which an item is stale and eligible for pruning
    pub time_to_stale: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            time_to_stale: Duration::from_secs(5 * 60),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_time_to_stale(mut self, time_to_stale: Duration) -> Self {
        self.time_to_stale = time_to_stale;
        self
    }

    /// For data that changes often, such as WvW scores
    pub fn short_lived() -> Self {
        Self {
            time_to_stale: Duration::from_secs(30),
        }
    }

    /// For static content such as items, skins and recipes
    pub fn long_lived() -> Self {
        Self {
            time_to_stale: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Default configuration with `GW2NET_CACHE_TTL` applied if set.
    pub fn from_env() -> CacheResult<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(ENV_CACHE_TTL) {
            let secs: u64 = value.trim().parse().map_err(|_| {
                CacheError::InvalidConfiguration(format!("{ENV_CACHE_TTL} is not a number: {value}"))
            })?;
            config.time_to_stale = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> CacheResult<()> {
        if self.time_to_stale.is_zero() {
            return Err(CacheError::InvalidConfiguration(
                "time_to_stale must be greater than 0".to_string(),
            ));
        }

        if chrono::TimeDelta::from_std(self.time_to_stale).is_err() {
            return Err(CacheError::InvalidConfiguration(
                "time_to_stale is out of range".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CacheConfig::default().validate().is_ok());
        assert!(CacheConfig::short_lived().validate().is_ok());
        assert!(CacheConfig::long_lived().validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = CacheConfig::new().with_time_to_stale(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_huge_ttl_rejected() {
        let config = CacheConfig::new().with_time_to_stale(Duration::MAX);
        assert!(config.validate().is_err());
    }
}
