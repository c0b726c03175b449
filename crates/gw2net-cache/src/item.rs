//! Cached values and their keys

use std::hash::Hash;

use chrono::{DateTime, TimeDelta, Utc};

use gw2net_protocol::Locale;

/// Values that can live in a [`crate::StaleCache`].
///
/// The same entity is cached once per locale, so the cache key is always the
/// pair of [`Cacheable::cache_id`] and [`Cacheable::cache_locale`].
pub trait Cacheable: Clone + Send + Sync {
    type Id: Clone + Eq + Hash + Send + Sync;

    fn cache_id(&self) -> Self::Id;

    /// `None` for entities that are not localized
    fn cache_locale(&self) -> Option<Locale>;
}

/// A value with the time it was stored.
///
/// Items are never mutated in place; a new put replaces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheItem<T> {
    data: T,
    added_at: DateTime<Utc>,
    locale: Option<Locale>,
}

impl<T> CacheItem<T> {
    pub fn new(data: T, added_at: DateTime<Utc>, locale: Option<Locale>) -> Self {
        Self {
            data,
            added_at,
            locale,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn locale(&self) -> Option<Locale> {
        self.locale
    }

    /// Stale once strictly older than `time_to_stale`
    pub fn is_stale_at(&self, now: DateTime<Utc>, time_to_stale: TimeDelta) -> bool {
        now - self.added_at > time_to_stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staleness_boundary() {
        let added = DateTime::<Utc>::UNIX_EPOCH;
        let ttl = TimeDelta::seconds(60);
        let item = CacheItem::new("Anvil Rock", added, Some(Locale::English));

        assert!(!item.is_stale_at(added, ttl));
        assert!(!item.is_stale_at(added + TimeDelta::seconds(60), ttl));
        assert!(item.is_stale_at(added + TimeDelta::seconds(61), ttl));
    }
}
