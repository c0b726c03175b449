//! Staleness-based in-memory cache
//!
//! Items are bucketed by entity id, then by locale. An item is fresh while its
//! age is at most the configured time-to-stale and stale afterwards. Staleness
//! is computed when the cache is read or pruned; nothing runs in the background.
//!
//! The store is a [`DashMap`], so one cache can be shared between threads and
//! async tasks without external locking.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;

use gw2net_protocol::Locale;

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::item::{CacheItem, Cacheable};
use crate::stats::{AtomicCacheMetrics, CacheStats};

type Bucket<T> = HashMap<Option<Locale>, CacheItem<T>>;

pub struct StaleCache<T: Cacheable> {
    entries: DashMap<T::Id, Bucket<T>>,
    time_to_stale: TimeDelta,
    metrics: AtomicCacheMetrics,
}

impl<T: Cacheable> std::fmt::Debug for StaleCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaleCache")
            .field("time_to_stale", &self.time_to_stale)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T: Cacheable> StaleCache<T> {
    pub fn new(config: &CacheConfig) -> CacheResult<Self> {
        config.validate()?;
        let time_to_stale = TimeDelta::from_std(config.time_to_stale)
            .map_err(|e| CacheError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            entries: DashMap::new(),
            time_to_stale,
            metrics: AtomicCacheMetrics::default(),
        })
    }

    pub fn with_time_to_stale(time_to_stale: Duration) -> CacheResult<Self> {
        Self::new(&CacheConfig::new().with_time_to_stale(time_to_stale))
    }

    pub fn time_to_stale(&self) -> TimeDelta {
        self.time_to_stale
    }

    /// Store `data` under its (id, locale) key.
    ///
    /// Re-putting with the same `inserted_at` is a no-op; any other timestamp
    /// replaces the item wholesale.
    pub fn put(&self, data: T, inserted_at: DateTime<Utc>) {
        let locale = data.cache_locale();
        self.put_keyed(data, locale, inserted_at);
    }

    /// Store `data` under an explicit locale instead of its own.
    ///
    /// Callers that look items up by the locale they asked for use this, since
    /// the server may answer in another language than the one requested.
    pub fn put_keyed(&self, data: T, locale: Option<Locale>, inserted_at: DateTime<Utc>) {
        let mut bucket = self.entries.entry(data.cache_id()).or_default();

        if bucket
            .get(&locale)
            .is_some_and(|existing| existing.added_at() == inserted_at)
        {
            return;
        }

        bucket.insert(locale, CacheItem::new(data, inserted_at, locale));
        self.metrics.record_put();
    }

    pub fn put_now(&self, data: T) {
        self.put(data, Utc::now());
    }

    /// All fresh items
    pub fn get(&self) -> Vec<CacheItem<T>> {
        self.get_at(Utc::now())
    }

    /// All items fresh at `now`
    pub fn get_at(&self, now: DateTime<Utc>) -> Vec<CacheItem<T>> {
        self.get_where_at(now, |_| true)
    }

    /// Fresh items whose data matches `predicate`
    pub fn get_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<CacheItem<T>> {
        self.get_where_at(Utc::now(), predicate)
    }

    pub fn get_where_at(
        &self,
        now: DateTime<Utc>,
        predicate: impl Fn(&T) -> bool,
    ) -> Vec<CacheItem<T>> {
        self.entries
            .iter()
            .flat_map(|bucket| {
                bucket
                    .values()
                    .filter(|item| !item.is_stale_at(now, self.time_to_stale))
                    .filter(|item| predicate(item.data()))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Direct lookup. Stale items are returned too; check
    /// [`CacheItem::is_stale_at`] if that matters.
    pub fn get_by_key(&self, id: &T::Id, locale: Option<Locale>) -> Option<CacheItem<T>> {
        self.entries
            .get(id)
            .and_then(|bucket| bucket.get(&locale).cloned())
    }

    /// Keyed lookup that only returns fresh data and counts hits and misses.
    pub fn get_fresh(&self, id: &T::Id, locale: Option<Locale>) -> Option<T> {
        self.get_fresh_at(id, locale, Utc::now())
    }

    pub fn get_fresh_at(
        &self,
        id: &T::Id,
        locale: Option<Locale>,
        now: DateTime<Utc>,
    ) -> Option<T> {
        let found = self
            .get_by_key(id, locale)
            .filter(|item| !item.is_stale_at(now, self.time_to_stale))
            .map(CacheItem::into_data);

        self.metrics.record_lookup(found.is_some());
        found
    }

    /// Remove stale items; returns how many were removed.
    pub fn prune(&self) -> usize {
        self.prune_at(Utc::now())
    }

    pub fn prune_at(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        let time_to_stale = self.time_to_stale;

        self.entries.retain(|_, bucket| {
            let before = bucket.len();
            bucket.retain(|_, item| !item.is_stale_at(now, time_to_stale));
            removed += before - bucket.len();
            !bucket.is_empty()
        });

        if removed > 0 {
            tracing::debug!(removed, "pruned stale cache items");
        }
        self.metrics.record_pruned(removed);
        removed
    }

    /// Remove everything and reset the counters.
    pub fn empty(&self) {
        self.entries.clear();
        self.metrics.reset();
    }

    /// Number of stored items across all locales, fresh or stale
    pub fn len(&self) -> usize {
        self.entries.iter().map(|bucket| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct ids
    pub fn id_count(&self) -> usize {
        self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct World {
        id: u32,
        name: &'static str,
        locale: Option<Locale>,
    }

    impl Cacheable for World {
        type Id = u32;

        fn cache_id(&self) -> u32 {
            self.id
        }

        fn cache_locale(&self) -> Option<Locale> {
            self.locale
        }
    }

    fn world(id: u32, name: &'static str, locale: Locale) -> World {
        World {
            id,
            name,
            locale: Some(locale),
        }
    }

    fn cache() -> StaleCache<World> {
        StaleCache::with_time_to_stale(Duration::from_secs(60)).expect("valid ttl")
    }

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(10_000)
    }

    #[test]
    fn test_put_same_timestamp_is_idempotent() {
        let cache = cache();
        cache.put(world(1001, "Anvil Rock", Locale::English), t0());
        cache.put(world(1001, "Anvil Rock", Locale::English), t0());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().put_count, 1);
    }

    #[test]
    fn test_put_new_timestamp_replaces() {
        let cache = cache();
        let later = t0() + TimeDelta::seconds(5);
        cache.put(world(1001, "Anvil Rock", Locale::English), t0());
        cache.put(world(1001, "Anvil Rock (renamed)", Locale::English), later);

        assert_eq!(cache.len(), 1);
        let item = cache
            .get_by_key(&1001, Some(Locale::English))
            .expect("present");
        assert_eq!(item.added_at(), later);
        assert_eq!(item.data().name, "Anvil Rock (renamed)");
    }

    #[test]
    fn test_same_id_cached_per_locale() {
        let cache = cache();
        cache.put(world(1001, "Anvil Rock", Locale::English), t0());
        cache.put(world(1001, "Ambossfels", Locale::German), t0());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.id_count(), 1);
        assert_eq!(
            cache
                .get_by_key(&1001, Some(Locale::German))
                .map(|item| item.data().name),
            Some("Ambossfels")
        );
        assert!(cache.get_by_key(&1001, Some(Locale::French)).is_none());
    }

    #[test]
    fn test_put_keyed_uses_given_locale() {
        let cache = cache();
        let now = t0() + TimeDelta::seconds(1);
        cache.put_keyed(world(1001, "Anvil Rock", Locale::English), None, t0());

        assert!(cache.get_fresh_at(&1001, None, now).is_some());
        assert!(cache.get_by_key(&1001, Some(Locale::English)).is_none());
        assert_eq!(
            cache.get_by_key(&1001, None).and_then(|item| item.locale()),
            None
        );
        assert_eq!(
            cache.get_fresh_at(&1001, None, now).and_then(|w| w.locale),
            Some(Locale::English)
        );
    }

    #[test]
    fn test_stale_items_hidden_but_reachable_by_key() {
        let cache = cache();
        cache.put(world(1001, "Anvil Rock", Locale::English), t0());

        let at_ttl = t0() + TimeDelta::seconds(60);
        assert_eq!(cache.get_at(at_ttl).len(), 1);

        let past_ttl = t0() + TimeDelta::seconds(61);
        assert!(cache.get_at(past_ttl).is_empty());
        assert!(cache.get_by_key(&1001, Some(Locale::English)).is_some());
        assert!(
            cache
                .get_fresh_at(&1001, Some(Locale::English), past_ttl)
                .is_none()
        );
    }

    #[test]
    fn test_prune_removes_stale_and_empty_buckets() {
        let cache = cache();
        cache.put(world(1001, "Anvil Rock", Locale::English), t0());
        cache.put(world(1001, "Ambossfels", Locale::German), t0() + TimeDelta::seconds(30));
        cache.put(world(2204, "Piken Square", Locale::English), t0());

        let removed = cache.prune_at(t0() + TimeDelta::seconds(70));

        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.id_count(), 1);
        assert!(cache.get_by_key(&2204, Some(Locale::English)).is_none());
        assert!(cache.get_by_key(&1001, Some(Locale::German)).is_some());
    }

    #[test]
    fn test_get_where_filters_fresh_items() {
        let cache = cache();
        cache.put(world(1001, "Anvil Rock", Locale::English), t0());
        cache.put(world(2204, "Piken Square", Locale::English), t0());

        let now = t0() + TimeDelta::seconds(1);
        let found = cache.get_where_at(now, |w| w.name.starts_with("Piken"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].data().id, 2204);
    }

    #[test]
    fn test_empty_clears_everything() {
        let cache = cache();
        cache.put(world(1001, "Anvil Rock", Locale::English), t0());
        cache.empty();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_fresh_lookup_statistics() {
        let cache = cache();
        let now = t0() + TimeDelta::seconds(1);
        cache.put(world(1001, "Anvil Rock", Locale::English), t0());

        assert!(cache.get_fresh_at(&1001, Some(Locale::English), now).is_some());
        assert!(cache.get_fresh_at(&9999, Some(Locale::English), now).is_none());

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        assert!(StaleCache::<World>::with_time_to_stale(Duration::ZERO).is_err());
    }
}
