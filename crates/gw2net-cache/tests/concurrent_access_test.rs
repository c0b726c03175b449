//! Shared cache access from many tasks
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use gw2net_cache::{CacheConfig, Cacheable, StaleCache};
use gw2net_protocol::Locale;
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
struct Skin {
    id: u32,
    locale: Option<Locale>,
}

impl Cacheable for Skin {
    type Id = u32;

    fn cache_id(&self) -> u32 {
        self.id
    }

    fn cache_locale(&self) -> Option<Locale> {
        self.locale
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_puts_keep_one_item_per_key() {
    let cache = Arc::new(
        StaleCache::<Skin>::new(&CacheConfig::long_lived()).expect("valid config"),
    );
    let inserted_at = Utc::now();

    let mut tasks = tokio::task::JoinSet::new();
    for task in 0..8u32 {
        let cache = Arc::clone(&cache);
        tasks.spawn(async move {
            for id in 0..100u32 {
                let locale = Locale::ALL[((id + task) as usize) % Locale::ALL.len()];
                cache.put(Skin { id, locale: Some(locale) }, inserted_at);
                cache.put(Skin { id, locale: None }, inserted_at);
            }
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.expect("task completes");
    }

    // 100 ids, each with a `None` entry plus at most five locales
    assert_eq!(cache.id_count(), 100);
    assert!(cache.len() >= 200);
    assert!(cache.len() <= 600);
    assert_eq!(cache.get().len(), cache.len());
}

#[tokio::test]
async fn test_prune_while_reading() {
    let cache = Arc::new(
        StaleCache::<Skin>::with_time_to_stale(Duration::from_secs(60)).expect("valid ttl"),
    );
    let old = Utc::now() - TimeDelta::minutes(10);
    let fresh = Utc::now();

    for id in 0..50 {
        cache.put(Skin { id, locale: Some(Locale::English) }, old);
    }
    for id in 50..60 {
        cache.put(Skin { id, locale: Some(Locale::English) }, fresh);
    }

    let reader = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.get().len() })
    };
    let removed = cache.prune();
    let visible = reader.await.expect("reader completes");

    assert_eq!(removed, 50);
    assert_eq!(visible, 10);
    assert_eq!(cache.len(), 10);
}
