//! Cache statistics
//!
//! Counters are updated with relaxed atomics on the hot path and read as a
//! [`CacheStats`] snapshot.

#![allow(clippy::cast_precision_loss)] // Ratios accept precision loss

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Keyed lookups that found a fresh item
    pub hit_count: u64,
    /// Keyed lookups that found nothing or only a stale item
    pub miss_count: u64,
    /// Puts that stored or replaced an item
    pub put_count: u64,
    /// Stale items removed by pruning
    pub prune_count: u64,
    /// Items currently stored, fresh or stale
    pub entry_count: usize,
}

impl CacheStats {
    pub fn lookup_count(&self) -> u64 {
        self.hit_count + self.miss_count
    }

    /// Hits divided by lookups, `0.0` before the first lookup
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookup_count();
        if lookups == 0 {
            0.0
        } else {
            self.hit_count as f64 / lookups as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct AtomicCacheMetrics {
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    put_count: AtomicU64,
    prune_count: AtomicU64,
}

impl AtomicCacheMetrics {
    pub fn record_lookup(&self, hit: bool) {
        if hit {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_put(&self) {
        self.put_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pruned(&self, count: usize) {
        self.prune_count.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.hit_count.store(0, Ordering::Relaxed);
        self.miss_count.store(0, Ordering::Relaxed);
        self.put_count.store(0, Ordering::Relaxed);
        self.prune_count.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self, entry_count: usize) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            put_count: self.put_count.load(Ordering::Relaxed),
            prune_count: self.prune_count.load(Ordering::Relaxed),
            entry_count,
        }
    }
}
