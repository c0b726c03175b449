//! # gw2net-cache - Staleness cache for API entities
//!
//! [`StaleCache`] stores entities keyed by (id, locale) together with the time
//! they were added. Items older than the configured time-to-stale disappear from
//! enumeration and fresh lookups but stay reachable through
//! [`StaleCache::get_by_key`] until [`StaleCache::prune`] removes them.
//!
//! ```rust
//! use std::time::Duration;
//! use gw2net_cache::{Cacheable, StaleCache};
//! use gw2net_protocol::Locale;
//!
//! #[derive(Clone)]
//! struct World { id: u32, locale: Option<Locale> }
//!
//! impl Cacheable for World {
//!     type Id = u32;
//!     fn cache_id(&self) -> u32 { self.id }
//!     fn cache_locale(&self) -> Option<Locale> { self.locale }
//! }
//!
//! let cache = StaleCache::with_time_to_stale(Duration::from_secs(300))?;
//! cache.put_now(World { id: 1001, locale: Some(Locale::English) });
//! assert!(cache.get_fresh(&1001, Some(Locale::English)).is_some());
//! assert!(cache.get_fresh(&1001, Some(Locale::German)).is_none());
//! # Ok::<(), gw2net_cache::CacheError>(())
//! ```

pub mod config;
pub mod error;
pub mod item;
pub mod stale_cache;
pub mod stats;

pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use item::{CacheItem, Cacheable};
pub use stale_cache::StaleCache;
pub use stats::CacheStats;
