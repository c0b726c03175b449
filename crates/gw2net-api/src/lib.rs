//! # gw2net-api - Typed repositories for the Guild Wars 2 public API
//!
//! [`Gw2Client`] hands out one repository per resource. Every repository call
//! runs the same pipeline:
//!
//! 1. build a [`Request`] with the resource path, ids or paging and the locale
//! 2. send it through a [`ServiceClient`] (HTTP by default)
//! 3. decode the envelope and convert the DTOs into entities
//! 4. optionally store the entities in a [`StaleCache`]
//!
//! Each operation has a blocking form and an `_async` form taking a
//! [`CancellationToken`].
//!
//! ```rust,no_run
//! use gw2net_api::{CancellationToken, ClientConfig, Gw2Client, Locale};
//!
//! # async fn run() -> gw2net_api::Result<()> {
//! let client = Gw2Client::new(ClientConfig::default().with_locale(Locale::French))?;
//! let cancel = CancellationToken::new();
//!
//! let page = client.items().find_page_with_size_async(2, 50, &cancel).await?;
//! println!("{} of {} items", page.len(), page.total_count);
//!
//! let worlds = client.worlds().find_all_by_ids_async(&[1001, 2204], &cancel).await?;
//! for (id, world) in &worlds {
//!     println!("{id}: {} ({})", world.name, world.population);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Unknown ids are not errors: `find` returns `Ok(None)` and bulk lookups leave
//! them out. Operations a resource does not offer fail with
//! [`Error::Unsupported`] before anything is sent.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod repository;

pub use client::Gw2Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use repository::{
    ALL_BUT_FIND_ALL, ALL_OPERATIONS, CachedRepository, Endpoint, EventRepository,
    GuildRepository, Operation, Operations, Repository,
};

pub use gw2net_cache::{CacheConfig, CacheStats, Cacheable, StaleCache};
pub use gw2net_convert::{CollectionPage, DictionaryRange};
pub use gw2net_protocol::{
    CancellationToken, HttpConfig, HttpServiceClient, Locale, Request, ServiceClient,
};
