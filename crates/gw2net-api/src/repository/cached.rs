//! Repository with a staleness cache in front of it
//!
//! Lookups by id consult the cache first. Only fresh items are served; stale
//! ones are refetched and replaced. Every entity fetched through any operation
//! is stored, so `find_all` warms the cache for later `find` calls.
//!
//! Entries are keyed by the locale the repository asks for, not the one the
//! server answered in. The API reports `Content-Language: en` even when no
//! `lang` was sent and falls back to English for untranslated text, so keying
//! by the answered locale would never match the next lookup.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use gw2net_cache::{CacheStats, Cacheable, StaleCache};
use gw2net_convert::{CollectionPage, DictionaryRange};
use gw2net_protocol::Locale;

use super::{Endpoint, Operation, Repository};
use crate::error::Result;

pub struct CachedRepository<E>
where
    E: Endpoint,
    E::Entity: Cacheable<Id = E::Id>,
{
    inner: Repository<E>,
    cache: Arc<StaleCache<E::Entity>>,
}

impl<E> Clone for CachedRepository<E>
where
    E: Endpoint,
    E::Entity: Cacheable<Id = E::Id>,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<E> fmt::Debug for CachedRepository<E>
where
    E: Endpoint,
    E::Entity: Cacheable<Id = E::Id>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedRepository")
            .field("inner", &self.inner)
            .field("stats", &self.cache.stats())
            .finish()
    }
}

impl<E> CachedRepository<E>
where
    E: Endpoint,
    E::Entity: Cacheable<Id = E::Id>,
{
    pub fn new(inner: Repository<E>, cache: Arc<StaleCache<E::Entity>>) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &Repository<E> {
        &self.inner
    }

    pub fn cache(&self) -> &StaleCache<E::Entity> {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.inner.supports(operation)
    }

    /// Locale half of the cache key for this repository's lookups
    fn cache_locale(&self) -> Option<Locale> {
        if E::LOCALIZED { self.inner.locale() } else { None }
    }

    /// Ids are never cached; always asks the server
    pub fn discover(&self) -> Result<Vec<E::Id>> {
        self.inner.discover()
    }

    pub async fn discover_async(&self, cancel: &CancellationToken) -> Result<Vec<E::Id>> {
        self.inner.discover_async(cancel).await
    }

    pub fn find(&self, id: &E::Id) -> Result<Option<E::Entity>> {
        if let Some(hit) = self.cache.get_fresh(id, self.cache_locale()) {
            return Ok(Some(hit));
        }
        let found = self.inner.find(id)?;
        Ok(self.store_one(found))
    }

    pub async fn find_async(
        &self,
        id: &E::Id,
        cancel: &CancellationToken,
    ) -> Result<Option<E::Entity>> {
        if let Some(hit) = self.cache.get_fresh(id, self.cache_locale()) {
            return Ok(Some(hit));
        }
        let found = self.inner.find_async(id, cancel).await?;
        Ok(self.store_one(found))
    }

    pub fn find_all(&self) -> Result<DictionaryRange<E::Id, E::Entity>> {
        let range = self.inner.find_all()?;
        Ok(self.store_range(range))
    }

    pub async fn find_all_async(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DictionaryRange<E::Id, E::Entity>> {
        let range = self.inner.find_all_async(cancel).await?;
        Ok(self.store_range(range))
    }

    /// Fetches only the ids without a fresh cache entry. The result lists
    /// fetched entities in server order, then cache hits in request order.
    pub fn find_all_by_ids(&self, ids: &[E::Id]) -> Result<DictionaryRange<E::Id, E::Entity>> {
        let (hits, missing) = self.partition(ids)?;
        let fetched = self.inner.find_all_by_ids(&missing)?;
        Ok(self.merge(fetched, hits))
    }

    pub async fn find_all_by_ids_async(
        &self,
        ids: &[E::Id],
        cancel: &CancellationToken,
    ) -> Result<DictionaryRange<E::Id, E::Entity>> {
        let (hits, missing) = self.partition(ids)?;
        let fetched = self.inner.find_all_by_ids_async(&missing, cancel).await?;
        Ok(self.merge(fetched, hits))
    }

    pub fn find_page(&self, page_index: u32) -> Result<CollectionPage<E::Entity>> {
        let page = self.inner.find_page(page_index)?;
        Ok(self.store_page(page))
    }

    pub async fn find_page_async(
        &self,
        page_index: u32,
        cancel: &CancellationToken,
    ) -> Result<CollectionPage<E::Entity>> {
        let page = self.inner.find_page_async(page_index, cancel).await?;
        Ok(self.store_page(page))
    }

    pub fn find_page_with_size(
        &self,
        page_index: u32,
        page_size: u32,
    ) -> Result<CollectionPage<E::Entity>> {
        let page = self.inner.find_page_with_size(page_index, page_size)?;
        Ok(self.store_page(page))
    }

    pub async fn find_page_with_size_async(
        &self,
        page_index: u32,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> Result<CollectionPage<E::Entity>> {
        let page = self
            .inner
            .find_page_with_size_async(page_index, page_size, cancel)
            .await?;
        Ok(self.store_page(page))
    }

    /// Split requested ids into fresh cache hits and ids to fetch.
    fn partition(&self, ids: &[E::Id]) -> Result<(Vec<E::Entity>, Vec<E::Id>)> {
        // Unsupported must surface even when everything is cached.
        super::ensure_supported(E::OPERATIONS, Operation::FindAllByIds, E::RESOURCE)?;

        let locale = self.cache_locale();
        let mut hits = Vec::new();
        let mut missing = Vec::new();
        for id in ids {
            match self.cache.get_fresh(id, locale) {
                Some(hit) => hits.push(hit),
                None => missing.push(id.clone()),
            }
        }

        tracing::debug!(
            resource = E::RESOURCE,
            hits = hits.len(),
            missing = missing.len(),
            "bulk lookup through cache"
        );
        Ok((hits, missing))
    }

    fn merge(
        &self,
        fetched: DictionaryRange<E::Id, E::Entity>,
        hits: Vec<E::Entity>,
    ) -> DictionaryRange<E::Id, E::Entity> {
        let fetched_total = fetched.total_count;
        let mut merged = self.store_range(fetched);
        for hit in hits {
            let id = E::entity_id(&hit);
            if !merged.contains_key(&id) {
                merged.insert(id, hit);
            }
        }
        merged.subtotal_count = merged.len();
        merged.total_count = fetched_total.max(merged.len());
        merged
    }

    fn store(&self, entity: &E::Entity) {
        self.cache
            .put_keyed(entity.clone(), self.cache_locale(), Utc::now());
    }

    fn store_one(&self, entity: Option<E::Entity>) -> Option<E::Entity> {
        if let Some(entity) = &entity {
            self.store(entity);
        }
        entity
    }

    fn store_range(
        &self,
        range: DictionaryRange<E::Id, E::Entity>,
    ) -> DictionaryRange<E::Id, E::Entity> {
        for entity in range.values() {
            self.store(entity);
        }
        range
    }

    fn store_page(&self, page: CollectionPage<E::Entity>) -> CollectionPage<E::Entity> {
        for entity in &page.items {
            self.store(entity);
        }
        page
    }
}
