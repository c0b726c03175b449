//! Repositories: the operations application code calls
//!
//! A resource is described once by implementing [`Endpoint`]: its path, id and
//! DTO types, the entity converter and which operations the server offers.
//! [`Repository`] then provides discovery, lookup by id, bulk lookup, fetch-all
//! and paging for it, each with a synchronous form and an `_async` form that
//! takes a [`CancellationToken`].
//!
//! Operations the endpoint does not offer fail with [`Error::Unsupported`]
//! before any request is built. A 404 is "not found", not an error.

mod cached;
mod event;
mod fetch;
mod guild;

use std::fmt::{self, Display};
use std::hash::Hash;
use std::sync::Arc;

use enumflags2::{BitFlags, bitflags, make_bitflags};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use gw2net_convert::{
    CollectionConverter, CollectionPage, CollectionPageConverter, Context, Converter,
    DictionaryRange, DictionaryRangeConverter, Present,
};
use gw2net_protocol::{Locale, Request, RequestBuilder, Response, ResponseMetadata, ServiceClient};

use crate::error::{Error, Result};

pub use cached::CachedRepository;
pub use event::EventRepository;
pub use guild::GuildRepository;

pub(crate) use fetch::{fetch, fetch_async};

/// Repository operations, used to declare what an endpoint supports
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Discover,
    Find,
    FindAll,
    FindAllByIds,
    FindPage,
}

pub type Operations = BitFlags<Operation>;

pub const ALL_OPERATIONS: Operations =
    make_bitflags!(Operation::{Discover | Find | FindAll | FindAllByIds | FindPage});

/// Every operation except `ids=all`, for resources too large to fetch at once
pub const ALL_BUT_FIND_ALL: Operations =
    make_bitflags!(Operation::{Discover | Find | FindAllByIds | FindPage});

/// Static description of a v2 resource.
pub trait Endpoint: Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Display + DeserializeOwned + Send + Sync + 'static;
    type Dto: DeserializeOwned + Send + 'static;
    type Entity: Send + 'static;

    /// Path relative to the API root, e.g. `v2/worlds`
    const RESOURCE: &'static str;

    /// Whether requests carry `lang` and entities carry a locale
    const LOCALIZED: bool;

    const OPERATIONS: Operations;

    fn converter() -> Box<dyn Converter<Self::Dto, Self::Entity>>;

    fn entity_id(entity: &Self::Entity) -> Self::Id;

    /// Record the response language on a converted entity.
    fn set_locale(_entity: &mut Self::Entity, _locale: Locale) {}
}

pub(crate) fn unsupported(operation: Operation, resource: &'static str) -> Error {
    tracing::debug!(%operation, resource, "operation not supported");
    Error::Unsupported {
        operation,
        resource,
    }
}

/// Fail with [`Error::Unsupported`] unless `operation` is in `supported`.
pub(crate) fn ensure_supported(
    supported: Operations,
    operation: Operation,
    resource: &'static str,
) -> Result<()> {
    if supported.contains(operation) {
        Ok(())
    } else {
        Err(unsupported(operation, resource))
    }
}

type Element<E> = Arc<dyn Converter<<E as Endpoint>::Dto, <E as Endpoint>::Entity>>;

struct Pipeline<E: Endpoint> {
    element: Element<E>,
    range: DictionaryRangeConverter<Present<Element<E>>, E::Id, E::Entity>,
    page: CollectionPageConverter<Present<Element<E>>>,
}

impl<E: Endpoint> Pipeline<E> {
    fn new(element: Element<E>) -> Self {
        Self {
            range: DictionaryRangeConverter::new(
                CollectionConverter::present(Arc::clone(&element)),
                E::entity_id,
            ),
            page: CollectionPageConverter::new(CollectionConverter::present(Arc::clone(
                &element,
            ))),
            element,
        }
    }
}

/// Generic repository over one [`Endpoint`].
///
/// Cheap to clone; clones share the transport and converters.
pub struct Repository<E: Endpoint> {
    client: Arc<dyn ServiceClient>,
    locale: Option<Locale>,
    pipeline: Arc<Pipeline<E>>,
}

impl<E: Endpoint> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            locale: self.locale,
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<E: Endpoint> fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("resource", &E::RESOURCE)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl<E: Endpoint> Repository<E> {
    pub fn new(client: Arc<dyn ServiceClient>) -> Self {
        Self::with_converter(client, E::converter())
    }

    /// Use a substitute entity converter
    pub fn with_converter(
        client: Arc<dyn ServiceClient>,
        converter: impl Converter<E::Dto, E::Entity> + 'static,
    ) -> Self {
        Self {
            client,
            locale: None,
            pipeline: Arc::new(Pipeline::new(Arc::new(converter))),
        }
    }

    /// Request localized strings in `locale`. Ignored by non-localized endpoints.
    #[must_use]
    pub fn with_locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> Option<Locale> {
        self.locale
    }

    pub fn resource(&self) -> &'static str {
        E::RESOURCE
    }

    pub fn supports(&self, operation: Operation) -> bool {
        E::OPERATIONS.contains(operation)
    }

    /// All ids the server knows for this resource
    pub fn discover(&self) -> Result<Vec<E::Id>> {
        let request = self.discover_request()?;
        Ok(Self::finish_discover(fetch(&*self.client, &request)?))
    }

    pub async fn discover_async(&self, cancel: &CancellationToken) -> Result<Vec<E::Id>> {
        let request = self.discover_request()?;
        Ok(Self::finish_discover(
            fetch_async(&*self.client, &request, cancel).await?,
        ))
    }

    /// A single entity, `None` if the server has no entity with this id
    pub fn find(&self, id: &E::Id) -> Result<Option<E::Entity>> {
        let request = self.find_request(id)?;
        self.finish_find(fetch(&*self.client, &request)?)
    }

    pub async fn find_async(
        &self,
        id: &E::Id,
        cancel: &CancellationToken,
    ) -> Result<Option<E::Entity>> {
        let request = self.find_request(id)?;
        self.finish_find(fetch_async(&*self.client, &request, cancel).await?)
    }

    /// Every entity (`ids=all`)
    pub fn find_all(&self) -> Result<DictionaryRange<E::Id, E::Entity>> {
        let request = self.find_all_request()?;
        self.finish_range(fetch(&*self.client, &request)?)
    }

    pub async fn find_all_async(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DictionaryRange<E::Id, E::Entity>> {
        let request = self.find_all_request()?;
        self.finish_range(fetch_async(&*self.client, &request, cancel).await?)
    }

    /// The entities with the given ids, in server order. Unknown ids are left out.
    pub fn find_all_by_ids(&self, ids: &[E::Id]) -> Result<DictionaryRange<E::Id, E::Entity>> {
        let Some(request) = self.find_all_by_ids_request(ids)? else {
            return Ok(DictionaryRange::new());
        };
        self.finish_range(fetch(&*self.client, &request)?)
    }

    pub async fn find_all_by_ids_async(
        &self,
        ids: &[E::Id],
        cancel: &CancellationToken,
    ) -> Result<DictionaryRange<E::Id, E::Entity>> {
        let Some(request) = self.find_all_by_ids_request(ids)? else {
            return Ok(DictionaryRange::new());
        };
        self.finish_range(fetch_async(&*self.client, &request, cancel).await?)
    }

    /// A page at the server's default page size
    pub fn find_page(&self, page_index: u32) -> Result<CollectionPage<E::Entity>> {
        let request = self.page_request(page_index, None)?;
        self.finish_page(fetch(&*self.client, &request)?, page_index)
    }

    pub async fn find_page_async(
        &self,
        page_index: u32,
        cancel: &CancellationToken,
    ) -> Result<CollectionPage<E::Entity>> {
        let request = self.page_request(page_index, None)?;
        self.finish_page(
            fetch_async(&*self.client, &request, cancel).await?,
            page_index,
        )
    }

    pub fn find_page_with_size(
        &self,
        page_index: u32,
        page_size: u32,
    ) -> Result<CollectionPage<E::Entity>> {
        let request = self.page_request(page_index, Some(page_size))?;
        self.finish_page(fetch(&*self.client, &request)?, page_index)
    }

    pub async fn find_page_with_size_async(
        &self,
        page_index: u32,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> Result<CollectionPage<E::Entity>> {
        let request = self.page_request(page_index, Some(page_size))?;
        self.finish_page(
            fetch_async(&*self.client, &request, cancel).await?,
            page_index,
        )
    }

    fn ensure(&self, operation: Operation) -> Result<()> {
        ensure_supported(E::OPERATIONS, operation, E::RESOURCE)
    }

    fn builder(&self) -> RequestBuilder {
        let locale = if E::LOCALIZED { self.locale } else { None };
        Request::builder(E::RESOURCE).locale(locale)
    }

    fn discover_request(&self) -> Result<Request> {
        self.ensure(Operation::Discover)?;
        Ok(Request::builder(E::RESOURCE).build()?)
    }

    fn find_request(&self, id: &E::Id) -> Result<Request> {
        self.ensure(Operation::Find)?;
        Ok(self.builder().id(id).build()?)
    }

    fn find_all_request(&self) -> Result<Request> {
        self.ensure(Operation::FindAll)?;
        Ok(self.builder().all().build()?)
    }

    /// `None` when there is nothing to ask for
    fn find_all_by_ids_request(&self, ids: &[E::Id]) -> Result<Option<Request>> {
        self.ensure(Operation::FindAllByIds)?;
        if ids.is_empty() {
            tracing::debug!(resource = E::RESOURCE, "bulk lookup without ids");
            return Ok(None);
        }
        Ok(Some(self.builder().ids(ids).build()?))
    }

    fn page_request(&self, page_index: u32, page_size: Option<u32>) -> Result<Request> {
        self.ensure(Operation::FindPage)?;
        let mut builder = self.builder().page(page_index);
        if let Some(size) = page_size {
            builder = builder.page_size(size);
        }
        Ok(builder.build()?)
    }

    fn context(&self, metadata: ResponseMetadata) -> Context {
        Context::new(self.locale).with_metadata(metadata)
    }

    fn response_locale(&self, context: &Context) -> Option<Locale> {
        if E::LOCALIZED {
            context.effective_locale()
        } else {
            None
        }
    }

    fn finish_discover(response: Response<Vec<E::Id>>) -> Vec<E::Id> {
        response.content.unwrap_or_default()
    }

    fn finish_find(&self, response: Response<E::Dto>) -> Result<Option<E::Entity>> {
        let context = self.context(response.metadata);
        let Some(dto) = response.content else {
            return Ok(None);
        };

        let mut entity = self.pipeline.element.convert(dto, &context)?;
        if let Some(locale) = self.response_locale(&context) {
            E::set_locale(&mut entity, locale);
        }
        Ok(Some(entity))
    }

    fn finish_range(
        &self,
        response: Response<Vec<E::Dto>>,
    ) -> Result<DictionaryRange<E::Id, E::Entity>> {
        let context = self.context(response.metadata);
        let Some(dtos) = response.content else {
            return Ok(DictionaryRange::new());
        };

        let mut range = self.pipeline.range.convert(dtos, &context)?;
        if let Some(locale) = self.response_locale(&context) {
            for entity in range.values_mut() {
                E::set_locale(entity, locale);
            }
        }
        Ok(range)
    }

    fn finish_page(
        &self,
        response: Response<Vec<E::Dto>>,
        page_index: u32,
    ) -> Result<CollectionPage<E::Entity>> {
        let context = self.context(response.metadata);
        let Some(dtos) = response.content else {
            return Ok(CollectionPage::default().with_page_index(page_index));
        };

        let mut page = self
            .pipeline
            .page
            .convert(dtos, &context)?
            .with_page_index(page_index);
        if let Some(locale) = self.response_locale(&context) {
            for entity in &mut page.items {
                E::set_locale(entity, locale);
            }
        }
        Ok(page)
    }
}
