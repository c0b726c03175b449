//! Guild lookups against the v1 API
//!
//! `v1/guild_details.json` takes either `guild_id` or `guild_name` and returns
//! a single guild. There is no discovery, bulk or paging form.

use std::fmt;
use std::sync::Arc;

use enumflags2::make_bitflags;
use tokio_util::sync::CancellationToken;

use gw2net_convert::{Context, Converter};
use gw2net_protocol::{Request, Response, ServiceClient};

use super::{Operation, Operations, fetch, fetch_async, unsupported};
use crate::error::Result;
use crate::model::guild::{GuildConverter, GuildDto};
use crate::model::Guild;

const RESOURCE: &str = "v1/guild_details.json";

/// Lookup by guild id or by exact guild name
#[derive(Clone)]
pub struct GuildRepository {
    client: Arc<dyn ServiceClient>,
    converter: Arc<GuildConverter>,
}

impl fmt::Debug for GuildRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuildRepository")
            .field("resource", &RESOURCE)
            .finish_non_exhaustive()
    }
}

impl GuildRepository {
    pub const OPERATIONS: Operations = make_bitflags!(Operation::{Find});

    pub fn new(client: Arc<dyn ServiceClient>) -> Self {
        Self {
            client,
            converter: Arc::new(GuildConverter::default()),
        }
    }

    pub fn supports(&self, operation: Operation) -> bool {
        Self::OPERATIONS.contains(operation)
    }

    /// Guild by GUID, `None` if unknown
    pub fn find(&self, guild_id: &str) -> Result<Option<Guild>> {
        let request = Self::request("guild_id", guild_id)?;
        self.finish(fetch(&*self.client, &request)?)
    }

    pub async fn find_async(
        &self,
        guild_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Guild>> {
        let request = Self::request("guild_id", guild_id)?;
        self.finish(fetch_async(&*self.client, &request, cancel).await?)
    }

    /// Guild by exact name, `None` if unknown
    pub fn find_by_name(&self, name: &str) -> Result<Option<Guild>> {
        let request = Self::request("guild_name", name)?;
        self.finish(fetch(&*self.client, &request)?)
    }

    pub async fn find_by_name_async(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Guild>> {
        let request = Self::request("guild_name", name)?;
        self.finish(fetch_async(&*self.client, &request, cancel).await?)
    }

    /// Always [`crate::Error::Unsupported`]: the v1 API cannot list guilds
    pub fn discover(&self) -> Result<Vec<String>> {
        Err(unsupported(Operation::Discover, RESOURCE))
    }

    /// Always [`crate::Error::Unsupported`]: the v1 API has no bulk guild lookup
    pub fn find_all_by_ids(&self, _guild_ids: &[String]) -> Result<Vec<Guild>> {
        Err(unsupported(Operation::FindAllByIds, RESOURCE))
    }

    fn request(key: &str, value: &str) -> Result<Request> {
        Ok(Request::builder(RESOURCE).param(key, value).build()?)
    }

    fn finish(&self, response: Response<GuildDto>) -> Result<Option<Guild>> {
        let context = Context::default().with_metadata(response.metadata);
        response
            .content
            .map(|dto| self.converter.convert(dto, &context))
            .transpose()
            .map_err(Into::into)
    }
}
