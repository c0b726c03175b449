//! Entry point that builds repositories over one shared transport

use std::fmt;
use std::sync::Arc;

use gw2net_cache::{Cacheable, StaleCache};
use gw2net_protocol::{HttpServiceClient, Locale, ServiceClient};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::model::{Colors, Continents, Items, Maps, Matches, Recipes, Skins, Worlds};
use crate::repository::{CachedRepository, Endpoint, EventRepository, GuildRepository, Repository};

/// Guild Wars 2 API client.
///
/// Cheap to clone. Every repository it hands out shares the same transport and
/// starts with the configured locale; use `with_locale` on a repository to
/// override it per call site.
///
/// ```no_run
/// use gw2net_api::{ClientConfig, Gw2Client, Locale};
///
/// let client = Gw2Client::new(ClientConfig::default().with_locale(Locale::German))?;
/// if let Some(map) = client.maps().find(&15)? {
///     let continent = map.continent_id.map(|id| client.continents().find(&id)).transpose()?;
///     println!("{} on {:?}", map.name, continent.flatten().map(|c| c.name));
/// }
/// # Ok::<(), gw2net_api::Error>(())
/// ```
#[derive(Clone)]
pub struct Gw2Client {
    client: Arc<dyn ServiceClient>,
    config: ClientConfig,
}

impl fmt::Debug for Gw2Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gw2Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Gw2Client {
    /// Client over HTTP using `config.base_url` and `config.http`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpServiceClient::with_config(config.base_url.clone(), config.http.clone())?;
        Ok(Self::with_service_client(Arc::new(http), config))
    }

    /// Client configured from `GW2NET_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Client over a custom transport; `config.base_url` and `config.http` are
    /// then up to the transport.
    pub fn with_service_client(client: Arc<dyn ServiceClient>, config: ClientConfig) -> Self {
        tracing::debug!(base_url = %config.base_url, locale = ?config.locale, "creating client");
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn locale(&self) -> Option<Locale> {
        self.config.locale
    }

    pub fn service_client(&self) -> Arc<dyn ServiceClient> {
        Arc::clone(&self.client)
    }

    /// Repository for any endpoint
    pub fn repository<E: Endpoint>(&self) -> Repository<E> {
        Repository::new(self.service_client()).with_locale(self.config.locale)
    }

    /// Repository for any endpoint with its own cache, configured from `config.cache`
    pub fn cached<E>(&self) -> Result<CachedRepository<E>>
    where
        E: Endpoint,
        E::Entity: Cacheable<Id = E::Id>,
    {
        let cache = StaleCache::new(&self.config.cache)?;
        Ok(CachedRepository::new(self.repository(), Arc::new(cache)))
    }

    pub fn worlds(&self) -> Repository<Worlds> {
        self.repository()
    }

    pub fn colors(&self) -> Repository<Colors> {
        self.repository()
    }

    pub fn continents(&self) -> Repository<Continents> {
        self.repository()
    }

    pub fn maps(&self) -> Repository<Maps> {
        self.repository()
    }

    pub fn items(&self) -> Repository<Items> {
        self.repository()
    }

    pub fn recipes(&self) -> Repository<Recipes> {
        self.repository()
    }

    pub fn skins(&self) -> Repository<Skins> {
        self.repository()
    }

    pub fn matches(&self) -> Repository<Matches> {
        self.repository()
    }

    pub fn guilds(&self) -> GuildRepository {
        GuildRepository::new(self.service_client())
    }

    pub fn events(&self) -> EventRepository {
        EventRepository::new(self.service_client()).with_locale(self.config.locale)
    }
}
