//! Worlds (`v2/worlds`)

use serde::Deserialize;
use strum::{Display, EnumString};

use gw2net_cache::Cacheable;
use gw2net_convert::primitives::EnumConverter;
use gw2net_convert::{Context, Converter, Result, required};
use gw2net_protocol::Locale;

use crate::repository::{ALL_OPERATIONS, Endpoint, Operations};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Population {
    Low,
    Medium,
    High,
    VeryHigh,
    Full,
    #[default]
    Unknown,
}

/// A game server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    pub id: u32,
    pub name: String,
    pub population: Population,
    pub locale: Option<Locale>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorldDto {
    pub id: Option<u32>,
    #[serde(default)]
    pub name: String,
    pub population: Option<String>,
}

#[derive(Debug, Default)]
pub struct WorldConverter {
    population: EnumConverter<Population>,
}

impl Converter<WorldDto, World> for WorldConverter {
    fn convert(&self, source: WorldDto, context: &Context) -> Result<World> {
        Ok(World {
            id: required(source.id, "id")?,
            name: source.name,
            population: self.population.convert(source.population, context)?,
            locale: context.effective_locale(),
        })
    }
}

/// `v2/worlds`
#[derive(Debug, Clone, Copy)]
pub struct Worlds;

impl Endpoint for Worlds {
    type Id = u32;
    type Dto = WorldDto;
    type Entity = World;

    const RESOURCE: &'static str = "v2/worlds";
    const LOCALIZED: bool = true;
    const OPERATIONS: Operations = ALL_OPERATIONS;

    fn converter() -> Box<dyn Converter<WorldDto, World>> {
        Box::new(WorldConverter::default())
    }

    fn entity_id(entity: &World) -> u32 {
        entity.id
    }

    fn set_locale(entity: &mut World, locale: Locale) {
        entity.locale = Some(locale);
    }
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
