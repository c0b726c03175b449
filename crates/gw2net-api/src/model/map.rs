//! Maps (`v2/maps`)

use serde::Deserialize;
use strum::{Display, EnumString};

use gw2net_cache::Cacheable;
use gw2net_convert::primitives::{
    EnumConverter, RangeConverter, Rectangle, RectangleConverter, ValueRange,
};
use gw2net_convert::{Context, Converter, Result, required};
use gw2net_protocol::Locale;

use crate::repository::{ALL_OPERATIONS, Endpoint, Operations};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum MapKind {
    Public,
    Instance,
    Tutorial,
    Pvp,
    Gvg,
    Center,
    RedHome,
    BlueHome,
    GreenHome,
    EdgeOfTheMists,
    JumpPuzzle,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub id: u32,
    pub name: String,
    pub levels: ValueRange<i32>,
    pub default_floor: i32,
    pub kind: MapKind,
    pub floors: Vec<i32>,
    pub region_id: Option<u32>,
    pub region_name: Option<String>,
    /// Resolve with [`crate::Gw2Client::continents`]
    pub continent_id: Option<u32>,
    pub continent_name: Option<String>,
    /// Map bounds in map coordinates
    pub map_rect: Rectangle,
    /// Map bounds in continent coordinates
    pub continent_rect: Rectangle,
    pub locale: Option<Locale>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MapDto {
    pub id: Option<u32>,
    pub name: String,
    pub min_level: i32,
    pub max_level: i32,
    pub default_floor: i32,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub floors: Vec<i32>,
    pub region_id: Option<u32>,
    pub region_name: Option<String>,
    pub continent_id: Option<u32>,
    pub continent_name: Option<String>,
    pub map_rect: Vec<Vec<f64>>,
    pub continent_rect: Vec<Vec<f64>>,
}

#[derive(Debug, Default)]
pub struct MapConverter {
    kind: EnumConverter<MapKind>,
    levels: RangeConverter,
    rect: RectangleConverter,
}

impl Converter<MapDto, Map> for MapConverter {
    fn convert(&self, source: MapDto, context: &Context) -> Result<Map> {
        Ok(Map {
            id: required(source.id, "id")?,
            name: source.name,
            levels: self
                .levels
                .convert(vec![source.min_level, source.max_level], context)?,
            default_floor: source.default_floor,
            kind: self.kind.convert(source.kind, context)?,
            floors: source.floors,
            region_id: source.region_id,
            region_name: source.region_name,
            continent_id: source.continent_id,
            continent_name: source.continent_name,
            map_rect: self.rect.convert(source.map_rect, context)?,
            continent_rect: self.rect.convert(source.continent_rect, context)?,
            locale: context.effective_locale(),
        })
    }
}

/// `v2/maps`
#[derive(Debug, Clone, Copy)]
pub struct Maps;

impl Endpoint for Maps {
    type Id = u32;
    type Dto = MapDto;
    type Entity = Map;

    const RESOURCE: &'static str = "v2/maps";
    const LOCALIZED: bool = true;
    const OPERATIONS: Operations = ALL_OPERATIONS;

    fn converter() -> Box<dyn Converter<MapDto, Map>> {
        Box::new(MapConverter::default())
    }

    fn entity_id(entity: &Map) -> u32 {
        entity.id
    }

    fn set_locale(entity: &mut Map, locale: Locale) {
        entity.locale = Some(locale);
    }
}

impl Cacheable for Map {
    type Id = u32;

    fn cache_id(&self) -> u32 {
        self.id
    }

    fn cache_locale(&self) -> Option<Locale> {
        self.locale
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use gw2net_convert::primitives::Point2;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_queensdale() {
        let dto: MapDto = serde_json::from_str(
            r#"{
                "id": 15,
                "name": "Queensdale",
                "min_level": 1,
                "max_level": 17,
                "default_floor": 1,
                "type": "Public",
                "floors": [1, 3, 2, 0],
                "region_id": 4,
                "region_name": "Kryta",
                "continent_id": 1,
                "continent_name": "Tyria",
                "map_rect": [[-43008, -27648], [43008, 30720]],
                "continent_rect": [[9856, 11648], [13440, 14080]]
            }"#,
        )
        .expect("valid json");

        let map = MapConverter::default()
            .convert(dto, &Context::default())
            .expect("converts");

        assert_eq!(map.kind, MapKind::Public);
        assert_eq!(map.levels, ValueRange { min: 1, max: 17 });
        assert!(map.levels.contains(&10));
        assert_eq!(map.continent_id, Some(1));
        assert_eq!(map.continent_rect.top_left, Point2::new(9856.0, 11648.0));
        assert_eq!(map.continent_rect.size().width, 3584.0);
    }

    #[test]
    fn test_unknown_map_kind() {
        let dto = MapDto {
            id: Some(1),
            kind: Some("Raid".to_string()),
            ..MapDto::default()
        };
        let map = MapConverter::default()
            .convert(dto, &Context::default())
            .expect("converts");
        assert_eq!(map.kind, MapKind::Unknown);
    }
}
