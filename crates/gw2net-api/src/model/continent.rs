//! Continents (`v2/continents`)

use serde::Deserialize;

use gw2net_cache::Cacheable;
use gw2net_convert::primitives::{Size2, SizeConverter};
use gw2net_convert::{Context, Converter, Result, required};
use gw2net_protocol::Locale;

use crate::repository::{ALL_OPERATIONS, Endpoint, Operations};

#[derive(Debug, Clone, PartialEq)]
pub struct Continent {
    pub id: u32,
    pub name: String,
    /// Continent size in continent coordinates
    pub dimensions: Size2,
    pub min_zoom: u32,
    pub max_zoom: u32,
    pub floor_ids: Vec<i32>,
    pub locale: Option<Locale>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContinentDto {
    pub id: Option<u32>,
    pub name: String,
    pub continent_dims: Vec<f64>,
    pub min_zoom: u32,
    pub max_zoom: u32,
    pub floors: Vec<i32>,
}

#[derive(Debug, Default)]
pub struct ContinentConverter {
    dimensions: SizeConverter,
}

impl Converter<ContinentDto, Continent> for ContinentConverter {
    fn convert(&self, source: ContinentDto, context: &Context) -> Result<Continent> {
        Ok(Continent {
            id: required(source.id, "id")?,
            name: source.name,
            dimensions: self.dimensions.convert(source.continent_dims, context)?,
            min_zoom: source.min_zoom,
            max_zoom: source.max_zoom,
            floor_ids: source.floors,
            locale: context.effective_locale(),
        })
    }
}

/// `v2/continents`
#[derive(Debug, Clone, Copy)]
pub struct Continents;

impl Endpoint for Continents {
    type Id = u32;
    type Dto = ContinentDto;
    type Entity = Continent;

    const RESOURCE: &'static str = "v2/continents";
    const LOCALIZED: bool = true;
    const OPERATIONS: Operations = ALL_OPERATIONS;

    fn converter() -> Box<dyn Converter<ContinentDto, Continent>> {
        Box::new(ContinentConverter::default())
    }

    fn entity_id(entity: &Continent) -> u32 {
        entity.id
    }

    fn set_locale(entity: &mut Continent, locale: Locale) {
        entity.locale = Some(locale);
    }
}

impl Cacheable for Continent {
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
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_tyria() {
        let dto: ContinentDto = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Tyria",
                "continent_dims": [81920, 114688],
                "min_zoom": 0,
                "max_zoom": 7,
                "floors": [0, 1, 2, 3, -1]
            }"#,
        )
        .expect("valid json");

        let continent = ContinentConverter::default()
            .convert(dto, &Context::default())
            .expect("converts");

        assert_eq!(continent.name, "Tyria");
        assert_eq!(continent.dimensions.width, 81920.0);
        assert_eq!(continent.dimensions.height, 114688.0);
        assert_eq!(continent.max_zoom, 7);
        assert_eq!(continent.floor_ids, vec![0, 1, 2, 3, -1]);
        assert_eq!(continent.locale, None);
    }
}
