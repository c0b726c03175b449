//! Dye colors (`v2/colors`)

use enumflags2::{BitFlags, bitflags};
use serde::Deserialize;
use strum::EnumString;

use gw2net_cache::Cacheable;
use gw2net_convert::primitives::{FlagsConverter, Rgb, RgbConverter};
use gw2net_convert::{Context, Converter, Optional, Result, required};
use gw2net_protocol::Locale;

use crate::repository::{ALL_OPERATIONS, Endpoint, Operations};

/// Hue, material and rarity groups a dye is listed under
#[bitflags]
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ColorCategory {
    Gray,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Vibrant,
    Leather,
    Metal,
    Starter,
    Common,
    Uncommon,
    Rare,
    Exclusive,
}

/// How a dye renders on one material
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorModel {
    pub brightness: i32,
    pub contrast: f64,
    pub hue: i32,
    pub saturation: f64,
    pub lightness: f64,
    pub rgb: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    pub id: u32,
    pub name: String,
    pub base_rgb: Rgb,
    pub cloth: ColorModel,
    pub leather: ColorModel,
    pub metal: ColorModel,
    pub fur: Option<ColorModel>,
    /// The dye item that unlocks this color
    pub item_id: Option<u32>,
    pub categories: BitFlags<ColorCategory>,
    pub locale: Option<Locale>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorModelDto {
    pub brightness: i32,
    pub contrast: f64,
    pub hue: i32,
    pub saturation: f64,
    pub lightness: f64,
    pub rgb: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorDto {
    pub id: Option<u32>,
    pub name: String,
    pub base_rgb: Vec<i64>,
    pub cloth: ColorModelDto,
    pub leather: ColorModelDto,
    pub metal: ColorModelDto,
    pub fur: Option<ColorModelDto>,
    pub item: Option<u32>,
    pub categories: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ColorModelConverter {
    rgb: RgbConverter,
}

impl Converter<ColorModelDto, ColorModel> for ColorModelConverter {
    fn convert(&self, source: ColorModelDto, context: &Context) -> Result<ColorModel> {
        Ok(ColorModel {
            brightness: source.brightness,
            contrast: source.contrast,
            hue: source.hue,
            saturation: source.saturation,
            lightness: source.lightness,
            rgb: self.rgb.convert(source.rgb, context)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct ColorConverter {
    rgb: RgbConverter,
    model: ColorModelConverter,
    fur: Optional<ColorModelConverter>,
    categories: FlagsConverter<ColorCategory>,
}

impl Converter<ColorDto, Color> for ColorConverter {
    fn convert(&self, source: ColorDto, context: &Context) -> Result<Color> {
        Ok(Color {
            id: required(source.id, "id")?,
            name: source.name,
            base_rgb: self.rgb.convert(source.base_rgb, context)?,
            cloth: self.model.convert(source.cloth, context)?,
            leather: self.model.convert(source.leather, context)?,
            metal: self.model.convert(source.metal, context)?,
            fur: self.fur.convert(source.fur, context)?,
            item_id: source.item,
            categories: self.categories.convert(source.categories, context)?,
            locale: context.effective_locale(),
        })
    }
}

/// `v2/colors`
#[derive(Debug, Clone, Copy)]
pub struct Colors;

impl Endpoint for Colors {
    type Id = u32;
    type Dto = ColorDto;
    type Entity = Color;

    const RESOURCE: &'static str = "v2/colors";
    const LOCALIZED: bool = true;
    const OPERATIONS: Operations = ALL_OPERATIONS;

    fn converter() -> Box<dyn Converter<ColorDto, Color>> {
        Box::new(ColorConverter::default())
    }

    fn entity_id(entity: &Color) -> u32 {
        entity.id
    }

    fn set_locale(entity: &mut Color, locale: Locale) {
        entity.locale = Some(locale);
    }
}

impl Cacheable for Color {
    type Id = u32;

    fn cache_id(&self) -> u32 {
        self.id
    }

    fn cache_locale(&self) -> Option<Locale> {
        self.locale
    }
}
