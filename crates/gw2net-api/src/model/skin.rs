//! Wardrobe skins (`v2/skins`)

use enumflags2::{BitFlags, bitflags};
use serde::Deserialize;
use serde_json::Value;
use strum::EnumString;

use gw2net_cache::Cacheable;
use gw2net_convert::primitives::FlagsConverter;
use gw2net_convert::{Context, Converter, PayloadConverter, Result, TypeDispatcher, from_fn, required};
use gw2net_protocol::Locale;

use super::common::{
    ArmorKind, DamageType, GatheringKind, Rarity, Restrictions, SharedConverters, WeaponKind,
    WeightClass,
};
use crate::repository::{ALL_BUT_FIND_ALL, Endpoint, Operations};

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SkinFlag {
    ShowInWardrobe,
    NoCost,
    HideIfLocked,
    OverrideRarity,
}

/// Type-specific part of a skin, selected by the skin `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinDetails {
    Armor {
        kind: ArmorKind,
        weight_class: WeightClass,
    },
    Weapon {
        kind: WeaponKind,
        damage_type: DamageType,
    },
    Back,
    Gathering {
        kind: GatheringKind,
    },
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skin {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub rarity: Rarity,
    pub flags: BitFlags<SkinFlag>,
    pub restrictions: Restrictions,
    pub icon: Option<String>,
    pub details: SkinDetails,
    pub locale: Option<Locale>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkinDto {
    pub id: Option<u32>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub rarity: Option<String>,
    pub flags: Vec<String>,
    pub restrictions: Vec<String>,
    pub icon: Option<String>,
    pub details: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SkinDetailsDto {
    #[serde(rename = "type")]
    kind: Option<String>,
    weight_class: Option<String>,
    damage_type: Option<String>,
}

/// Discriminator and undecoded `details` of a skin
#[derive(Debug, Clone, Default)]
pub struct SkinPayload {
    pub kind: Option<String>,
    pub details: Value,
}

fn skin_type(payload: &SkinPayload) -> Option<&str> {
    payload.kind.as_deref()
}

/// Decodes `details` and hands it to one variant builder
struct VariantConverter {
    payload: PayloadConverter<SkinDetailsDto>,
    shared: SharedConverters,
    build: fn(&SharedConverters, SkinDetailsDto, &Context) -> Result<SkinDetails>,
}

impl VariantConverter {
    fn new(build: fn(&SharedConverters, SkinDetailsDto, &Context) -> Result<SkinDetails>) -> Self {
        Self {
            payload: PayloadConverter::new(),
            shared: SharedConverters::default(),
            build,
        }
    }
}

impl Converter<SkinPayload, SkinDetails> for VariantConverter {
    fn convert(&self, source: SkinPayload, context: &Context) -> Result<SkinDetails> {
        let dto = self.payload.convert(source.details, context)?;
        (self.build)(&self.shared, dto, context)
    }
}

fn armor(shared: &SharedConverters, dto: SkinDetailsDto, context: &Context) -> Result<SkinDetails> {
    Ok(SkinDetails::Armor {
        kind: shared.armor_kind.convert(dto.kind, context)?,
        weight_class: shared.weight_class.convert(dto.weight_class, context)?,
    })
}

fn weapon(shared: &SharedConverters, dto: SkinDetailsDto, context: &Context) -> Result<SkinDetails> {
    Ok(SkinDetails::Weapon {
        kind: shared.weapon_kind.convert(dto.kind, context)?,
        damage_type: shared.damage_type.convert(dto.damage_type, context)?,
    })
}

fn gathering(
    shared: &SharedConverters,
    dto: SkinDetailsDto,
    context: &Context,
) -> Result<SkinDetails> {
    Ok(SkinDetails::Gathering {
        kind: shared.gathering_kind.convert(dto.kind, context)?,
    })
}

pub struct SkinConverter {
    shared: SharedConverters,
    flags: FlagsConverter<SkinFlag>,
    details: TypeDispatcher<SkinPayload, SkinDetails>,
}

impl Default for SkinConverter {
    fn default() -> Self {
        let details = TypeDispatcher::new(
            "skin",
            skin_type,
            from_fn(|_: SkinPayload, _: &Context| Ok(SkinDetails::Unknown)),
        )
        .register("Armor", VariantConverter::new(armor))
        .register("Weapon", VariantConverter::new(weapon))
        .register("Back", from_fn(|_: SkinPayload, _: &Context| Ok(SkinDetails::Back)))
        .register("Gathering", VariantConverter::new(gathering));

        Self {
            shared: SharedConverters::default(),
            flags: FlagsConverter::new(),
            details,
        }
    }
}

impl Converter<SkinDto, Skin> for SkinConverter {
    fn convert(&self, source: SkinDto, context: &Context) -> Result<Skin> {
        let details = self.details.convert(
            SkinPayload {
                kind: source.kind,
                details: source.details,
            },
            context,
        )?;

        Ok(Skin {
            id: required(source.id, "id")?,
            name: source.name,
            description: source.description.filter(|d| !d.is_empty()),
            rarity: self.shared.rarity.convert(source.rarity, context)?,
            flags: self.flags.convert(source.flags, context)?,
            restrictions: self.shared.restrictions.convert(source.restrictions, context)?,
            icon: source.icon,
            details,
            locale: context.effective_locale(),
        })
    }
}

/// `v2/skins`; too large for `ids=all`
#[derive(Debug, Clone, Copy)]
pub struct Skins;

impl Endpoint for Skins {
    type Id = u32;
    type Dto = SkinDto;
    type Entity = Skin;

    const RESOURCE: &'static str = "v2/skins";
    const LOCALIZED: bool = true;
    const OPERATIONS: Operations = ALL_BUT_FIND_ALL;

    fn converter() -> Box<dyn Converter<SkinDto, Skin>> {
        Box::new(SkinConverter::default())
    }

    fn entity_id(entity: &Skin) -> u32 {
        entity.id
    }

    fn set_locale(entity: &mut Skin, locale: Locale) {
        entity.locale = Some(locale);
    }
}

impl Cacheable for Skin {
    type Id = u32;

    fn cache_id(&self) -> u32 {
        self.id
    }

    fn cache_locale(&self) -> Option<Locale> {
        self.locale
    }
}
