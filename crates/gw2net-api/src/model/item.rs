//! Items (`v2/items`)
//!
//! Items share a common header and carry a `details` object whose shape depends
//! on the item `type`. Consumables nest a second discriminator
//! (`details.type`), and unlock consumables a third (`details.unlock_type`).
//! Each level is a [`TypeDispatcher`] with an `Unknown` fallback, so new item
//! types added by the game never fail a lookup.

use std::str::FromStr;
use std::time::Duration;

use enumflags2::{BitFlags, bitflags};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::{Display, EnumString};

use gw2net_cache::Cacheable;
use gw2net_convert::primitives::{EnumConverter, FlagsConverter};
use gw2net_convert::{Context, Converter, PayloadConverter, Result, TypeDispatcher, from_fn, required};
use gw2net_protocol::Locale;

use super::common::{
    ArmorKind, DamageType, GameTypes, GatheringKind, Rarity, Restrictions, SharedConverters,
    WeaponKind, WeightClass,
};
use crate::repository::{ALL_BUT_FIND_ALL, Endpoint, Operations};

#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ItemFlag {
    AccountBindOnUse,
    AccountBound,
    Attuned,
    BulkConsume,
    DeleteWarning,
    HideSuffix,
    Infused,
    MonsterOnly,
    NoMysticForge,
    NoSalvage,
    NoSell,
    NotUpgradeable,
    NoUnderwater,
    SoulbindOnAcquire,
    SoulBindOnUse,
    Tonic,
    Unique,
}

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum InfusionFlag {
    Enrichment,
    Infusion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfusionSlot {
    pub flags: BitFlags<InfusionFlag>,
    pub item_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorDetails {
    pub kind: ArmorKind,
    pub weight_class: WeightClass,
    pub defense: u32,
    pub suffix_item_id: Option<u32>,
    pub infusion_slots: [Option<InfusionSlot>; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponDetails {
    pub kind: WeaponKind,
    pub damage_type: DamageType,
    pub min_power: u32,
    pub max_power: u32,
    pub defense: u32,
    pub suffix_item_id: Option<u32>,
    pub infusion_slots: [Option<InfusionSlot>; 2],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum TrinketKind {
    Accessory,
    Amulet,
    Ring,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum ContainerKind {
    Default,
    GiftBox,
    Immediate,
    #[strum(serialize = "OpenUI")]
    OpenUi,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum GizmoKind {
    Default,
    ContainerKey,
    RentableContractNpc,
    UnlimitedConsumable,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum UpgradeKind {
    Default,
    Gem,
    Rune,
    Sigil,
    #[default]
    Unknown,
}

/// What an unlock consumable unlocks, selected by `details.unlock_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    BagSlot,
    BankTab,
    CollectibleCapacity,
    Content,
    /// Resolve with [`crate::Gw2Client::recipes`]
    CraftingRecipe { recipe_id: u32 },
    /// Resolve with [`crate::Gw2Client::colors`]
    Dye { color_id: u32 },
    Unknown,
}

/// Consumable subtype, selected by `details.type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumable {
    Food {
        duration: Option<Duration>,
        effect: Option<String>,
    },
    Utility {
        duration: Option<Duration>,
        effect: Option<String>,
    },
    Booze,
    Currency,
    Generic,
    Immediate,
    Transmutation { skin_ids: Vec<u32> },
    Unlock(Unlock),
    Unknown,
}

/// Type-specific part of an item, selected by the item `type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDetails {
    Armor(ArmorDetails),
    Back {
        suffix_item_id: Option<u32>,
        infusion_slots: [Option<InfusionSlot>; 2],
    },
    Bag {
        size: u32,
        no_sell_or_sort: bool,
    },
    Consumable(Consumable),
    Container(ContainerKind),
    CraftingMaterial,
    Gathering(GatheringKind),
    Gizmo(GizmoKind),
    MiniPet {
        minipet_id: u32,
    },
    Tool {
        charges: u32,
    },
    Trinket {
        kind: TrinketKind,
        suffix_item_id: Option<u32>,
    },
    Trophy,
    UpgradeComponent {
        kind: UpgradeKind,
        suffix: Option<String>,
    },
    Weapon(WeaponDetails),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub level: u32,
    pub rarity: Rarity,
    pub vendor_value: u32,
    pub default_skin_id: Option<u32>,
    pub game_types: GameTypes,
    pub flags: BitFlags<ItemFlag>,
    pub restrictions: Restrictions,
    pub chat_link: String,
    pub icon: Option<String>,
    pub details: ItemDetails,
    pub locale: Option<Locale>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemDto {
    pub id: Option<u32>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub level: u32,
    pub rarity: Option<String>,
    pub vendor_value: u32,
    pub default_skin: Option<u32>,
    pub game_types: Vec<String>,
    pub flags: Vec<String>,
    pub restrictions: Vec<String>,
    pub chat_link: String,
    pub icon: Option<String>,
    pub details: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct InfusionSlotDto {
    flags: Vec<String>,
    item_id: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EquipmentDto {
    #[serde(rename = "type")]
    kind: Option<String>,
    weight_class: Option<String>,
    damage_type: Option<String>,
    defense: u32,
    min_power: u32,
    max_power: u32,
    suffix_item_id: Option<u32>,
    infusion_slots: Vec<InfusionSlotDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct BagDto {
    size: u32,
    no_sell_or_sort: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct KindOnlyDto {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct MiniPetDto {
    minipet_id: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ToolDto {
    charges: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UpgradeDto {
    #[serde(rename = "type")]
    kind: Option<String>,
    suffix: Option<String>,
}

/// `details` of a consumable, covering every subtype
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConsumableDto {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub duration_ms: Option<u64>,
    pub unlock_type: Option<String>,
    pub color_id: Option<u32>,
    pub recipe_id: Option<u32>,
    pub skins: Vec<u32>,
}

/// What the item dispatcher sees: the discriminator and the undecoded details
#[derive(Debug, Clone, Default)]
pub struct ItemPayload {
    pub kind: Option<String>,
    pub details: Value,
}

fn item_type(payload: &ItemPayload) -> Option<&str> {
    payload.kind.as_deref()
}

fn consumable_type(dto: &ConsumableDto) -> Option<&str> {
    dto.kind.as_deref()
}

fn unlock_type(dto: &ConsumableDto) -> Option<&str> {
    dto.unlock_type.as_deref()
}

fn parse<E: FromStr + Default>(value: Option<String>, context: &Context) -> Result<E> {
    EnumConverter::<E>::new().convert(value, context)
}

fn infusion_slots(
    slots: Vec<InfusionSlotDto>,
    context: &Context,
) -> Result<[Option<InfusionSlot>; 2]> {
    let flags = FlagsConverter::<InfusionFlag>::new();
    let mut out = [None; 2];
    for (slot, dto) in out.iter_mut().zip(slots) {
        *slot = Some(InfusionSlot {
            flags: flags.convert(dto.flags, context)?,
            item_id: dto.item_id,
        });
    }
    Ok(out)
}

/// Decode `details` into `D`, then build the variant from it.
fn variant<D>(
    build: fn(D, &Context) -> Result<ItemDetails>,
) -> impl Converter<ItemPayload, ItemDetails>
where
    D: DeserializeOwned + Default + 'static,
{
    let payload = PayloadConverter::<D>::new();
    from_fn(move |source: ItemPayload, context: &Context| {
        build(payload.convert(source.details, context)?, context)
    })
}

fn fixed(details: fn() -> ItemDetails) -> impl Converter<ItemPayload, ItemDetails> {
    from_fn(move |_: ItemPayload, _: &Context| Ok(details()))
}

fn armor(dto: EquipmentDto, context: &Context) -> Result<ItemDetails> {
    Ok(ItemDetails::Armor(ArmorDetails {
        kind: parse(dto.kind, context)?,
        weight_class: parse(dto.weight_class, context)?,
        defense: dto.defense,
        suffix_item_id: dto.suffix_item_id,
        infusion_slots: infusion_slots(dto.infusion_slots, context)?,
    }))
}

fn weapon(dto: EquipmentDto, context: &Context) -> Result<ItemDetails> {
    Ok(ItemDetails::Weapon(WeaponDetails {
        kind: parse(dto.kind, context)?,
        damage_type: parse(dto.damage_type, context)?,
        min_power: dto.min_power,
        max_power: dto.max_power,
        defense: dto.defense,
        suffix_item_id: dto.suffix_item_id,
        infusion_slots: infusion_slots(dto.infusion_slots, context)?,
    }))
}

fn back(dto: EquipmentDto, context: &Context) -> Result<ItemDetails> {
    Ok(ItemDetails::Back {
        suffix_item_id: dto.suffix_item_id,
        infusion_slots: infusion_slots(dto.infusion_slots, context)?,
    })
}

fn trinket(dto: EquipmentDto, context: &Context) -> Result<ItemDetails> {
    Ok(ItemDetails::Trinket {
        kind: parse(dto.kind, context)?,
        suffix_item_id: dto.suffix_item_id,
    })
}

fn duration(duration_ms: Option<u64>) -> Option<Duration> {
    duration_ms.map(Duration::from_millis)
}

/// Builds [`Unlock`] values from consumable details
pub struct UnlockConverter {
    dispatcher: TypeDispatcher<ConsumableDto, Unlock>,
}

impl Default for UnlockConverter {
    fn default() -> Self {
        let dispatcher = TypeDispatcher::new(
            "unlock",
            unlock_type,
            from_fn(|_: ConsumableDto, _: &Context| Ok(Unlock::Unknown)),
        )
        .register("BagSlot", from_fn(|_: ConsumableDto, _: &Context| Ok(Unlock::BagSlot)))
        .register("BankTab", from_fn(|_: ConsumableDto, _: &Context| Ok(Unlock::BankTab)))
        .register(
            "CollectibleCapacity",
            from_fn(|_: ConsumableDto, _: &Context| Ok(Unlock::CollectibleCapacity)),
        )
        .register("Content", from_fn(|_: ConsumableDto, _: &Context| Ok(Unlock::Content)))
        .register(
            "CraftingRecipe",
            from_fn(|dto: ConsumableDto, _: &Context| {
                Ok(Unlock::CraftingRecipe {
                    recipe_id: required(dto.recipe_id, "details.recipe_id")?,
                })
            }),
        )
        .register(
            "Dye",
            from_fn(|dto: ConsumableDto, _: &Context| {
                Ok(Unlock::Dye {
                    color_id: required(dto.color_id, "details.color_id")?,
                })
            }),
        );

        Self { dispatcher }
    }
}

impl Converter<ConsumableDto, Consumable> for UnlockConverter {
    fn convert(&self, source: ConsumableDto, context: &Context) -> Result<Consumable> {
        Ok(Consumable::Unlock(self.dispatcher.convert(source, context)?))
    }
}

/// Builds [`Consumable`] values from an item's `details`
pub struct ConsumableConverter {
    payload: PayloadConverter<ConsumableDto>,
    dispatcher: TypeDispatcher<ConsumableDto, Consumable>,
}

impl Default for ConsumableConverter {
    fn default() -> Self {
        let dispatcher = TypeDispatcher::new(
            "consumable",
            consumable_type,
            from_fn(|_: ConsumableDto, _: &Context| Ok(Consumable::Unknown)),
        )
        .register(
            "Food",
            from_fn(|dto: ConsumableDto, _: &Context| {
                Ok(Consumable::Food {
                    duration: duration(dto.duration_ms),
                    effect: dto.description,
                })
            }),
        )
        .register(
            "Utility",
            from_fn(|dto: ConsumableDto, _: &Context| {
                Ok(Consumable::Utility {
                    duration: duration(dto.duration_ms),
                    effect: dto.description,
                })
            }),
        )
        .register("Booze", from_fn(|_: ConsumableDto, _: &Context| Ok(Consumable::Booze)))
        .register(
            "Currency",
            from_fn(|_: ConsumableDto, _: &Context| Ok(Consumable::Currency)),
        )
        .register(
            "Generic",
            from_fn(|_: ConsumableDto, _: &Context| Ok(Consumable::Generic)),
        )
        .register(
            "Immediate",
            from_fn(|_: ConsumableDto, _: &Context| Ok(Consumable::Immediate)),
        )
        .register(
            "Transmutation",
            from_fn(|dto: ConsumableDto, _: &Context| {
                Ok(Consumable::Transmutation { skin_ids: dto.skins })
            }),
        )
        .register("Unlock", UnlockConverter::default());

        Self {
            payload: PayloadConverter::new(),
            dispatcher,
        }
    }
}

impl Converter<ItemPayload, ItemDetails> for ConsumableConverter {
    fn convert(&self, source: ItemPayload, context: &Context) -> Result<ItemDetails> {
        let dto = self.payload.convert(source.details, context)?;
        Ok(ItemDetails::Consumable(self.dispatcher.convert(dto, context)?))
    }
}

/// Builds [`Item`] values: base fields here, `details` by item type.
pub struct ItemConverter {
    shared: SharedConverters,
    flags: FlagsConverter<ItemFlag>,
    details: TypeDispatcher<ItemPayload, ItemDetails>,
}

impl Default for ItemConverter {
    fn default() -> Self {
        let details = TypeDispatcher::new("item", item_type, fixed(|| ItemDetails::Unknown))
            .register("Armor", variant(armor))
            .register("Back", variant(back))
            .register(
                "Bag",
                variant(|dto: BagDto, _: &Context| {
                    Ok(ItemDetails::Bag {
                        size: dto.size,
                        no_sell_or_sort: dto.no_sell_or_sort,
                    })
                }),
            )
            .register("Consumable", ConsumableConverter::default())
            .register(
                "Container",
                variant(|dto: KindOnlyDto, context: &Context| {
                    Ok(ItemDetails::Container(parse(dto.kind, context)?))
                }),
            )
            .register("CraftingMaterial", fixed(|| ItemDetails::CraftingMaterial))
            .register(
                "Gathering",
                variant(|dto: KindOnlyDto, context: &Context| {
                    Ok(ItemDetails::Gathering(parse(dto.kind, context)?))
                }),
            )
            .register(
                "Gizmo",
                variant(|dto: KindOnlyDto, context: &Context| {
                    Ok(ItemDetails::Gizmo(parse(dto.kind, context)?))
                }),
            )
            .register(
                "MiniPet",
                variant(|dto: MiniPetDto, _: &Context| {
                    Ok(ItemDetails::MiniPet {
                        minipet_id: dto.minipet_id,
                    })
                }),
            )
            .register(
                "Tool",
                variant(|dto: ToolDto, _: &Context| Ok(ItemDetails::Tool { charges: dto.charges })),
            )
            .register("Trinket", variant(trinket))
            .register("Trophy", fixed(|| ItemDetails::Trophy))
            .register(
                "UpgradeComponent",
                variant(|dto: UpgradeDto, context: &Context| {
                    Ok(ItemDetails::UpgradeComponent {
                        kind: parse(dto.kind, context)?,
                        suffix: dto.suffix,
                    })
                }),
            )
            .register("Weapon", variant(weapon));

        Self {
            shared: SharedConverters::default(),
            flags: FlagsConverter::new(),
            details,
        }
    }
}

impl Converter<ItemDto, Item> for ItemConverter {
    fn convert(&self, source: ItemDto, context: &Context) -> Result<Item> {
        let details = self.details.convert(
            ItemPayload {
                kind: source.kind,
                details: source.details,
            },
            context,
        )?;

        Ok(Item {
            id: required(source.id, "id")?,
            name: source.name,
            description: source.description.filter(|d| !d.is_empty()),
            level: source.level,
            rarity: self.shared.rarity.convert(source.rarity, context)?,
            vendor_value: source.vendor_value,
            default_skin_id: source.default_skin,
            game_types: self.shared.game_types.convert(source.game_types, context)?,
            flags: self.flags.convert(source.flags, context)?,
            restrictions: self.shared.restrictions.convert(source.restrictions, context)?,
            chat_link: source.chat_link,
            icon: source.icon,
            details,
            locale: context.effective_locale(),
        })
    }
}

/// `v2/items`; too large for `ids=all`
#[derive(Debug, Clone, Copy)]
pub struct Items;

impl Endpoint for Items {
    type Id = u32;
    type Dto = ItemDto;
    type Entity = Item;

    const RESOURCE: &'static str = "v2/items";
    const LOCALIZED: bool = true;
    const OPERATIONS: Operations = ALL_BUT_FIND_ALL;

    fn converter() -> Box<dyn Converter<ItemDto, Item>> {
        Box::new(ItemConverter::default())
    }

    fn entity_id(entity: &Item) -> u32 {
        entity.id
    }

    fn set_locale(entity: &mut Item, locale: Locale) {
        entity.locale = Some(locale);
    }
}

impl Cacheable for Item {
    type Id = u32;

    fn cache_id(&self) -> u32 {
        self.id
    }

    fn cache_locale(&self) -> Option<Locale> {
        self.locale
    }
}
