//! Domain entities, their wire DTOs and converters
//!
//! Each module mirrors one API resource. DTOs match the JSON field for field
//! and are only used while converting; entities refer to each other through
//! plain ids (`map_id`, `output_item_id`, `red_world_id`) that callers resolve
//! with the matching repository.

pub mod color;
pub mod common;
pub mod continent;
pub mod event;
pub mod guild;
pub mod item;
pub mod map;
pub mod recipe;
pub mod skin;
pub mod world;
pub mod wvw;

pub use color::{Color, ColorCategory, ColorModel, Colors};
pub use common::{
    ArmorKind, DamageType, GameType, GameTypes, GatheringKind, Rarity, Restriction,
    Restrictions, WeaponKind, WeightClass,
};
pub use continent::{Continent, Continents};
pub use event::{Event, EventFlag, Location};
pub use guild::{Emblem, EmblemFlag, EmblemLayer, Guild};
pub use item::{
    ArmorDetails, Consumable, ContainerKind, GizmoKind, InfusionFlag, InfusionSlot, Item,
    ItemDetails, ItemFlag, Items, TrinketKind, Unlock, UpgradeKind, WeaponDetails,
};
pub use map::{Map, MapKind, Maps};
pub use recipe::{Discipline, Ingredient, Recipe, RecipeFlag, RecipeKind, Recipes};
pub use skin::{Skin, SkinDetails, SkinFlag, Skins};
pub use world::{Population, World, Worlds};
pub use wvw::{Battleground, BattlegroundKind, Match, Matches, TeamValues};
