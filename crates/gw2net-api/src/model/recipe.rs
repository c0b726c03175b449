//! Crafting recipes (`v2/recipes`)

use std::time::Duration;

use enumflags2::{BitFlags, bitflags};
use serde::Deserialize;
use strum::{Display, EnumString};

use gw2net_cache::Cacheable;
use gw2net_convert::primitives::{EnumConverter, FlagsConverter};
use gw2net_convert::{Context, Converter, Result, required};
use gw2net_protocol::Locale;

use crate::repository::{ALL_BUT_FIND_ALL, Endpoint, Operations};

/// What a recipe produces, selected by the recipe `type`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum RecipeKind {
    // Weapons
    Axe,
    Dagger,
    Focus,
    Greatsword,
    Hammer,
    Harpoon,
    LongBow,
    Mace,
    Pistol,
    Rifle,
    Scepter,
    Shield,
    ShortBow,
    Speargun,
    Staff,
    Sword,
    Torch,
    Trident,
    Warhorn,
    // Armor
    Boots,
    Coat,
    Gloves,
    Helm,
    Leggings,
    Shoulders,
    // Trinkets
    Amulet,
    Earring,
    Ring,
    // Cooking
    Dessert,
    Feast,
    IngredientCooking,
    Meal,
    Seasoning,
    Snack,
    Soup,
    Food,
    // Crafting components
    Component,
    Inscription,
    Insignia,
    LegendaryComponent,
    Refinement,
    RefinementEctoplasm,
    RefinementObsidian,
    // Guild
    GuildConsumable,
    GuildDecoration,
    GuildConsumableWvw,
    // Other
    Backpack,
    Bag,
    Bulk,
    Consumable,
    Dye,
    Potion,
    UpgradeComponent,
    #[default]
    Unknown,
}

#[bitflags]
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Discipline {
    Armorsmith,
    Artificer,
    Chef,
    Huntsman,
    Jeweler,
    Leatherworker,
    Scribe,
    Tailor,
    Weaponsmith,
}

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum RecipeFlag {
    AutoLearned,
    LearnedFromItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingredient {
    pub item_id: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: u32,
    pub kind: RecipeKind,
    /// Resolve with [`crate::Gw2Client::items`]
    pub output_item_id: u32,
    pub output_item_count: u32,
    pub time_to_craft: Duration,
    pub disciplines: BitFlags<Discipline>,
    pub min_rating: u32,
    pub flags: BitFlags<RecipeFlag>,
    pub ingredients: Vec<Ingredient>,
    pub chat_link: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngredientDto {
    pub item_id: Option<u32>,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipeDto {
    pub id: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub output_item_id: Option<u32>,
    pub output_item_count: u32,
    pub time_to_craft_ms: u64,
    pub disciplines: Vec<String>,
    pub min_rating: u32,
    pub flags: Vec<String>,
    pub ingredients: Vec<IngredientDto>,
    pub chat_link: String,
}

#[derive(Debug, Default)]
pub struct RecipeConverter {
    kind: EnumConverter<RecipeKind>,
    disciplines: FlagsConverter<Discipline>,
    flags: FlagsConverter<RecipeFlag>,
}

impl Converter<RecipeDto, Recipe> for RecipeConverter {
    fn convert(&self, source: RecipeDto, context: &Context) -> Result<Recipe> {
        let ingredients = source
            .ingredients
            .into_iter()
            .map(|ingredient| {
                Ok(Ingredient {
                    item_id: required(ingredient.item_id, "ingredients.item_id")?,
                    count: ingredient.count,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Recipe {
            id: required(source.id, "id")?,
            kind: self.kind.convert(source.kind, context)?,
            output_item_id: required(source.output_item_id, "output_item_id")?,
            output_item_count: source.output_item_count,
            time_to_craft: Duration::from_millis(source.time_to_craft_ms),
            disciplines: self.disciplines.convert(source.disciplines, context)?,
            min_rating: source.min_rating,
            flags: self.flags.convert(source.flags, context)?,
            ingredients,
            chat_link: source.chat_link,
        })
    }
}

/// `v2/recipes`; not localized, too large for `ids=all`
#[derive(Debug, Clone, Copy)]
pub struct Recipes;

impl Endpoint for Recipes {
    type Id = u32;
    type Dto = RecipeDto;
    type Entity = Recipe;

    const RESOURCE: &'static str = "v2/recipes";
    const LOCALIZED: bool = false;
    const OPERATIONS: Operations = ALL_BUT_FIND_ALL;

    fn converter() -> Box<dyn Converter<RecipeDto, Recipe>> {
        Box::new(RecipeConverter::default())
    }

    fn entity_id(entity: &Recipe) -> u32 {
        entity.id
    }
}

impl Cacheable for Recipe {
    type Id = u32;

    fn cache_id(&self) -> u32 {
        self.id
    }

    fn cache_locale(&self) -> Option<Locale> {
        None
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_feast() {
        let dto: RecipeDto = serde_json::from_str(
            r#"{
                "id": 7319,
                "type": "Feast",
                "output_item_id": 46742,
                "output_item_count": 1,
                "time_to_craft_ms": 1000,
                "disciplines": ["Chef"],
                "min_rating": 400,
                "flags": ["LearnedFromItem"],
                "ingredients": [
                    {"item_id": 24315, "count": 5},
                    {"item_id": 19684, "count": 50}
                ],
                "chat_link": "[&CZccAAA=]"
            }"#,
        )
        .expect("valid json");

        let recipe = RecipeConverter::default()
            .convert(dto, &Context::default())
            .expect("converts");

        assert_eq!(recipe.kind, RecipeKind::Feast);
        assert_eq!(recipe.output_item_id, 46742);
        assert_eq!(recipe.time_to_craft, Duration::from_secs(1));
        assert_eq!(recipe.disciplines, Discipline::Chef);
        assert_eq!(recipe.flags, RecipeFlag::LearnedFromItem);
        assert_eq!(
            recipe.ingredients,
            vec![
                Ingredient {
                    item_id: 24315,
                    count: 5
                },
                Ingredient {
                    item_id: 19684,
                    count: 50
                },
            ]
        );
    }

    #[test]
    fn test_unknown_type_and_discipline() {
        let dto = RecipeDto {
            id: Some(1),
            kind: Some("Relic".to_string()),
            output_item_id: Some(2),
            disciplines: vec!["Weaponsmith".to_string(), "Homesteader".to_string()],
            ..RecipeDto::default()
        };
        let recipe = RecipeConverter::default()
            .convert(dto, &Context::default())
            .expect("converts");
        assert_eq!(recipe.kind, RecipeKind::Unknown);
        assert_eq!(recipe.disciplines, Discipline::Weaponsmith);
    }

    #[test]
    fn test_missing_output_item_is_an_error() {
        let dto = RecipeDto {
            id: Some(1),
            ..RecipeDto::default()
        };
        assert!(
            RecipeConverter::default()
                .convert(dto, &Context::default())
                .is_err()
        );
    }
}
