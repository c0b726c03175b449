//! Enums and flags shared by several entity families

use enumflags2::{BitFlags, bitflags};
use strum::{Display, EnumString};

use gw2net_convert::primitives::{EnumConverter, FlagsConverter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Rarity {
    Junk,
    Basic,
    Fine,
    Masterwork,
    Rare,
    Exotic,
    Ascended,
    Legendary,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum ArmorKind {
    Boots,
    Coat,
    Gloves,
    Helm,
    HelmAquatic,
    Leggings,
    Shoulders,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum WeightClass {
    Clothing,
    Light,
    Medium,
    Heavy,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum WeaponKind {
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
    LargeBundle,
    SmallBundle,
    Toy,
    ToyTwoHanded,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum DamageType {
    Physical,
    Fire,
    Ice,
    Lightning,
    Choking,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum GatheringKind {
    Foraging,
    Logging,
    Mining,
    #[default]
    Unknown,
}

/// Game modes an item or skin may be used in
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum GameType {
    Activity,
    Dungeon,
    Pve,
    Pvp,
    PvpLobby,
    Wvw,
}

/// Races, professions and genders allowed to use an item or skin
#[bitflags]
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Restriction {
    Asura,
    Charr,
    Human,
    Norn,
    Sylvari,
    Elementalist,
    Engineer,
    Guardian,
    Mesmer,
    Necromancer,
    Ranger,
    Revenant,
    Thief,
    Warrior,
    Female,
}

pub type GameTypes = BitFlags<GameType>;
pub type Restrictions = BitFlags<Restriction>;

/// Converters every polymorphic family needs for its base fields
#[derive(Debug, Default)]
pub(crate) struct SharedConverters {
    pub rarity: EnumConverter<Rarity>,
    pub game_types: FlagsConverter<GameType>,
    pub restrictions: FlagsConverter<Restriction>,
    pub armor_kind: EnumConverter<ArmorKind>,
    pub weight_class: EnumConverter<WeightClass>,
    pub weapon_kind: EnumConverter<WeaponKind>,
    pub damage_type: EnumConverter<DamageType>,
    pub gathering_kind: EnumConverter<GatheringKind>,
}
