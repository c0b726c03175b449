//! Guild details (`v1/guild_details.json`)
//!
//! The v1 endpoint reports the emblem as flat fields
//! (`background_id`, `background_color_id`, ...). Later revisions nest it as
//! `background {id, colors}` and `foreground {id, colors}`. Both shapes decode
//! into the same [`Emblem`]; when both are present the nested one wins.

use enumflags2::{BitFlags, bitflags};
use serde::Deserialize;
use strum::EnumString;

use gw2net_convert::primitives::FlagsConverter;
use gw2net_convert::{Context, Converter, Optional, Result, required};

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum EmblemFlag {
    FlipBackgroundHorizontal,
    FlipBackgroundVertical,
    FlipForegroundHorizontal,
    FlipForegroundVertical,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmblemLayer {
    pub id: u32,
    /// Resolve with [`crate::Gw2Client::colors`]
    pub color_ids: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emblem {
    pub background: EmblemLayer,
    pub foreground: EmblemLayer,
    pub flags: BitFlags<EmblemFlag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    /// GUID, e.g. `75FD83CF-0C45-4834-BC4C-097F93A487AF`
    pub guild_id: String,
    pub name: String,
    pub tag: String,
    pub emblem: Option<Emblem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmblemLayerDto {
    pub id: u32,
    pub colors: Vec<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmblemDto {
    pub background: Option<EmblemLayerDto>,
    pub foreground: Option<EmblemLayerDto>,
    pub background_id: Option<u32>,
    pub foreground_id: Option<u32>,
    pub background_color_id: Option<u32>,
    pub foreground_primary_color_id: Option<u32>,
    pub foreground_secondary_color_id: Option<u32>,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GuildDto {
    pub id: Option<String>,
    pub guild_id: Option<String>,
    pub name: Option<String>,
    pub guild_name: Option<String>,
    pub tag: String,
    pub emblem: Option<EmblemDto>,
}

#[derive(Debug, Default)]
pub struct EmblemConverter {
    flags: FlagsConverter<EmblemFlag>,
}

impl Converter<EmblemDto, Emblem> for EmblemConverter {
    fn convert(&self, source: EmblemDto, context: &Context) -> Result<Emblem> {
        let background = match source.background {
            Some(layer) => EmblemLayer {
                id: layer.id,
                color_ids: layer.colors,
            },
            None => EmblemLayer {
                id: source.background_id.unwrap_or_default(),
                color_ids: source.background_color_id.into_iter().collect(),
            },
        };

        let foreground = match source.foreground {
            Some(layer) => EmblemLayer {
                id: layer.id,
                color_ids: layer.colors,
            },
            None => EmblemLayer {
                id: source.foreground_id.unwrap_or_default(),
                color_ids: source
                    .foreground_primary_color_id
                    .into_iter()
                    .chain(source.foreground_secondary_color_id)
                    .collect(),
            },
        };

        Ok(Emblem {
            background,
            foreground,
            flags: self.flags.convert(source.flags, context)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct GuildConverter {
    emblem: Optional<EmblemConverter>,
}

impl Converter<GuildDto, Guild> for GuildConverter {
    fn convert(&self, source: GuildDto, context: &Context) -> Result<Guild> {
        Ok(Guild {
            guild_id: required(source.id.or(source.guild_id), "guild_id")?,
            name: source.name.or(source.guild_name).unwrap_or_default(),
            tag: source.tag,
            emblem: self.emblem.convert(source.emblem, context)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(json: &str) -> Guild {
        let dto: GuildDto = serde_json::from_str(json).expect("valid json");
        GuildConverter::default()
            .convert(dto, &Context::default())
            .expect("converts")
    }

    #[test]
    fn test_legacy_emblem() {
        let guild = convert(
            r#"{
                "guild_id": "75FD83CF-0C45-4834-BC4C-097F93A487AF",
                "guild_name": "Veritas",
                "tag": "VS",
                "emblem": {
                    "background_id": 27,
                    "foreground_id": 114,
                    "flags": ["FlipBackgroundHorizontal", "FlipForegroundVertical"],
                    "background_color_id": 11,
                    "foreground_primary_color_id": 584,
                    "foreground_secondary_color_id": 64
                }
            }"#,
        );

        assert_eq!(guild.name, "Veritas");
        let emblem = guild.emblem.expect("has emblem");
        assert_eq!(
            emblem.flags,
            EmblemFlag::FlipBackgroundHorizontal | EmblemFlag::FlipForegroundVertical
        );
        assert_eq!(emblem.flags.len(), 2);
        assert_eq!(
            emblem.background,
            EmblemLayer {
                id: 27,
                color_ids: vec![11]
            }
        );
        assert_eq!(
            emblem.foreground,
            EmblemLayer {
                id: 114,
                color_ids: vec![584, 64]
            }
        );
    }

    #[test]
    fn test_current_shape_wins() {
        let guild = convert(
            r#"{
                "id": "116E0C0E-0035-44A9-BB22-4AE3E23127E5",
                "guild_id": "ignored",
                "name": "Edge Of Destiny",
                "tag": "EoD",
                "emblem": {
                    "background": {"id": 2, "colors": [473]},
                    "foreground": {"id": 40, "colors": [673, 71]},
                    "background_id": 99,
                    "flags": []
                }
            }"#,
        );

        assert_eq!(guild.guild_id, "116E0C0E-0035-44A9-BB22-4AE3E23127E5");
        assert_eq!(guild.name, "Edge Of Destiny");
        let emblem = guild.emblem.expect("has emblem");
        assert_eq!(emblem.background.id, 2);
        assert_eq!(emblem.foreground.color_ids, vec![673, 71]);
        assert!(emblem.flags.is_empty());
    }

    #[test]
    fn test_guild_without_emblem() {
        let guild = convert(r#"{"guild_id": "ABC", "guild_name": "Plain", "tag": "PL"}"#);
        assert_eq!(guild.emblem, None);
    }
}
