//! World vs. World matches (`v2/wvw/matches`)

use chrono::{DateTime, Utc};
use serde::Deserialize;
use strum::{Display, EnumString};

use gw2net_cache::Cacheable;
use gw2net_convert::primitives::{EnumConverter, TimestampConverter};
use gw2net_convert::{Context, Converter, Result, required};
use gw2net_protocol::Locale;

use crate::repository::{ALL_OPERATIONS, Endpoint, Operations};

/// The four maps of a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum BattlegroundKind {
    RedHome,
    BlueHome,
    GreenHome,
    Center,
    #[default]
    Unknown,
}

/// Per-team values, keyed by team color on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TeamValues<T> {
    pub red: T,
    pub blue: T,
    pub green: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battleground {
    pub id: u32,
    pub kind: BattlegroundKind,
    pub scores: TeamValues<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// `{region}-{tier}`, e.g. `1-2`
    pub match_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Resolve with [`crate::Gw2Client::worlds`]
    pub red_world_id: u32,
    pub blue_world_id: u32,
    pub green_world_id: u32,
    pub scores: TeamValues<u64>,
    pub battlegrounds: Vec<Battleground>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BattlegroundDto {
    pub id: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub scores: TeamValues<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchDto {
    pub id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub scores: TeamValues<u64>,
    pub worlds: TeamValues<Option<u32>>,
    pub maps: Vec<BattlegroundDto>,
}

#[derive(Debug, Default)]
pub struct MatchConverter {
    timestamp: TimestampConverter,
    kind: EnumConverter<BattlegroundKind>,
}

impl Converter<MatchDto, Match> for MatchConverter {
    fn convert(&self, source: MatchDto, context: &Context) -> Result<Match> {
        let battlegrounds = source
            .maps
            .into_iter()
            .map(|map| {
                Ok(Battleground {
                    id: required(map.id, "maps.id")?,
                    kind: self.kind.convert(map.kind, context)?,
                    scores: map.scores,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Match {
            match_id: required(source.id, "id")?,
            start_time: self
                .timestamp
                .convert(required(source.start_time, "start_time")?, context)?,
            end_time: self
                .timestamp
                .convert(required(source.end_time, "end_time")?, context)?,
            red_world_id: required(source.worlds.red, "worlds.red")?,
            blue_world_id: required(source.worlds.blue, "worlds.blue")?,
            green_world_id: required(source.worlds.green, "worlds.green")?,
            scores: source.scores,
            battlegrounds,
        })
    }
}

/// `v2/wvw/matches`; ids are strings
#[derive(Debug, Clone, Copy)]
pub struct Matches;

impl Endpoint for Matches {
    type Id = String;
    type Dto = MatchDto;
    type Entity = Match;

    const RESOURCE: &'static str = "v2/wvw/matches";
    const LOCALIZED: bool = false;
    const OPERATIONS: Operations = ALL_OPERATIONS;

    fn converter() -> Box<dyn Converter<MatchDto, Match>> {
        Box::new(MatchConverter::default())
    }

    fn entity_id(entity: &Match) -> String {
        entity.match_id.clone()
    }
}

impl Cacheable for Match {
    type Id = String;

    fn cache_id(&self) -> String {
        self.match_id.clone()
    }

    fn cache_locale(&self) -> Option<Locale> {
        None
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const MATCH: &str = r#"{
        "id": "1-1",
        "start_time": "2015-06-26T00:00:00Z",
        "end_time": "2015-07-03T00:00:00Z",
        "scores": {"red": 169331, "blue": 246780, "green": 216241},
        "worlds": {"red": 1019, "blue": 1008, "green": 1020},
        "maps": [
            {"id": 38, "type": "Center", "scores": {"red": 59803, "blue": 70391, "green": 75549}},
            {"id": 1099, "type": "RedHome", "scores": {"red": 44101, "blue": 64237, "green": 39117}}
        ]
    }"#;

    #[test]
    fn test_convert_match() {
        let dto: MatchDto = serde_json::from_str(MATCH).expect("valid json");
        let wvw_match = MatchConverter::default()
            .convert(dto, &Context::default())
            .expect("converts");

        assert_eq!(wvw_match.match_id, "1-1");
        assert_eq!(
            wvw_match.start_time,
            Utc.with_ymd_and_hms(2015, 6, 26, 0, 0, 0).single().expect("valid")
        );
        assert_eq!(wvw_match.red_world_id, 1019);
        assert_eq!(wvw_match.scores.blue, 246780);
        assert_eq!(wvw_match.battlegrounds.len(), 2);
        assert_eq!(wvw_match.battlegrounds[1].kind, BattlegroundKind::RedHome);
    }

    #[test]
    fn test_malformed_timestamp_is_an_error() {
        let mut dto: MatchDto = serde_json::from_str(MATCH).expect("valid json");
        dto.end_time = Some("next friday".to_string());
        assert!(
            MatchConverter::default()
                .convert(dto, &Context::default())
                .is_err()
        );
    }
}
