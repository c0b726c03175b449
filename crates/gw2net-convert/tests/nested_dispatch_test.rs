//! Two-level polymorphic conversion composed from the public building blocks
#![allow(clippy::expect_used)]

use gw2net_convert::primitives::EnumConverter;
use gw2net_convert::{
    CollectionConverter, Context, ConvertError, Converter, DictionaryRangeConverter,
    PayloadConverter, TypeDispatcher, from_fn, required,
};
use gw2net_protocol::{Locale, ResponseMetadata};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::Value;
use strum::EnumString;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThingDto {
    id: Option<u32>,
    #[serde(rename = "type")]
    kind: Option<String>,
    details: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConsumableDto {
    #[serde(rename = "type")]
    kind: Option<String>,
    duration_ms: Option<u64>,
    rarity: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum Rarity {
    Fine,
    Rare,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Consumable {
    Food { duration_ms: u64, rarity: Rarity },
    Utility,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Details {
    Consumable(Consumable),
    Trophy,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Thing {
    id: u32,
    details: Details,
    locale: Option<Locale>,
}

fn outer_type(dto: &(Option<String>, Value)) -> Option<&str> {
    dto.0.as_deref()
}

fn inner_type(dto: &ConsumableDto) -> Option<&str> {
    dto.kind.as_deref()
}

fn consumables() -> TypeDispatcher<ConsumableDto, Consumable> {
    let rarity = EnumConverter::<Rarity>::new();
    TypeDispatcher::new(
        "consumable",
        inner_type,
        from_fn(|_: ConsumableDto, _: &Context| Ok(Consumable::Unknown)),
    )
    .register(
        "Food",
        from_fn(move |dto: ConsumableDto, context: &Context| {
            Ok(Consumable::Food {
                duration_ms: required(dto.duration_ms, "duration_ms")?,
                rarity: rarity.convert(dto.rarity, context)?,
            })
        }),
    )
    .register(
        "Utility",
        from_fn(|_: ConsumableDto, _: &Context| Ok(Consumable::Utility)),
    )
}

fn details() -> TypeDispatcher<(Option<String>, Value), Details> {
    let payload = PayloadConverter::<ConsumableDto>::new();
    let inner = consumables();
    TypeDispatcher::new(
        "thing",
        outer_type,
        from_fn(|_: (Option<String>, Value), _: &Context| Ok(Details::Unknown)),
    )
    .register(
        "Consumable",
        from_fn(move |(_, raw): (Option<String>, Value), context: &Context| {
            let dto = payload.convert(raw, context)?;
            Ok(Details::Consumable(inner.convert(dto, context)?))
        }),
    )
    .register(
        "Trophy",
        from_fn(|_: (Option<String>, Value), _: &Context| Ok(Details::Trophy)),
    )
}

fn thing_converter() -> impl Converter<ThingDto, Thing> {
    let details = details();
    from_fn(move |dto: ThingDto, context: &Context| {
        Ok(Thing {
            id: required(dto.id, "id")?,
            details: details.convert((dto.kind, dto.details), context)?,
            locale: context.effective_locale(),
        })
    })
}

fn decode(json: &str) -> Vec<ThingDto> {
    serde_json::from_str(json).expect("valid json")
}

#[test]
fn test_bulk_payload_with_nested_variants() {
    let converter = DictionaryRangeConverter::new(
        CollectionConverter::present(thing_converter()),
        |thing: &Thing| thing.id,
    );
    let context = Context::new(Some(Locale::English)).with_metadata(ResponseMetadata {
        result_count: Some(4),
        result_total: Some(51_000),
        locale: Some(Locale::German),
        ..ResponseMetadata::default()
    });

    let range = converter
        .convert(
            decode(
                r#"[
                    {"id": 12, "type": "Consumable",
                     "details": {"type": "food", "duration_ms": 1800000, "rarity": "Fine"}},
                    {"id": 13, "type": "Consumable", "details": {"type": "Utility"}},
                    {"id": 14, "type": "Consumable", "details": {"type": "Transmutation"}},
                    {"id": 15, "type": "Relic"},
                    {"id": 16, "type": "TROPHY"}
                ]"#,
            ),
            &context,
        )
        .expect("converts");

    assert_eq!(range.keys().copied().collect::<Vec<_>>(), vec![12, 13, 14, 15, 16]);
    assert_eq!(
        range.get(&12).map(|t| &t.details),
        Some(&Details::Consumable(Consumable::Food {
            duration_ms: 1_800_000,
            rarity: Rarity::Fine,
        }))
    );
    assert_eq!(
        range.get(&13).map(|t| &t.details),
        Some(&Details::Consumable(Consumable::Utility))
    );
    assert_eq!(
        range.get(&14).map(|t| &t.details),
        Some(&Details::Consumable(Consumable::Unknown))
    );
    assert_eq!(range.get(&15).map(|t| &t.details), Some(&Details::Unknown));
    assert_eq!(range.get(&16).map(|t| &t.details), Some(&Details::Trophy));
    assert!(range.values().all(|t| t.locale == Some(Locale::German)));
    assert_eq!(range.subtotal_count, 4);
    assert_eq!(range.total_count, 51_000);
}

#[test]
fn test_missing_inner_field_fails_the_whole_batch() {
    let converter = CollectionConverter::present(thing_converter());
    let err = converter
        .convert(
            decode(r#"[{"id": 1, "type": "Consumable", "details": {"type": "Food"}}]"#),
            &Context::default(),
        )
        .expect_err("duration is required for food");

    assert!(matches!(err, ConvertError::MissingField("duration_ms")));
}

#[test]
fn test_unknown_rarity_degrades_to_default() {
    let converter = thing_converter();
    let thing = converter
        .convert(
            decode(
                r#"[{"id": 2, "type": "Consumable",
                     "details": {"type": "Food", "duration_ms": 5, "rarity": "Mythic"}}]"#,
            )
            .remove(0),
            &Context::default(),
        )
        .expect("converts");

    assert_eq!(
        thing.details,
        Details::Consumable(Consumable::Food {
            duration_ms: 5,
            rarity: Rarity::Unknown,
        })
    );
    assert_eq!(thing.locale, None);
}
