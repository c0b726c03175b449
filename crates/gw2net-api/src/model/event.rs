//! Dynamic events (`v1/event_details.json`, `v1/event_names.json`)

use std::collections::BTreeMap;

use enumflags2::{BitFlags, bitflags};
use serde::Deserialize;
use strum::EnumString;

use gw2net_convert::primitives::{
    FlagsConverter, Point2, Point2Converter, Point3, Point3Converter, RangeConverter, ValueRange,
};
use gw2net_convert::{Context, Converter, Result, TypeDispatcher, from_fn};
use gw2net_protocol::Locale;

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EventFlag {
    GroupEvent,
    MapWide,
    MetaEvent,
    DungeonEvent,
}

/// Area in which an event is active, selected by `location.type`
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Sphere {
        center: Point3,
        radius: f64,
        rotation: f64,
    },
    Cylinder {
        center: Point3,
        height: f64,
        radius: f64,
        rotation: f64,
    },
    Polygon {
        center: Point3,
        z_range: ValueRange<f64>,
        points: Vec<Point2>,
    },
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// GUID, e.g. `EED8A79F-B374-4AE6-BA6F-B7B98D9D7142`
    pub event_id: String,
    pub name: String,
    pub level: u32,
    /// Resolve with [`crate::Gw2Client::maps`]
    pub map_id: u32,
    pub flags: BitFlags<EventFlag>,
    pub location: Location,
    pub locale: Option<Locale>,
}

/// Entry of `v1/event_names.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventNameDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocationDto {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub center: Vec<f64>,
    pub height: f64,
    pub radius: f64,
    pub rotation: f64,
    pub z_range: Vec<f64>,
    pub points: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventDto {
    pub name: String,
    pub level: u32,
    pub map_id: u32,
    pub flags: Vec<String>,
    pub location: LocationDto,
}

/// `v1/event_details.json` wraps events in an object keyed by event id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventDetailsDto {
    pub events: BTreeMap<String, EventDto>,
}

fn location_type(dto: &LocationDto) -> Option<&str> {
    dto.kind.as_deref()
}

#[derive(Debug, Default)]
struct ShapeConverters {
    center: Point3Converter,
    point: Point2Converter,
    range: RangeConverter,
}

fn sphere(shapes: &ShapeConverters, dto: LocationDto, context: &Context) -> Result<Location> {
    Ok(Location::Sphere {
        center: shapes.center.convert(dto.center, context)?,
        radius: dto.radius,
        rotation: dto.rotation,
    })
}

fn cylinder(shapes: &ShapeConverters, dto: LocationDto, context: &Context) -> Result<Location> {
    Ok(Location::Cylinder {
        center: shapes.center.convert(dto.center, context)?,
        height: dto.height,
        radius: dto.radius,
        rotation: dto.rotation,
    })
}

fn polygon(shapes: &ShapeConverters, dto: LocationDto, context: &Context) -> Result<Location> {
    let points = dto
        .points
        .into_iter()
        .map(|point| shapes.point.convert(point, context))
        .collect::<Result<Vec<_>>>()?;

    Ok(Location::Polygon {
        center: shapes.center.convert(dto.center, context)?,
        z_range: shapes.range.convert(dto.z_range, context)?,
        points,
    })
}

fn shape(
    build: fn(&ShapeConverters, LocationDto, &Context) -> Result<Location>,
) -> impl Converter<LocationDto, Location> {
    let shapes = ShapeConverters::default();
    from_fn(move |dto: LocationDto, context: &Context| build(&shapes, dto, context))
}

pub struct EventConverter {
    flags: FlagsConverter<EventFlag>,
    location: TypeDispatcher<LocationDto, Location>,
}

impl Default for EventConverter {
    fn default() -> Self {
        let location = TypeDispatcher::new(
            "event location",
            location_type,
            from_fn(|_: LocationDto, _: &Context| Ok(Location::Unknown)),
        )
        .register("sphere", shape(sphere))
        .register("cylinder", shape(cylinder))
        .register("poly", shape(polygon));

        Self {
            flags: FlagsConverter::new(),
            location,
        }
    }
}

impl Converter<(String, EventDto), Event> for EventConverter {
    fn convert(&self, (event_id, source): (String, EventDto), context: &Context) -> Result<Event> {
        Ok(Event {
            event_id,
            name: source.name,
            level: source.level,
            map_id: source.map_id,
            flags: self.flags.convert(source.flags, context)?,
            location: self.location.convert(source.location, context)?,
            locale: context.effective_locale(),
        })
    }
}
