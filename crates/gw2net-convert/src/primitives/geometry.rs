//! Positional arrays to points, sizes, ranges and rectangles
//!
//! The API sends coordinates as bare JSON arrays and sometimes shortens them:
//! `[]` means the default value and `[v]` means every axis is `v`. Longer
//! arrays than the target's arity are rejected.

use serde::{Deserialize, Serialize};

use crate::converter::{Context, Converter};
use crate::error::{ConvertError, Result};

/// Expand a positional array to exactly `N` values.
///
/// Shorter non-empty arrays keep their values and fill the rest with defaults.
pub fn fill_axes<T: Copy + Default, const N: usize>(values: &[T]) -> Result<[T; N]> {
    let mut out = [T::default(); N];
    match values {
        [] => {}
        [v] => out = [*v; N],
        _ if values.len() > N => {
            return Err(ConvertError::Arity {
                expected: N,
                actual: values.len(),
            });
        }
        _ => out[..values.len()].copy_from_slice(values),
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size2 {
    pub width: f64,
    pub height: f64,
}

/// Closed interval sent as `[min, max]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> ValueRange<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.min <= *value && *value <= self.max
    }
}

/// Axis-aligned rectangle sent as `[[x1, y1], [x2, y2]]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub top_left: Point2,
    pub bottom_right: Point2,
}

impl Rectangle {
    pub fn size(&self) -> Size2 {
        Size2 {
            width: (self.bottom_right.x - self.top_left.x).abs(),
            height: (self.bottom_right.y - self.top_left.y).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Point2Converter;

impl Converter<Vec<f64>, Point2> for Point2Converter {
    fn convert(&self, source: Vec<f64>, _context: &Context) -> Result<Point2> {
        let [x, y] = fill_axes(&source)?;
        Ok(Point2 { x, y })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Point3Converter;

impl Converter<Vec<f64>, Point3> for Point3Converter {
    fn convert(&self, source: Vec<f64>, _context: &Context) -> Result<Point3> {
        let [x, y, z] = fill_axes(&source)?;
        Ok(Point3 { x, y, z })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SizeConverter;

impl Converter<Vec<f64>, Size2> for SizeConverter {
    fn convert(&self, source: Vec<f64>, _context: &Context) -> Result<Size2> {
        let [width, height] = fill_axes(&source)?;
        Ok(Size2 { width, height })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RangeConverter;

impl<T: Copy + Default> Converter<Vec<T>, ValueRange<T>> for RangeConverter {
    fn convert(&self, source: Vec<T>, _context: &Context) -> Result<ValueRange<T>> {
        let [min, max] = fill_axes(&source)?;
        Ok(ValueRange { min, max })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RectangleConverter {
    point: Point2Converter,
}

impl Converter<Vec<Vec<f64>>, Rectangle> for RectangleConverter {
    fn convert(&self, source: Vec<Vec<f64>>, context: &Context) -> Result<Rectangle> {
        if source.len() > 2 {
            return Err(ConvertError::Arity {
                expected: 2,
                actual: source.len(),
            });
        }

        let mut corners = source.into_iter();
        let top_left = match corners.next() {
            Some(corner) => self.point.convert(corner, context)?,
            None => Point2::default(),
        };
        let bottom_right = match corners.next() {
            Some(corner) => self.point.convert(corner, context)?,
            None => top_left,
        };

        Ok(Rectangle {
            top_left,
            bottom_right,
        })
    }
}

/// `[r, g, b]` color channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RgbConverter;

impl Converter<Vec<i64>, Rgb> for RgbConverter {
    fn convert(&self, source: Vec<i64>, _context: &Context) -> Result<Rgb> {
        let [red, green, blue] = fill_axes(&source)?;
        let channel = |value: i64| {
            u8::try_from(value)
                .map_err(|_| ConvertError::invalid("rgb", format!("channel {value} out of range")))
        };
        Ok(Rgb {
            red: channel(red)?,
            green: channel(green)?,
            blue: channel(blue)?,
        })
    }
}
