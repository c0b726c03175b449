//! Single-field converters composed into entity converters

mod enums;
mod flags;
mod geometry;
mod scalar;

pub use enums::EnumConverter;
pub use flags::FlagsConverter;
pub use geometry::{
    Point2, Point2Converter, Point3, Point3Converter, RangeConverter, Rectangle,
    RectangleConverter, Rgb, RgbConverter, Size2, SizeConverter, ValueRange, fill_axes,
};
pub use scalar::{LocaleConverter, TimestampConverter};
