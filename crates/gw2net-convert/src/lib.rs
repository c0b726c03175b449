//! # gw2net-convert - DTO to entity conversion for the Guild Wars 2 API
//!
//! Wire payloads are decoded by serde into DTOs that mirror the JSON exactly.
//! Converters then turn DTOs into domain entities. Each converter handles one
//! concern and larger converters hold smaller ones as fields:
//!
//! - [`primitives`]: enums, flag arrays, positional coordinates, colors, locales
//!   and timestamps
//! - [`TypeDispatcher`]: selects a variant converter from a string discriminator,
//!   with a fallback for unknown values
//! - [`CollectionConverter`], [`DictionaryRangeConverter`] and
//!   [`CollectionPageConverter`]: arrays, keyed bulk results and pages
//!
//! Conversion fails only when required data is missing or malformed. Unknown
//! discriminators, enum values and flag tokens degrade to defaults and are
//! logged at `warn` level.
//!
//! ```rust
//! use gw2net_convert::{Context, Converter, primitives::Point2Converter};
//!
//! let point = Point2Converter.convert(vec![3.0], &Context::default())?;
//! assert_eq!((point.x, point.y), (3.0, 3.0));
//! # Ok::<(), gw2net_convert::ConvertError>(())
//! ```

pub mod collection;
pub mod converter;
pub mod dispatch;
pub mod error;
pub mod page;
pub mod payload;
pub mod primitives;
pub mod range;

pub use collection::{CollectionConverter, Present};
pub use converter::{Context, Converter, FnConverter, Optional, from_fn};
pub use dispatch::{Discriminator, TypeDispatcher};
pub use error::{ConvertError, Result, required};
pub use page::{CollectionPage, CollectionPageConverter};
pub use payload::PayloadConverter;
pub use range::{DictionaryRange, DictionaryRangeConverter};
