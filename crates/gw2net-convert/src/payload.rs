//! Deferred decoding of variant-specific JSON

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::converter::{Context, Converter};
use crate::error::Result;

/// Decodes a raw JSON sub-object whose shape depends on a discriminator.
///
/// DTOs keep fields like `details` as [`Value`] until the variant is known; the
/// variant converter then decodes them into its own DTO. `null` or an absent
/// object decodes to `T::default()`.
pub struct PayloadConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> PayloadConverter<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for PayloadConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for PayloadConverter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PayloadConverter")
    }
}

impl<T: DeserializeOwned + Default> Converter<Value, T> for PayloadConverter<T> {
    fn convert(&self, source: Value, _context: &Context) -> Result<T> {
        if source.is_null() {
            return Ok(T::default());
        }
        Ok(serde_json::from_value(source)?)
    }
}
