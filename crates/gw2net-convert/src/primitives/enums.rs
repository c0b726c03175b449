//! String to enum conversion with a default for unknown values

use std::marker::PhantomData;
use std::str::FromStr;

use crate::converter::{Context, Converter};
use crate::error::Result;

/// Parses a wire string into `E`, falling back to `E::default()`.
///
/// Targets derive `strum::EnumString` with `ascii_case_insensitive` and mark an
/// `Unknown` variant as `#[default]`, so new server values never fail a conversion.
pub struct EnumConverter<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E> EnumConverter<E> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E> Default for EnumConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EnumConverter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EnumConverter")
    }
}

impl<E: FromStr + Default> Converter<String, E> for EnumConverter<E> {
    fn convert(&self, source: String, _context: &Context) -> Result<E> {
        Ok(parse_or_default(&source))
    }
}

impl<E: FromStr + Default> Converter<Option<String>, E> for EnumConverter<E> {
    fn convert(&self, source: Option<String>, _context: &Context) -> Result<E> {
        Ok(source.as_deref().map(parse_or_default).unwrap_or_default())
    }
}

fn parse_or_default<E: FromStr + Default>(value: &str) -> E {
    value.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(
            value,
            target_type = std::any::type_name::<E>(),
            "unrecognized enum value, using default"
        );
        E::default()
    })
}
