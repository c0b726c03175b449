//! String token arrays to bit flags

use std::marker::PhantomData;
use std::str::FromStr;

use enumflags2::{BitFlag, BitFlags};

use crate::converter::{Context, Converter};
use crate::error::Result;

/// ORs an array of flag names into a [`BitFlags`] value.
///
/// The flag enum derives `strum::EnumString` next to `#[bitflags]`. Tokens the
/// enum does not know are dropped with a warning.
pub struct FlagsConverter<F> {
    _marker: PhantomData<fn() -> F>,
}

impl<F> FlagsConverter<F> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<F> Default for FlagsConverter<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> std::fmt::Debug for FlagsConverter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FlagsConverter")
    }
}

impl<F: BitFlag + FromStr> Converter<Vec<String>, BitFlags<F>> for FlagsConverter<F> {
    fn convert(&self, source: Vec<String>, _context: &Context) -> Result<BitFlags<F>> {
        Ok(source
            .iter()
            .fold(BitFlags::empty(), |flags, token| match token.trim().parse::<F>() {
                Ok(flag) => flags | flag,
                Err(_) => {
                    tracing::warn!(
                        token = token.as_str(),
                        flag_type = std::any::type_name::<F>(),
                        "ignoring unknown flag"
                    );
                    flags
                }
            }))
    }
}
