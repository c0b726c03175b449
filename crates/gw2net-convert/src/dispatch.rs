//! Discriminator-based dispatch to per-variant converters
//!
//! Polymorphic payloads carry a string naming their concrete shape, either at the
//! top level (`"type": "Weapon"`) or nested (`"details": {"type": "Food"}`). A
//! [`TypeDispatcher`] reads that string, looks it up case-insensitively in its
//! registry and hands the whole source to the matching converter. Missing or
//! unregistered discriminators go to the fallback, which produces the family's
//! `Unknown` variant, so dispatch always yields a value.

use std::collections::HashMap;
use std::fmt;

use crate::converter::{Context, Converter};
use crate::error::Result;

/// Reads the discriminator out of a source value.
pub type Discriminator<S> = fn(&S) -> Option<&str>;

pub struct TypeDispatcher<S, T> {
    family: &'static str,
    discriminator: Discriminator<S>,
    variants: HashMap<String, Box<dyn Converter<S, T>>>,
    fallback: Box<dyn Converter<S, T>>,
}

impl<S, T> TypeDispatcher<S, T> {
    /// `family` names the polymorphic type in log output.
    pub fn new(
        family: &'static str,
        discriminator: Discriminator<S>,
        fallback: impl Converter<S, T> + 'static,
    ) -> Self {
        Self {
            family,
            discriminator,
            variants: HashMap::new(),
            fallback: Box::new(fallback),
        }
    }

    /// Register the converter for one discriminator value, replacing any earlier one.
    #[must_use]
    pub fn register(mut self, name: &str, converter: impl Converter<S, T> + 'static) -> Self {
        self.variants
            .insert(name.to_ascii_lowercase(), Box::new(converter));
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.variants.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl<S, T> fmt::Debug for TypeDispatcher<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.variants.keys().collect();
        names.sort();
        f.debug_struct("TypeDispatcher")
            .field("family", &self.family)
            .field("variants", &names)
            .finish_non_exhaustive()
    }
}

impl<S, T> Converter<S, T> for TypeDispatcher<S, T> {
    fn convert(&self, source: S, context: &Context) -> Result<T> {
        let Some(name) = (self.discriminator)(&source).map(|d| d.trim().to_ascii_lowercase())
        else {
            tracing::debug!(family = self.family, "no discriminator, using fallback");
            return self.fallback.convert(source, context);
        };

        match self.variants.get(&name) {
            Some(converter) => converter.convert(source, context),
            None => {
                tracing::warn!(
                    family = self.family,
                    discriminator = name.as_str(),
                    "unknown discriminator, using fallback"
                );
                self.fallback.convert(source, context)
            }
        }
    }
}
