//! The converter contract and its context

use std::marker::PhantomData;
use std::sync::Arc;

use gw2net_protocol::{Locale, ResponseMetadata};

use crate::error::Result;

/// State shared by every converter taking part in one response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    /// Locale the request asked for
    pub locale: Option<Locale>,
    /// Paging and localization headers of the response being converted
    pub metadata: ResponseMetadata,
}

impl Context {
    pub fn new(locale: Option<Locale>) -> Self {
        Self {
            locale,
            metadata: ResponseMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: ResponseMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The language the server answered in, else the requested one
    pub fn effective_locale(&self) -> Option<Locale> {
        self.metadata.locale.or(self.locale)
    }
}

/// Turns a wire value into a domain value.
///
/// Converters are pure: no I/O, no retries, no shared mutable state. They are
/// composed by holding smaller converters as fields.
pub trait Converter<S, T>: Send + Sync {
    fn convert(&self, source: S, context: &Context) -> Result<T>;
}

impl<S, T, C> Converter<S, T> for Box<C>
where
    C: Converter<S, T> + ?Sized,
{
    fn convert(&self, source: S, context: &Context) -> Result<T> {
        (**self).convert(source, context)
    }
}

impl<S, T, C> Converter<S, T> for Arc<C>
where
    C: Converter<S, T> + ?Sized,
{
    fn convert(&self, source: S, context: &Context) -> Result<T> {
        (**self).convert(source, context)
    }
}

/// Converter built from a function, see [`from_fn`].
pub struct FnConverter<F, S, T> {
    f: F,
    _marker: PhantomData<fn(S) -> T>,
}

impl<F, S, T> Converter<S, T> for FnConverter<F, S, T>
where
    F: Fn(S, &Context) -> Result<T> + Send + Sync,
{
    fn convert(&self, source: S, context: &Context) -> Result<T> {
        (self.f)(source, context)
    }
}

pub fn from_fn<F, S, T>(f: F) -> FnConverter<F, S, T>
where
    F: Fn(S, &Context) -> Result<T> + Send + Sync,
{
    FnConverter {
        f,
        _marker: PhantomData,
    }
}

/// Lifts a converter over `Option`: `None` stays `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optional<C>(pub C);

impl<S, T, C> Converter<Option<S>, Option<T>> for Optional<C>
where
    C: Converter<S, T>,
{
    fn convert(&self, source: Option<S>, context: &Context) -> Result<Option<T>> {
        source.map(|value| self.0.convert(value, context)).transpose()
    }
}
