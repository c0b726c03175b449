//! Element-wise conversion of wire arrays

use crate::converter::{Context, Converter};
use crate::error::Result;

/// Converts every element in input order, dropping elements the inner
/// converter maps to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionConverter<C> {
    element: C,
}

impl<C> CollectionConverter<C> {
    /// `element` returns `None` for values that should be skipped.
    pub fn new(element: C) -> Self {
        Self { element }
    }
}

impl<C> CollectionConverter<Present<C>> {
    /// Wrap a converter that never skips.
    pub fn present(element: C) -> Self {
        Self {
            element: Present(element),
        }
    }
}

impl<S, T, C> Converter<Vec<S>, Vec<T>> for CollectionConverter<C>
where
    C: Converter<S, Option<T>>,
{
    fn convert(&self, source: Vec<S>, context: &Context) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(source.len());
        for value in source {
            if let Some(converted) = self.element.convert(value, context)? {
                out.push(converted);
            }
        }
        Ok(out)
    }
}

/// Adapts a `Converter<S, T>` to `Converter<S, Option<T>>` by always returning `Some`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Present<C>(pub C);

impl<S, T, C> Converter<S, Option<T>> for Present<C>
where
    C: Converter<S, T>,
{
    fn convert(&self, source: S, context: &Context) -> Result<Option<T>> {
        self.0.convert(source, context).map(Some)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::converter::from_fn;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_skips_none_and_keeps_order() {
        let even_only = CollectionConverter::new(from_fn(|v: u32, _: &Context| {
            Ok((v % 2 == 0).then_some(v * 10))
        }));
        let out = even_only
            .convert(vec![4, 1, 2, 7, 8], &Context::default())
            .expect("converts");
        assert_eq!(out, vec![40, 20, 80]);
    }

    #[test]
    fn test_present_keeps_everything() {
        let all = CollectionConverter::present(from_fn(|v: u32, _: &Context| Ok(v + 1)));
        let out = all.convert(vec![3, 2, 1], &Context::default()).expect("converts");
        assert_eq!(out, vec![4, 3, 2]);
    }

    #[test]
    fn test_first_error_aborts() {
        let failing = CollectionConverter::present(from_fn(|v: u32, _: &Context| {
            if v == 0 {
                Err(crate::ConvertError::MissingField("id"))
            } else {
                Ok(v)
            }
        }));
        assert!(failing.convert(vec![1, 0, 2], &Context::default()).is_err());
    }
}
