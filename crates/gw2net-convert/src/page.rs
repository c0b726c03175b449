//! Paged results

use crate::collection::CollectionConverter;
use crate::converter::{Context, Converter};
use crate::error::Result;

/// One page of a paginated resource.
///
/// The server does not echo the requested index, so `page_index` is set by the
/// caller after conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPage<T> {
    pub items: Vec<T>,
    pub page_index: u32,
    /// Requested page size (`X-Page-Size`)
    pub page_size: usize,
    /// Number of pages at this page size (`X-Page-Total`)
    pub page_count: usize,
    /// Entities on this page (`X-Result-Count`)
    pub subtotal_count: usize,
    /// Entities across all pages (`X-Result-Total`)
    pub total_count: usize,
}

impl<T> Default for CollectionPage<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page_index: 0,
            page_size: 0,
            page_count: 0,
            subtotal_count: 0,
            total_count: 0,
        }
    }
}

impl<T> CollectionPage<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Whether a page after this one exists
    pub fn has_next(&self) -> bool {
        (self.page_index as usize) + 1 < self.page_count
    }

    #[must_use]
    pub fn with_page_index(mut self, page_index: u32) -> Self {
        self.page_index = page_index;
        self
    }
}

impl<T> IntoIterator for CollectionPage<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a CollectionPage<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Builds a [`CollectionPage`] from a wire array and the paging headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionPageConverter<C> {
    elements: CollectionConverter<C>,
}

impl<C> CollectionPageConverter<C> {
    pub fn new(elements: CollectionConverter<C>) -> Self {
        Self { elements }
    }
}

impl<S, T, C> Converter<Vec<S>, CollectionPage<T>> for CollectionPageConverter<C>
where
    C: Converter<S, Option<T>>,
{
    fn convert(&self, source: Vec<S>, context: &Context) -> Result<CollectionPage<T>> {
        let items = self.elements.convert(source, context)?;
        let converted = items.len();
        let metadata = &context.metadata;
        let header = |value: Option<u32>, fallback: usize| value.map_or(fallback, |v| v as usize);

        Ok(CollectionPage {
            page_index: 0,
            page_size: header(metadata.page_size, converted),
            page_count: header(metadata.page_total, usize::from(converted > 0)),
            subtotal_count: header(metadata.result_count, converted),
            total_count: header(metadata.result_total, converted),
            items,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::converter::from_fn;
    use gw2net_protocol::ResponseMetadata;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_last_page_of_120() {
        let converter =
            CollectionPageConverter::new(CollectionConverter::present(from_fn(
                |v: u32, _: &Context| Ok(v),
            )));
        let context = Context::default().with_metadata(ResponseMetadata {
            result_count: Some(20),
            result_total: Some(120),
            page_size: Some(50),
            page_total: Some(3),
            locale: None,
        });

        let page = converter
            .convert((100..120).collect::<Vec<u32>>(), &context)
            .expect("converts")
            .with_page_index(2);

        assert_eq!(page.len(), 20);
        assert_eq!(page.page_index, 2);
        assert_eq!(page.page_size, 50);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.subtotal_count, 20);
        assert_eq!(page.total_count, 120);
        assert!(!page.has_next());
    }

    #[test]
    fn test_without_headers() {
        let converter =
            CollectionPageConverter::new(CollectionConverter::present(from_fn(
                |v: u32, _: &Context| Ok(v),
            )));
        let page = converter
            .convert(vec![1, 2, 3], &Context::default())
            .expect("converts");
        assert_eq!(page.page_size, 3);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
