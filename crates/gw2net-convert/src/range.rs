//! Keyed bulk results with server-reported counts

use std::hash::Hash;

use indexmap::IndexMap;

use crate::collection::CollectionConverter;
use crate::converter::{Context, Converter};
use crate::error::Result;

/// Entities keyed by id, in the order the server returned them.
///
/// `subtotal_count` is the number of entities in this response and
/// `total_count` the number the server knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryRange<K: Hash + Eq, V> {
    entries: IndexMap<K, V>,
    pub subtotal_count: usize,
    pub total_count: usize,
}

impl<K: Hash + Eq, V> Default for DictionaryRange<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> DictionaryRange<K, V> {
    /// Empty range with both counts zero
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            subtotal_count: 0,
            total_count: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            subtotal_count: 0,
            total_count: 0,
        }
    }

    /// Insert or replace; a replaced key keeps its original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, K, V> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, K, V> {
        self.entries.values_mut()
    }

    pub fn into_values(self) -> indexmap::map::IntoValues<K, V> {
        self.entries.into_values()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for DictionaryRange<K, V> {
    /// Counts are set to the number of collected entries.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries: IndexMap<K, V> = iter.into_iter().collect();
        let count = entries.len();
        Self {
            entries,
            subtotal_count: count,
            total_count: count,
        }
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for DictionaryRange<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<K: Hash + Eq, V> IntoIterator for DictionaryRange<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K: Hash + Eq, V> IntoIterator for &'a DictionaryRange<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds a [`DictionaryRange`] from a wire array.
///
/// Counts come from `X-Result-Count` and `X-Result-Total`, falling back to the
/// number of converted entities when the headers are absent.
pub struct DictionaryRangeConverter<C, K, T> {
    elements: CollectionConverter<C>,
    key: fn(&T) -> K,
}

impl<C, K, T> DictionaryRangeConverter<C, K, T> {
    pub fn new(elements: CollectionConverter<C>, key: fn(&T) -> K) -> Self {
        Self { elements, key }
    }
}

impl<S, T, K, C> Converter<Vec<S>, DictionaryRange<K, T>> for DictionaryRangeConverter<C, K, T>
where
    C: Converter<S, Option<T>>,
    K: Hash + Eq,
{
    fn convert(&self, source: Vec<S>, context: &Context) -> Result<DictionaryRange<K, T>> {
        let items = self.elements.convert(source, context)?;

        let mut range = DictionaryRange::with_capacity(items.len());
        for item in items {
            range.insert((self.key)(&item), item);
        }

        let converted = range.len();
        range.subtotal_count = context
            .metadata
            .result_count
            .map_or(converted, |count| count as usize);
        range.total_count = context
            .metadata
            .result_total
            .map_or(converted, |count| count as usize);
        Ok(range)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::converter::from_fn;
    use gw2net_protocol::ResponseMetadata;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct World {
        id: u32,
        name: String,
    }

    fn world_id(world: &World) -> u32 {
        world.id
    }

    fn converter() -> DictionaryRangeConverter<
        crate::collection::Present<impl Converter<(u32, &'static str), World>>,
        u32,
        World,
    > {
        DictionaryRangeConverter::new(
            CollectionConverter::present(from_fn(|(id, name): (u32, &'static str), _: &Context| {
                Ok(World {
                    id,
                    name: name.to_string(),
                })
            })),
            world_id,
        )
    }

    #[test]
    fn test_counts_from_metadata() {
        let context = Context::default().with_metadata(ResponseMetadata {
            result_count: Some(2),
            result_total: Some(51),
            ..ResponseMetadata::default()
        });

        let range = converter()
            .convert(vec![(2204, "Piken Square"), (1001, "Anvil Rock")], &context)
            .expect("converts");

        assert_eq!(range.subtotal_count, 2);
        assert_eq!(range.total_count, 51);
        assert_eq!(range.keys().copied().collect::<Vec<_>>(), vec![2204, 1001]);
        assert_eq!(range.get(&1001).map(|w| w.name.as_str()), Some("Anvil Rock"));
    }

    #[test]
    fn test_counts_default_to_length() {
        let range = converter()
            .convert(vec![(1001, "Anvil Rock")], &Context::default())
            .expect("converts");
        assert_eq!(range.subtotal_count, 1);
        assert_eq!(range.total_count, 1);
    }

    #[test]
    fn test_empty_range() {
        let range: DictionaryRange<u32, World> = DictionaryRange::new();
        assert!(range.is_empty());
        assert_eq!(range.subtotal_count, 0);
        assert_eq!(range.total_count, 0);
    }

    #[test]
    fn test_from_iterator_sets_counts() {
        let range: DictionaryRange<u32, &str> = [(3, "c"), (1, "a")].into_iter().collect();
        assert_eq!(range.len(), 2);
        assert_eq!(range.total_count, 2);
        assert_eq!(range.into_values().collect::<Vec<_>>(), vec!["c", "a"]);
    }
}
