//! In-memory ordered collection
//!
//! Backs a view with a shared, key-sorted vector. Useful for small result
//! sets that were already materialized, and for simulating sources with
//! expensive or unsupported counting.

use super::types::{CollectionKey, Layer, OrderedCollection, Unwrap};
use crate::error::{Error, Result};
use crate::types::{CountCapability, KeyOp, KeyOrdering, SortDirection};
use std::fmt;
use std::sync::Arc;

type KeyFn<T, K> = Arc<dyn Fn(&T) -> K + Send + Sync>;

/// Ordered collection over a shared vector
pub struct VecCollection<T, K = i64> {
    /// Items sorted ascending by key
    items: Arc<Vec<T>>,
    /// Key extractor
    key_fn: KeyFn<T, K>,
    /// Key name, direction and uniqueness
    ordering: KeyOrdering,
    /// Active key boundaries
    filters: Vec<(KeyOp, K)>,
    /// Declared counting cost
    capability: CountCapability,
}

impl<T, K: Clone> Clone for VecCollection<T, K> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            key_fn: Arc::clone(&self.key_fn),
            ordering: self.ordering.clone(),
            filters: self.filters.clone(),
            capability: self.capability,
        }
    }
}

impl<T, K: fmt::Debug> fmt::Debug for VecCollection<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecCollection")
            .field("len", &self.items.len())
            .field("ordering", &self.ordering)
            .field("filters", &self.filters)
            .field("capability", &self.capability)
            .finish()
    }
}

impl<T, K: CollectionKey> VecCollection<T, K> {
    /// Create a collection; items are sorted by the extracted key
    pub fn new(
        mut items: Vec<T>,
        ordering: KeyOrdering,
        key_fn: impl Fn(&T) -> K + Send + Sync + 'static,
    ) -> Self {
        items.sort_by_key(|item| key_fn(item));
        Self {
            items: Arc::new(items),
            key_fn: Arc::new(key_fn),
            ordering,
            filters: Vec::new(),
            capability: CountCapability::Cheap,
        }
    }

    /// Declare how expensive counting is
    #[must_use]
    pub fn with_count_capability(mut self, capability: CountCapability) -> Self {
        self.capability = capability;
        self
    }

    /// Number of items in the backing vector, ignoring filters
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the backing vector is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items visible through this view, in view order
    fn view(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        let visible = move |item: &&T| {
            let key = (self.key_fn)(item);
            self.filters.iter().all(|(op, value)| op.matches(&key, value))
        };
        match self.ordering.direction {
            SortDirection::Asc => Box::new(self.items.iter().filter(visible)),
            SortDirection::Desc => Box::new(self.items.iter().rev().filter(visible)),
        }
    }
}

impl<T: Clone, K: CollectionKey> VecCollection<T, K> {
    /// Insert an item at its key position
    ///
    /// Views cloned earlier keep seeing the old contents.
    pub fn insert(&mut self, item: T) {
        let key = (self.key_fn)(&item);
        let position = self
            .items
            .partition_point(|existing| (self.key_fn)(existing) <= key);
        Arc::make_mut(&mut self.items).insert(position, item);
    }

    /// Remove every item with the given key
    pub fn remove(&mut self, key: &K) {
        let key_fn = Arc::clone(&self.key_fn);
        Arc::make_mut(&mut self.items).retain(|item| key_fn(item) != *key);
    }
}

impl VecCollection<i64, i64> {
    /// A collection of plain integer keys ordered by a unique `id`
    pub fn from_keys(keys: impl IntoIterator<Item = i64>) -> Self {
        Self::new(keys.into_iter().collect(), KeyOrdering::unique("id"), |k| *k)
    }
}

impl<T: Clone, K: CollectionKey> OrderedCollection for VecCollection<T, K> {
    type Item = T;
    type Key = K;

    fn ordering(&self) -> KeyOrdering {
        self.ordering.clone()
    }

    fn key_of(&self, item: &T) -> K {
        (self.key_fn)(item)
    }

    fn slice(&self, first: u64, last: u64) -> Result<Vec<T>> {
        let take = last.saturating_sub(first) as usize;
        Ok(self
            .view()
            .skip(first as usize)
            .take(take)
            .cloned()
            .collect())
    }

    fn keys(&self, first: u64, last: u64) -> Result<Vec<K>> {
        let take = last.saturating_sub(first) as usize;
        Ok(self
            .view()
            .skip(first as usize)
            .take(take)
            .map(|item| (self.key_fn)(item))
            .collect())
    }

    fn count_capability(&self) -> CountCapability {
        self.capability
    }

    fn count(&self) -> Result<Option<u64>> {
        if self.capability == CountCapability::Unsupported {
            return Ok(None);
        }
        Ok(Some(self.view().count() as u64))
    }

    fn count_up_to(&self, limit: u64) -> Result<u64> {
        Ok(self.view().take(limit as usize).count() as u64)
    }

    fn filter_key(&self, op: KeyOp, value: &K) -> Self {
        let mut filtered = self.clone();
        filtered.filters.push((op, value.clone()));
        filtered
    }

    fn order_by(&self, key: &str, direction: SortDirection) -> Result<Self> {
        if key != self.ordering.key {
            return Err(Error::config(format!(
                "In-memory collection is keyed by '{}', cannot order by '{key}'",
                self.ordering.key
            )));
        }
        let mut ordered = self.clone();
        ordered.ordering.direction = direction;
        Ok(ordered)
    }
}

impl<T: Clone, K: CollectionKey> Unwrap for VecCollection<T, K> {
    type Raw = Self;

    fn inner(&self) -> Layer<'_, Self> {
        Layer::Raw(self)
    }
}
