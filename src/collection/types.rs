//! Ordered collection traits
//!
//! Defines the uniform view over a backing source that the pagination
//! engine queries, and the decorator layering used by the unwrapper.

use crate::error::Result;
use crate::types::{CountCapability, KeyOp, KeyOrdering, SortDirection};
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Bounds required of an ordering key so it can travel through a query string
pub trait CollectionKey: Clone + Ord + Debug + Display + FromStr + Send + Sync + 'static {}

impl<K> CollectionKey for K where K: Clone + Ord + Debug + Display + FromStr + Send + Sync + 'static {}

/// An ordered, sliceable, countable view over a backing source
///
/// Views are cheap to derive: `filter_key` and `order_by` describe a new
/// view without touching the backing store. Only `slice`, `keys`, `count`
/// and `count_up_to` perform I/O, and each may fail with
/// [`Error::BackingStore`](crate::Error::BackingStore).
pub trait OrderedCollection {
    /// Item type returned by slices
    type Item;

    /// Ordering key type
    type Key: CollectionKey;

    /// Current ordering (key name, direction, uniqueness)
    fn ordering(&self) -> KeyOrdering;

    /// Name of the ordering key when it is unique
    fn unique_key_name(&self) -> Option<String> {
        let ordering = self.ordering();
        ordering.unique.then_some(ordering.key)
    }

    /// Ordering key of an item
    fn key_of(&self, item: &Self::Item) -> Self::Key;

    /// Items at positions `first..last` of the view
    fn slice(&self, first: u64, last: u64) -> Result<Vec<Self::Item>>;

    /// Keys at positions `first..last` of the view
    fn keys(&self, first: u64, last: u64) -> Result<Vec<Self::Key>> {
        Ok(self
            .slice(first, last)?
            .iter()
            .map(|item| self.key_of(item))
            .collect())
    }

    /// How expensive a full count is
    fn count_capability(&self) -> CountCapability {
        CountCapability::Cheap
    }

    /// Total number of items, `None` when the source cannot count
    fn count(&self) -> Result<Option<u64>>;

    /// Number of items, looking at no more than `limit` of them
    fn count_up_to(&self, limit: u64) -> Result<u64> {
        Ok(self.keys(0, limit)?.len() as u64)
    }

    /// View restricted to keys on one side of a boundary
    #[must_use]
    fn filter_key(&self, op: KeyOp, value: &Self::Key) -> Self
    where
        Self: Sized;

    /// View re-ordered by `key` in `direction`
    fn order_by(&self, key: &str, direction: SortDirection) -> Result<Self>
    where
        Self: Sized;
}

/// One step of a decorator chain
pub enum Layer<'a, C> {
    /// The raw addressable collection
    Raw(&'a C),
    /// Another decorator wrapping the raw collection further down
    Wrapped(&'a dyn Unwrap<Raw = C>),
}

/// A collection that may wrap another collection
///
/// Raw collections return [`Layer::Raw`] with themselves; decorators return
/// [`Layer::Wrapped`] with the collection they wrap.
pub trait Unwrap {
    /// The innermost collection type
    type Raw: OrderedCollection;

    /// The next layer down
    fn inner(&self) -> Layer<'_, Self::Raw>;
}
