//! Decorated collections
//!
//! A decorator post-processes items as they are sliced (annotating rows for
//! display, masking fields, ...) while delegating everything else to the
//! collection it wraps.

use super::types::{Layer, OrderedCollection, Unwrap};
use crate::error::Result;
use crate::types::{CountCapability, KeyOp, KeyOrdering, SortDirection};
use std::fmt;
use std::sync::Arc;

type ItemHook<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

/// Collection wrapper applying a hook to every sliced item
pub struct Decorated<C: OrderedCollection> {
    inner: C,
    hook: ItemHook<C::Item>,
}

impl<C: OrderedCollection> Decorated<C> {
    /// Wrap a collection
    pub fn new(inner: C, hook: impl Fn(&mut C::Item) + Send + Sync + 'static) -> Self {
        Self {
            inner,
            hook: Arc::new(hook),
        }
    }

    fn rewrap(&self, inner: C) -> Self {
        Self {
            inner,
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<C: OrderedCollection + Clone> Clone for Decorated<C> {
    fn clone(&self) -> Self {
        self.rewrap(self.inner.clone())
    }
}

impl<C: OrderedCollection + fmt::Debug> fmt::Debug for Decorated<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorated")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<C: OrderedCollection> OrderedCollection for Decorated<C> {
    type Item = C::Item;
    type Key = C::Key;

    fn ordering(&self) -> KeyOrdering {
        self.inner.ordering()
    }

    fn key_of(&self, item: &Self::Item) -> Self::Key {
        self.inner.key_of(item)
    }

    fn slice(&self, first: u64, last: u64) -> Result<Vec<Self::Item>> {
        let mut items = self.inner.slice(first, last)?;
        for item in &mut items {
            (self.hook)(item);
        }
        Ok(items)
    }

    fn keys(&self, first: u64, last: u64) -> Result<Vec<Self::Key>> {
        self.inner.keys(first, last)
    }

    fn count_capability(&self) -> CountCapability {
        self.inner.count_capability()
    }

    fn count(&self) -> Result<Option<u64>> {
        self.inner.count()
    }

    fn count_up_to(&self, limit: u64) -> Result<u64> {
        self.inner.count_up_to(limit)
    }

    fn filter_key(&self, op: KeyOp, value: &Self::Key) -> Self {
        self.rewrap(self.inner.filter_key(op, value))
    }

    fn order_by(&self, key: &str, direction: SortDirection) -> Result<Self> {
        Ok(self.rewrap(self.inner.order_by(key, direction)?))
    }
}

impl<C> Unwrap for Decorated<C>
where
    C: OrderedCollection + Unwrap,
{
    type Raw = C::Raw;

    fn inner(&self) -> Layer<'_, Self::Raw> {
        Layer::Wrapped(&self.inner)
    }
}
