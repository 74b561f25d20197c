//! Anchor resolution
//!
//! Collects the first key of each nearby page by reading keys outwards from
//! the current anchor, sampled at a `per_page` stride.

use super::count::ForwardScan;
use super::types::AnchorSet;
use crate::collection::OrderedCollection;
use crate::error::Result;

/// Reads neighbour anchors off the raw collection
pub struct AnchorResolver<'a, C> {
    raw: &'a C,
    per_page: u64,
}

/// Anchors for the current page plus what the forward read saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnchors<K> {
    /// Current, preceding and following anchors
    pub anchors: AnchorSet<K>,
    /// Forward scan, absent when it was skipped
    pub forward: Option<ForwardScan>,
}

impl<'a, C: OrderedCollection> AnchorResolver<'a, C> {
    /// Create a resolver over the raw collection
    pub fn new(raw: &'a C, per_page: u64) -> Self {
        Self { raw, per_page }
    }

    /// Resolve neighbours of `anchor`
    ///
    /// `full_page` is false when the current page is the last one, in which
    /// case there is nothing to read forward.
    pub fn resolve(
        &self,
        anchor: C::Key,
        preceding_pages: u64,
        following_pages: u64,
        full_page: bool,
    ) -> Result<ResolvedAnchors<C::Key>> {
        let (following, forward) = if full_page && following_pages > 0 {
            let (keys, scan) = self.following(&anchor, following_pages)?;
            (keys, Some(scan))
        } else {
            (Vec::new(), None)
        };

        let preceding = if preceding_pages > 0 {
            self.preceding(&anchor, preceding_pages)?
        } else {
            Vec::new()
        };

        tracing::debug!(
            "Resolved anchor {} with {} preceding and {} following anchors",
            anchor,
            preceding.len(),
            following.len()
        );

        Ok(ResolvedAnchors {
            anchors: AnchorSet {
                anchor: Some(anchor),
                preceding,
                following,
            },
            forward,
        })
    }

    /// First keys of the next `pages` pages, nearest first
    pub fn following(&self, anchor: &C::Key, pages: u64) -> Result<(Vec<C::Key>, ForwardScan)> {
        let ordering = self.raw.ordering();
        let limit = pages.saturating_mul(self.per_page).saturating_add(1);

        let keys = self
            .raw
            .filter_key(ordering.direction.from_op(), anchor)
            .order_by(&ordering.key, ordering.direction)?
            .keys(0, limit)?;

        let scan = ForwardScan {
            seen: keys.len() as u64,
            exhausted: (keys.len() as u64) < limit,
        };

        let following = keys
            .into_iter()
            .step_by(self.stride())
            .skip(1)
            .collect();

        Ok((following, scan))
    }

    /// First keys of the previous `pages` pages, nearest first
    pub fn preceding(&self, anchor: &C::Key, pages: u64) -> Result<Vec<C::Key>> {
        let ordering = self.raw.ordering();

        let keys = self
            .raw
            .filter_key(ordering.direction.until_op(), anchor)
            .order_by(&ordering.key, ordering.direction.reversed())?
            .keys(self.per_page, pages.saturating_mul(self.per_page).saturating_add(1))?;

        Ok(keys.into_iter().step_by(self.stride()).collect())
    }

    fn stride(&self) -> usize {
        self.per_page.max(1) as usize
    }
}
