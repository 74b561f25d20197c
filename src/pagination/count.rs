//! Count estimation
//!
//! Picks the cheapest way to learn (or bound) the total item count for one
//! request, in priority order:
//!
//! 1. externally supplied count
//! 2. short page (the last page tells the exact count)
//! 3. `max_count` cap via a bounded count
//! 4. exhausted forward key scan
//! 5. full count when the source counts cheaply
//! 6. lower bound from the forward scan or a bounded lookahead count

use crate::collection::OrderedCollection;
use crate::error::{Error, Result};
use crate::types::Count;

/// Result of reading keys forward from the current anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardScan {
    /// Keys seen, the anchor included
    pub seen: u64,
    /// Whether the scan ran out of keys before its limit
    pub exhausted: bool,
}

/// What the estimator may query
pub struct CountContext<'a, C> {
    /// Innermost collection, used for bounded and probing counts
    pub raw: &'a C,
    /// View starting at the current anchor, if the page is anchored
    pub anchored: Option<&'a C>,
    /// Number of items before the current page
    pub offset: u64,
    /// Forward key scan done by the anchor resolver
    pub forward: Option<ForwardScan>,
}

/// Per-request count strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountEstimator {
    page: u64,
    per_page: u64,
    external: Option<u64>,
    max_count: Option<u64>,
    lookahead_pages: u64,
}

impl CountEstimator {
    /// Create an estimator for `page`
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page,
            per_page,
            external: None,
            max_count: None,
            lookahead_pages: 0,
        }
    }

    /// Use a count supplied by the caller
    #[must_use]
    pub fn with_external(mut self, count: Option<u64>) -> Self {
        self.external = count;
        self
    }

    /// Cap counting
    #[must_use]
    pub fn with_max_count(mut self, max_count: Option<u64>) -> Self {
        self.max_count = max_count;
        self
    }

    /// Pages past the current one a bounded lookahead count should cover
    #[must_use]
    pub fn with_lookahead(mut self, pages: u64) -> Self {
        self.lookahead_pages = pages;
        self
    }

    /// Estimate the count given the number of items on the current page
    pub fn estimate<C: OrderedCollection>(
        &self,
        items_on_page: u64,
        context: &CountContext<'_, C>,
    ) -> Result<Count> {
        if let Some(count) = self.external {
            tracing::debug!("Using supplied count: {}", count);
            return Ok(Count::Exact(count));
        }

        let first = context.offset;

        if items_on_page < self.per_page {
            let count = first.saturating_add(items_on_page);
            tracing::debug!("Short page, count is {}", count);
            return Ok(Count::Exact(count));
        }

        if let Some(max_count) = self.max_count {
            if first >= max_count {
                return Err(Error::page_out_of_range(self.page));
            }
            let counted = context.raw.count_up_to(max_count)?;
            tracing::debug!("Counting up to {}: {}", max_count, counted);
            return Ok(if counted >= max_count {
                Count::AtLeast(max_count)
            } else {
                Count::Exact(counted)
            });
        }

        if let Some(scan) = context.forward.filter(|scan| scan.exhausted) {
            let count = first.saturating_add(scan.seen);
            tracing::debug!("Forward scan reached the end, count is {}", count);
            return Ok(Count::Exact(count));
        }

        let capability = context.raw.count_capability();
        if capability.allows_full_count() {
            let counted = match context.anchored {
                Some(anchored) => anchored.count()?.map(|n| first.saturating_add(n)),
                None => context.raw.count()?,
            };
            if let Some(count) = counted {
                tracing::debug!("Full count: {}", count);
                return Ok(Count::Exact(count));
            }
        }

        match context.forward {
            Some(scan) => {
                let count = first.saturating_add(scan.seen);
                tracing::debug!(
                    "Counting disabled ({:?}), at least {} items",
                    capability,
                    count
                );
                Ok(Count::AtLeast(count))
            }
            None => self.lookahead_count(first, context.raw),
        }
    }

    /// Bounded count covering the lookahead pages plus one item
    fn lookahead_count<C: OrderedCollection>(&self, first: u64, raw: &C) -> Result<Count> {
        let limit = self
            .lookahead_pages
            .saturating_add(1)
            .saturating_mul(self.per_page)
            .saturating_add(first)
            .saturating_add(1);
        let counted = raw.count_up_to(limit)?;
        tracing::debug!("Probing count up to {}: {}", limit, counted);

        Ok(if counted < limit {
            Count::Exact(counted)
        } else {
            Count::AtLeast(counted)
        })
    }
}
