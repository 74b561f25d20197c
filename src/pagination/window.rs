//! Page window calculation
//!
//! Decides which page numbers are displayed around the current page. The
//! layout is computed from bare page numbers; anchors are merged in
//! afterwards when keyset navigation is active.

use super::types::{AnchorSet, PageLink, PageWindow};
use crate::config::PaginatorConfig;

/// Displayed page numbers before anchors are attached
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowLayout {
    /// Leading cluster
    pub left: Vec<u64>,
    /// Cluster containing the current page
    pub middle: Vec<u64>,
    /// Trailing cluster
    pub right: Vec<u64>,
    /// Page before the current one
    pub previous: Option<u64>,
    /// Page after the current one
    pub next: Option<u64>,
}

/// Compute the window for `page` out of `pages`
///
/// `page` is clamped into `1..=pages`. An empty collection (`pages == 0`)
/// produces an empty layout.
pub fn compute_window(page: u64, pages: u64, config: &PaginatorConfig) -> WindowLayout {
    if pages == 0 {
        return WindowLayout::default();
    }

    let page = page.clamp(1, pages);
    let adjacent = config.adjacent;

    let mut has_left = false;
    let mut has_right = false;

    let (mut start, mut end) = if pages <= config.leading_displayed {
        (1, pages)
    } else if page <= config.leading_range() {
        has_right = true;
        (1, config.leading_displayed.max(page.saturating_add(adjacent)).min(pages))
    } else if page > pages.saturating_sub(config.trailing_range()) {
        has_left = true;
        (pages.saturating_add(1).saturating_sub(config.trailing_displayed).max(1), pages)
    } else {
        has_left = true;
        has_right = true;
        (page.saturating_sub(adjacent).max(1), page.saturating_add(adjacent).min(pages))
    };

    // A gap of exactly one page is filled in, an overlap absorbs the cluster
    if has_left && start <= 3 {
        start = 1;
        has_left = false;
    }
    if has_right && end.saturating_add(2) >= pages {
        end = pages;
        has_right = false;
    }

    WindowLayout {
        left: if has_left { vec![1] } else { Vec::new() },
        middle: (start..=end).collect(),
        right: if has_right { vec![pages] } else { Vec::new() },
        previous: (page > 1).then(|| page - 1),
        next: (page < pages).then(|| page + 1),
    }
}

/// How many pages before and after `page` can carry an anchor
///
/// Returns `(preceding, following)`, covering every page [`compute_window`]
/// can put in the middle cluster for any page total, gap fill-in included.
pub fn anchor_reach(page: u64, config: &PaginatorConfig) -> (u64, u64) {
    let adjacent = config.adjacent;

    // Filling a one-page gap pulls up to two more pages into the cluster
    let following = if page <= config.leading_range() {
        config
            .leading_displayed
            .max(page.saturating_add(adjacent))
            .saturating_add(2)
            - page
    } else {
        adjacent.saturating_add(2).max(config.trailing_range())
    };

    let preceding = page.saturating_sub(1).min(
        adjacent
            .saturating_add(2)
            .max(config.trailing_displayed.saturating_add(1)),
    );

    (preceding, following)
}

impl WindowLayout {
    /// Attach anchors, leaving pages outside the anchor set unanchored
    pub fn into_window<K: Clone>(self, current: u64, anchors: Option<&AnchorSet<K>>) -> PageWindow<K> {
        let link = |page: u64| PageLink {
            page,
            anchor: anchors.and_then(|set| set.for_page(current, page)),
        };

        PageWindow {
            left: self.left.into_iter().map(link).collect(),
            middle: self.middle.into_iter().map(link).collect(),
            right: self.right.into_iter().map(link).collect(),
            previous: self.previous.map(link),
            next: self.next.map(link),
        }
    }

    /// Whether `page` is displayed anywhere in the window
    pub fn contains(&self, page: u64) -> bool {
        self.left
            .iter()
            .chain(&self.middle)
            .chain(&self.right)
            .any(|p| *p == page)
    }
}
