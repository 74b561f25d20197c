//! Pagination types
//!
//! Request, anchor, window and result structures. All of them live for a
//! single request and are never cached.

use crate::codec::{parse_query, LinkBuilder, PageParams};
use crate::config::PaginatorConfig;
use crate::types::{Count, QueryPairs};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt::Display;
use std::str::FromStr;

// ============================================================================
// Request
// ============================================================================

/// What the caller asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<K> {
    /// Requested page, at least 1
    pub page: u64,
    /// Anchor key of the requested page's first item
    pub anchor: Option<K>,
    /// Parameter prefix of this paginator
    pub namespace: String,
    /// Items per page
    pub per_page: u64,
    /// Count cap
    pub max_count: Option<u64>,
    /// Count supplied by the caller (e.g. a denormalized counter)
    pub count: Option<u64>,
    /// All parameters of the current request, reproduced in links
    pub query: QueryPairs,
}

impl<K> PageRequest<K> {
    /// Request `page` with the config's defaults and no other parameters
    pub fn new(page: u64, config: &PaginatorConfig) -> Self {
        Self {
            page: page.max(1),
            anchor: None,
            namespace: config.var_prefix.clone(),
            per_page: config.per_page,
            max_count: config.max_count,
            count: None,
            query: Vec::new(),
        }
    }

    /// Set the anchor
    #[must_use]
    pub fn with_anchor(mut self, anchor: K) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Use an externally known item count
    #[must_use]
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Cap counting
    #[must_use]
    pub fn with_max_count(mut self, max_count: u64) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Set items per page
    #[must_use]
    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }

    /// Index of the first item of the requested page (0-based)
    pub fn first_index(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Index of the first item of the requested page, `None` past `u64::MAX`
    pub fn checked_first_index(&self) -> Option<u64> {
        self.page.saturating_sub(1).checked_mul(self.per_page)
    }
}

impl<K: FromStr> PageRequest<K> {
    /// Build a request from already split query parameters
    pub fn from_pairs(query: QueryPairs, config: &PaginatorConfig) -> Self {
        let params: PageParams<K> = PageParams::from_pairs(&query, &config.var_prefix);
        Self {
            page: params.page,
            anchor: params.anchor,
            query,
            ..Self::new(1, config)
        }
    }

    /// Build a request from a raw query string
    pub fn from_query(query: &str, config: &PaginatorConfig) -> Self {
        Self::from_pairs(parse_query(query), config)
    }
}

// ============================================================================
// Anchors
// ============================================================================

/// Anchor of the current page plus the anchors of nearby pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSet<K> {
    /// Key of the current page's first item
    pub anchor: Option<K>,
    /// First keys of the preceding pages, nearest first
    pub preceding: Vec<K>,
    /// First keys of the following pages, nearest first
    pub following: Vec<K>,
}

impl<K> Default for AnchorSet<K> {
    fn default() -> Self {
        Self {
            anchor: None,
            preceding: Vec::new(),
            following: Vec::new(),
        }
    }
}

impl<K: Clone> AnchorSet<K> {
    /// Anchor for `page`, seen from `current`
    pub fn for_page(&self, current: u64, page: u64) -> Option<K> {
        if page == current {
            self.anchor.clone()
        } else if page > current {
            let offset = (page - current - 1) as usize;
            self.following.get(offset).cloned()
        } else {
            let offset = (current - page - 1) as usize;
            self.preceding.get(offset).cloned()
        }
    }
}

// ============================================================================
// Window
// ============================================================================

/// A navigable page number, with its anchor when known
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PageLink<K> {
    /// 1-based page number
    pub page: u64,
    /// Anchor key, absent for unanchored (offset) links
    pub anchor: Option<K>,
}

/// Page numbers to display around the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow<K> {
    /// Leading cluster (usually just page 1)
    pub left: Vec<PageLink<K>>,
    /// Cluster containing the current page
    pub middle: Vec<PageLink<K>>,
    /// Trailing cluster (usually just the last page)
    pub right: Vec<PageLink<K>>,
    /// Page before the current one
    pub previous: Option<PageLink<K>>,
    /// Page after the current one
    pub next: Option<PageLink<K>>,
}

impl<K> Default for PageWindow<K> {
    fn default() -> Self {
        Self {
            left: Vec::new(),
            middle: Vec::new(),
            right: Vec::new(),
            previous: None,
            next: None,
        }
    }
}

/// One element of the rendered page list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a, K> {
    /// A page link
    Page(&'a PageLink<K>),
    /// A gap of skipped pages
    Ellipsis,
}

impl<K> PageWindow<K> {
    /// Clusters in display order with ellipses where page numbers jump
    pub fn slots(&self) -> Vec<Slot<'_, K>> {
        let mut slots = Vec::new();
        let mut last_page: Option<u64> = None;

        for link in self.left.iter().chain(&self.middle).chain(&self.right) {
            if let Some(previous) = last_page {
                if link.page - previous > 1 {
                    slots.push(Slot::Ellipsis);
                }
            }
            slots.push(Slot::Page(link));
            last_page = Some(link.page);
        }

        slots
    }

    /// Every displayed page number in order
    pub fn page_numbers(&self) -> Vec<u64> {
        self.left
            .iter()
            .chain(&self.middle)
            .chain(&self.right)
            .map(|link| link.page)
            .collect()
    }
}

// ============================================================================
// Result
// ============================================================================

/// How pages were addressed for this request
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Plain offsets
    Offset,
    /// Anchor keys
    Keyset,
    /// Keyset was requested but the ordering key is not unique
    Degraded,
}

impl PaginationMode {
    /// Whether window links carry anchors
    pub fn uses_anchors(self) -> bool {
        matches!(self, Self::Keyset)
    }
}

/// One page of results plus everything needed to render navigation
#[derive(Debug, Clone)]
pub struct Page<T, K> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total item count (exact or lower bound)
    pub count: Count,
    /// Number of pages
    pub pages: u64,
    /// Current page number
    pub page: u64,
    /// Items per page
    pub per_page: u64,
    /// Anchor of the current page
    pub anchor: Option<K>,
    /// Navigation window
    pub window: PageWindow<K>,
    /// Addressing mode used
    pub mode: PaginationMode,
    /// Link builder for this paginator
    pub links: LinkBuilder,
}

impl<T, K: Display> Page<T, K> {
    /// Link to an arbitrary page
    pub fn link(&self, page: u64, anchor: Option<&K>) -> String {
        self.links.link(page, anchor)
    }

    /// Link for a window entry
    pub fn href(&self, link: &PageLink<K>) -> String {
        self.links.link(link.page, link.anchor.as_ref())
    }
}

impl<T, K> Page<T, K> {
    /// Whether there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.count.value() == 0
    }

    /// 1-based index of the first item shown, 0 when empty
    pub fn first_index(&self) -> u64 {
        if self.items.is_empty() {
            0
        } else {
            self.page
                .saturating_sub(1)
                .saturating_mul(self.per_page)
                .saturating_add(1)
        }
    }

    /// 1-based index of the last item shown, 0 when empty
    pub fn last_index(&self) -> u64 {
        if self.items.is_empty() {
            0
        } else {
            self.page
                .saturating_sub(1)
                .saturating_mul(self.per_page)
                .saturating_add(self.items.len() as u64)
        }
    }
}

#[derive(serde::Serialize)]
struct RenderedLink<'a, K> {
    page: u64,
    anchor: Option<&'a K>,
    href: String,
}

fn render_link<'a, K: Display>(links: &LinkBuilder, link: &'a PageLink<K>) -> RenderedLink<'a, K> {
    RenderedLink {
        page: link.page,
        anchor: link.anchor.as_ref(),
        href: links.link(link.page, link.anchor.as_ref()),
    }
}

fn render_all<'a, K: Display>(
    links: &LinkBuilder,
    cluster: &'a [PageLink<K>],
) -> Vec<RenderedLink<'a, K>> {
    cluster.iter().map(|link| render_link(links, link)).collect()
}

impl<T, K> Serialize for Page<T, K>
where
    T: Serialize,
    K: Serialize + Display,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let previous = self
            .window
            .previous
            .as_ref()
            .map(|link| render_link(&self.links, link));
        let next = self
            .window
            .next
            .as_ref()
            .map(|link| render_link(&self.links, link));

        let mut state = serializer.serialize_struct("Page", 13)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("display_count", &self.count.to_string())?;
        state.serialize_field("pages", &self.pages)?;
        state.serialize_field("page", &self.page)?;
        state.serialize_field("per_page", &self.per_page)?;
        state.serialize_field("anchor", &self.anchor)?;
        state.serialize_field("mode", &self.mode)?;
        state.serialize_field("left", &render_all(&self.links, &self.window.left))?;
        state.serialize_field("middle", &render_all(&self.links, &self.window.middle))?;
        state.serialize_field("right", &render_all(&self.links, &self.window.right))?;
        state.serialize_field("previous", &previous)?;
        state.serialize_field("next", &next)?;
        state.end()
    }
}
