//! Pagination engine
//!
//! One configurable paginator replaces the family of specialised paginators:
//! the mode (offset, keyset, degraded) is chosen per request from the
//! configuration, the request and the collection's ordering key.

use super::anchor::AnchorResolver;
use super::count::{CountContext, CountEstimator};
use super::types::{AnchorSet, Page, PageRequest, PageWindow, PaginationMode};
use super::window::{anchor_reach, compute_window};
use crate::codec::LinkBuilder;
use crate::collection::{unwrap_collection, OrderedCollection, Unwrap};
use crate::config::PaginatorConfig;
use crate::error::{Error, Result};
use crate::types::{Count, KeyOrdering};
use std::str::FromStr;

/// Items of the current page and where they were found
struct Slice<T> {
    page: u64,
    items: Vec<T>,
    anchored: bool,
}

/// The pagination engine
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginatorConfig,
}

impl Paginator {
    /// Create a paginator, validating the configuration
    pub fn new(config: PaginatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Parse a request for this paginator out of a raw query string
    pub fn request<K: FromStr>(&self, query: &str) -> PageRequest<K> {
        PageRequest::from_query(query, &self.config)
    }

    /// Decide how pages are addressed for a collection ordered by `ordering`
    pub fn select_mode<K>(
        &self,
        ordering: &KeyOrdering,
        request: &PageRequest<K>,
    ) -> Result<PaginationMode> {
        if !self.config.keyset {
            return Ok(PaginationMode::Offset);
        }
        if ordering.unique {
            return Ok(PaginationMode::Keyset);
        }
        if request.max_count.is_some() || request.count.is_some() {
            tracing::debug!(
                "Ordering key '{}' is not unique, falling back to page numbers",
                ordering.key
            );
            return Ok(PaginationMode::Degraded);
        }
        Err(Error::unique_key_required(&ordering.key))
    }

    /// Build one page of `source`
    pub fn paginate<D>(
        &self,
        source: &D,
        request: &PageRequest<D::Key>,
    ) -> Result<Page<D::Item, D::Key>>
    where
        D: OrderedCollection + Unwrap,
        D::Raw: OrderedCollection<Key = D::Key>,
    {
        if request.per_page == 0 {
            return Err(Error::invalid_value("per_page", "must be at least 1"));
        }
        if request.page == 0 {
            return Err(Error::invalid_value("page", "must be at least 1"));
        }

        let unwrapped = unwrap_collection(source, self.config.max_unwrap_depth)?;
        let raw = unwrapped.raw;
        let mode = self.select_mode(&raw.ordering(), request)?;
        tracing::debug!("Paginating page {} in {:?} mode", request.page, mode);

        if request.count == Some(0) {
            if request.page > 1 {
                return Err(Error::page_out_of_range(request.page));
            }
            return Ok(self.assemble(request, Slice::empty(), Count::Exact(0), None, mode));
        }

        match mode {
            PaginationMode::Keyset => self.paginate_keyset(source, raw, request),
            PaginationMode::Offset | PaginationMode::Degraded => {
                self.paginate_offset(source, raw, request, mode)
            }
        }
    }

    fn paginate_offset<D>(
        &self,
        source: &D,
        raw: &D::Raw,
        request: &PageRequest<D::Key>,
        mode: PaginationMode,
    ) -> Result<Page<D::Item, D::Key>>
    where
        D: OrderedCollection + Unwrap,
        D::Raw: OrderedCollection<Key = D::Key>,
    {
        if request.anchor.is_some() {
            tracing::debug!("Ignoring anchor in {:?} mode", mode);
        }

        let slice = self.slice_at_offset(source, request)?;
        let (_, following_pages) = anchor_reach(slice.page, &self.config);

        let count = self
            .estimator(request, slice.page, following_pages)
            .estimate(
                slice.items.len() as u64,
                &CountContext {
                    raw,
                    anchored: None,
                    offset: request.first_index(),
                    forward: None,
                },
            )?;

        Ok(self.assemble(request, slice, count, None, mode))
    }

    fn paginate_keyset<D>(
        &self,
        source: &D,
        raw: &D::Raw,
        request: &PageRequest<D::Key>,
    ) -> Result<Page<D::Item, D::Key>>
    where
        D: OrderedCollection + Unwrap,
        D::Raw: OrderedCollection<Key = D::Key>,
    {
        let slice = match &request.anchor {
            Some(anchor) => self.slice_at_anchor(source, request, anchor)?,
            None => self.slice_at_offset(source, request)?,
        };

        let per_page = request.per_page;
        let offset = slice.page.saturating_sub(1).saturating_mul(per_page);
        let anchor = slice.items.first().map(|item| source.key_of(item));
        let (preceding_pages, following_pages) = anchor_reach(slice.page, &self.config);

        let resolved = match anchor {
            Some(anchor) => Some(AnchorResolver::new(raw, per_page).resolve(
                anchor,
                preceding_pages,
                following_pages,
                slice.items.len() as u64 == per_page,
            )?),
            None => None,
        };

        let anchored_view = match (&resolved, slice.anchored) {
            (Some(resolved), true) => resolved
                .anchors
                .anchor
                .as_ref()
                .map(|anchor| raw.filter_key(raw.ordering().direction.from_op(), anchor)),
            _ => None,
        };

        let count = self
            .estimator(request, slice.page, following_pages)
            .estimate(
                slice.items.len() as u64,
                &CountContext {
                    raw,
                    anchored: anchored_view.as_ref(),
                    offset,
                    forward: resolved.as_ref().and_then(|resolved| resolved.forward),
                },
            )?;

        let anchors = resolved.map(|resolved| resolved.anchors);
        Ok(self.assemble(request, slice, count, anchors, PaginationMode::Keyset))
    }

    /// Slice the requested page by offset
    fn slice_at_offset<D: OrderedCollection>(
        &self,
        source: &D,
        request: &PageRequest<D::Key>,
    ) -> Result<Slice<D::Item>> {
        let first = request
            .checked_first_index()
            .ok_or_else(|| Error::page_out_of_range(request.page))?;
        let items = source.slice(first, first.saturating_add(request.per_page))?;

        if items.is_empty() && request.page > 1 {
            return Err(Error::page_out_of_range(request.page));
        }

        Ok(Slice {
            page: request.page,
            items,
            anchored: false,
        })
    }

    /// Slice the page starting at `anchor`, or page 1 when the anchor is gone
    fn slice_at_anchor<D: OrderedCollection>(
        &self,
        source: &D,
        request: &PageRequest<D::Key>,
        anchor: &D::Key,
    ) -> Result<Slice<D::Item>> {
        // Anchored requests still name their page, which must have an offset
        if request.checked_first_index().is_none() {
            return Err(Error::page_out_of_range(request.page));
        }

        let direction = source.ordering().direction;
        let items = source
            .filter_key(direction.from_op(), anchor)
            .slice(0, request.per_page)?;

        if !items.is_empty() {
            return Ok(Slice {
                page: request.page,
                items,
                anchored: true,
            });
        }

        tracing::warn!(
            "Anchor {} for page {} not found, showing the first page",
            anchor,
            request.page
        );
        Ok(Slice {
            page: 1,
            items: source.slice(0, request.per_page)?,
            anchored: false,
        })
    }

    fn estimator<K>(&self, request: &PageRequest<K>, page: u64, lookahead: u64) -> CountEstimator {
        CountEstimator::new(page, request.per_page)
            .with_external(request.count)
            .with_max_count(request.max_count)
            .with_lookahead(lookahead)
    }

    fn assemble<T, K: Clone>(
        &self,
        request: &PageRequest<K>,
        slice: Slice<T>,
        count: Count,
        anchors: Option<AnchorSet<K>>,
        mode: PaginationMode,
    ) -> Page<T, K> {
        let per_page = request.per_page;

        // Under concurrent deletes the count can fall behind an anchored page
        let pages = if slice.items.is_empty() {
            count.pages(per_page)
        } else {
            count.pages(per_page).max(slice.page)
        };

        let anchors = anchors.filter(|_| mode.uses_anchors());
        let window: PageWindow<K> =
            compute_window(slice.page, pages, &self.config).into_window(slice.page, anchors.as_ref());

        Page {
            items: slice.items,
            count,
            pages,
            page: slice.page,
            per_page,
            anchor: anchors.and_then(|set| set.anchor),
            window,
            mode,
            links: LinkBuilder::new(request.query.clone(), &request.namespace),
        }
    }
}

impl<T> Slice<T> {
    fn empty() -> Self {
        Self {
            page: 1,
            items: Vec::new(),
            anchored: false,
        }
    }
}
