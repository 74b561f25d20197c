//! Pagination module
//!
//! Supports: Offset, Keyset (anchor), Degraded (keyset requested on a
//! non-unique key with a count fallback)
//!
//! # Overview
//!
//! The engine turns a [`PageRequest`] and an ordered collection into a
//! [`Page`]: the current items, a total count (exact or a lower bound) and
//! a window of page links. In keyset mode every nearby page link carries the
//! key of that page's first item, so following a link keeps showing the same
//! items even while rows are inserted or removed before it.
//!
//! - `window` - page number clusters around the current page
//! - `anchor` - first keys of the neighbouring pages
//! - `count` - exact, capped or inferred totals
//! - `engine` - mode selection and assembly

mod anchor;
mod count;
mod engine;
mod types;
mod window;

pub use anchor::{AnchorResolver, ResolvedAnchors};
pub use count::{CountContext, CountEstimator, ForwardScan};
pub use engine::Paginator;
pub use types::{
    AnchorSet, Page, PageLink, PageRequest, PageWindow, PaginationMode, Slot,
};
pub use window::{anchor_reach, compute_window, WindowLayout};
