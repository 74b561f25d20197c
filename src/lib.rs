// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # pagewise
//!
//! Page-number and keyset pagination over ordered collections, with a
//! navigation window that stays cheap on very large tables.
//!
//! ## Features
//!
//! - **Offset pagination**: Classic `?page=N` addressing
//! - **Keyset pagination**: Pages addressed by the first item's key (`?page=N&pk=K`),
//!   stable under inserts and deletes
//! - **Bounded counting**: Stop counting at `max_count` and report "N+"
//! - **Navigation window**: Leading/trailing clusters, ellipses, previous/next
//! - **Link building**: Links that change only this paginator's parameters
//! - **DuckDB tables**: Paginate any table with an integer key column
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewise::{Paginator, PaginatorConfig, PageRequest, VecCollection};
//!
//! let paginator = Paginator::new(PaginatorConfig::default().with_keyset(true))?;
//! let collection = VecCollection::from_keys(0..100);
//!
//! let request: PageRequest<i64> = paginator.request("page=3&pk=20");
//! let page = paginator.paginate(&collection, &request)?;
//!
//! for link in page.window.page_numbers() {
//!     // render navigation
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Paginator                              │
//! │  request(query) → PageRequest    paginate(source, req) → Page   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────┬───┴─────────┬────────────┬───────────┐
//! │ Collection │   Anchors   │    Count    │   Window   │   Codec   │
//! ├────────────┼─────────────┼─────────────┼────────────┼───────────┤
//! │ In-memory  │ Forward     │ External    │ Leading    │ page/pk   │
//! │ DuckDB     │ Backward    │ Capped      │ Trailing   │ Prefixes  │
//! │ Decorated  │ Miss/Delete │ Lookahead   │ Adjacent   │ Links     │
//! └────────────┴─────────────┴─────────────┴────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for pagewise
pub mod error;

/// Common types and type aliases
pub mod types;

/// Paginator configuration
pub mod config;

/// Ordered collections and decorator unwrapping
pub mod collection;

/// Query-string parameters and links
pub mod codec;

/// Pagination engine
pub mod pagination;

/// DuckDB-backed collections
pub mod database;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};
pub use types::*;

// Re-export commonly used types
pub use collection::{Decorated, OrderedCollection, Unwrap, VecCollection};
pub use config::PaginatorConfig;
pub use database::{DatabaseEngine, TableCollection};
pub use pagination::{Page, PageRequest, PageWindow, PaginationMode, Paginator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
