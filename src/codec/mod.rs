//! Query-string codec
//!
//! Reads the page number and anchor for one paginator out of a flat
//! parameter set and builds links that change only those two parameters.
//!
//! # Parameters
//!
//! - `{prefix}page` - 1-based page number, anything unparseable means page 1
//! - `{prefix}pk` - anchor key of the page's first item, omitted for page 1
//!
//! Distinct prefixes let several paginators share one rendered view.

mod link;
mod params;

pub use link::LinkBuilder;
pub use params::{parse_query, PageParams, ANCHOR_VAR, PAGE_VAR};
