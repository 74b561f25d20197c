//! Ordered collection module
//!
//! Uniform view over backing sources: in-memory vectors, DuckDB tables, and
//! decorators layered on top of either.
//!
//! # Overview
//!
//! - `OrderedCollection` - slicing, key filters, re-ordering and counting
//! - `Unwrap` / `unwrap_collection` - bounded walk down a decorator chain
//! - `VecCollection` - in-memory adapter
//! - `Decorated` - per-item hook applied on slice

mod decorated;
mod memory;
mod types;
mod unwrap;

pub use decorated::Decorated;
pub use memory::VecCollection;
pub use types::{CollectionKey, Layer, OrderedCollection, Unwrap};
pub use unwrap::{unwrap_collection, Unwrapped};

#[cfg(test)]
mod tests;
