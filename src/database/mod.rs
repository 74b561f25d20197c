//! DuckDB-backed collections
//!
//! This module exposes database tables as ordered collections, using DuckDB
//! as the query engine. Further DuckDB files can be attached read-only.

mod engine;
mod table;

pub use engine::DatabaseEngine;
pub use table::{Row, TableCollection};
