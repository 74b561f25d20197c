//! CLI module
//!
//! Command-line interface for paginating DuckDB tables.
//!
//! # Commands
//!
//! - `page` - Print one page of a table
//! - `tables` - List tables in a database
//! - `config` - Print the effective paginator configuration
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{navigation_line, render_page, Runner};
pub use server::{router, serve};
