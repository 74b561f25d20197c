//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keyset pagination over DuckDB tables
#[derive(Parser, Debug)]
#[command(name = "pagewise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Paginator configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Items per page
    #[arg(long, global = true)]
    pub per_page: Option<u64>,

    /// Stop counting at this many items
    #[arg(long, global = true)]
    pub max_count: Option<u64>,

    /// Address pages by anchor key
    #[arg(long, global = true)]
    pub keyset: bool,

    /// Prefix for the page/pk query parameters
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Attach a DuckDB file read-only, its tables addressed as `alias.table`
    #[arg(long = "attach", global = true, value_name = "ALIAS=PATH")]
    pub attach: Vec<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one page of a table
    Page {
        /// DuckDB database file (`:memory:` for an empty in-memory database)
        #[arg(short, long)]
        database: String,

        /// Table to paginate
        #[arg(short, long)]
        table: String,

        /// Integer ordering key column
        #[arg(short, long, default_value = "id")]
        key: String,

        /// The key column never repeats
        #[arg(long)]
        unique: bool,

        /// Order by the key descending
        #[arg(long)]
        desc: bool,

        /// Page number (overrides --query)
        #[arg(long)]
        page: Option<u64>,

        /// Anchor key (overrides --query)
        #[arg(long)]
        pk: Option<i64>,

        /// Known item count, skips counting
        #[arg(long)]
        count: Option<u64>,

        /// Query string of the current request, e.g. "q=x&page=3&pk=42"
        #[arg(short, long)]
        query: Option<String>,
    },

    /// List tables in a database
    Tables {
        /// DuckDB database file
        #[arg(short, long)]
        database: String,
    },

    /// Print the effective paginator configuration
    Config,

    /// Start HTTP server mode
    Serve {
        /// DuckDB database file
        #[arg(short, long)]
        database: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON document
    Json,
    /// Human-readable output
    Pretty,
}
