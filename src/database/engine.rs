//! DuckDB connection handling
//!
//! Opens a DuckDB database (in-memory or on disk), attaches further DuckDB
//! files read-only, and hands out table collections.

use super::table::TableCollection;
use crate::error::{Error, Result};
use duckdb::Connection;
use regex::Regex;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Shared DuckDB connection
///
/// Cloning is cheap; all clones use the same connection, serialised by a
/// mutex.
#[derive(Clone)]
pub struct DatabaseEngine {
    conn: Arc<Mutex<Connection>>,
    path: String,
}

impl std::fmt::Debug for DatabaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseEngine")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl DatabaseEngine {
    /// Open a database file, or an in-memory database for `:memory:`
    pub fn open(path: &str) -> Result<Self> {
        if path == ":memory:" {
            return Self::open_in_memory();
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::config(format!("Failed to open DuckDB database {path}: {e}")))?;
        tracing::debug!("Opened DuckDB database {}", path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_string(),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: ":memory:".to_string(),
        })
    }

    /// Path this database was opened from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Attach another DuckDB file read-only under `alias`
    ///
    /// Its tables are then addressed as `alias.table`.
    pub fn attach(&self, path: &str, alias: &str) -> Result<()> {
        validate_identifier(alias)?;
        if alias.contains('.') {
            return Err(Error::config(format!("Invalid attach alias: '{alias}'")));
        }
        let escaped = path.replace('\'', "''");

        self.lock()?
            .execute_batch(&format!("ATTACH '{escaped}' AS {alias} (READ_ONLY);"))
            .map_err(|e| Error::config(format!("Failed to attach {path} as {alias}: {e}")))?;
        tracing::info!("Attached {} as {}", path, alias);

        Ok(())
    }

    /// Run one or more SQL statements
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        tracing::debug!("Executing batch: {}", sql);
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    /// Names of the tables in the main database
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT table_name FROM information_schema.tables
             WHERE table_schema = 'main'
             ORDER BY table_name",
        )?;

        let tables = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(tables)
    }

    /// Ordered collection over `table`, keyed by the integer column `key`
    pub fn table(&self, table: &str, key: &str, unique: bool) -> Result<TableCollection> {
        TableCollection::open(self.clone(), table, key, unique)
    }

    /// Lock the connection for one query
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::backing_store("DuckDB connection mutex poisoned"))
    }
}

/// Check a (possibly `catalog.`-qualified) SQL identifier
pub(crate) fn validate_identifier(name: &str) -> Result<()> {
    if name.split('.').all(|part| IDENTIFIER_REGEX.is_match(part)) && name.split('.').count() <= 2 {
        Ok(())
    } else {
        Err(Error::config(format!("Invalid SQL identifier: '{name}'")))
    }
}

/// Quote an already validated identifier
pub(crate) fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{part}\""))
        .collect::<Vec<_>>()
        .join(".")
}
