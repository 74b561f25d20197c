//! DuckDB table collection
//!
//! Exposes a table as an ordered collection keyed by an integer column.
//! Filters and ordering are compiled into SQL; the table is only queried by
//! `slice`, `keys`, `count` and `count_up_to`.

use super::engine::{quote_identifier, validate_identifier, DatabaseEngine};
use crate::collection::{Layer, OrderedCollection, Unwrap};
use crate::error::{Error, Result};
use crate::types::{CountCapability, KeyOp, KeyOrdering, SortDirection};
use duckdb::params_from_iter;
use serde::Serialize;
use serde_json::{Map, Value};

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Value of the ordering key column
    #[serde(skip)]
    pub key: i64,
    /// All columns by name
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Row {
    /// Column value by name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }
}

/// Ordered collection over a DuckDB table
#[derive(Debug, Clone)]
pub struct TableCollection {
    db: DatabaseEngine,
    table: String,
    columns: Vec<String>,
    ordering: KeyOrdering,
    filters: Vec<(KeyOp, i64)>,
    capability: CountCapability,
}

impl TableCollection {
    /// Open `table`, ordered ascending by `key`
    ///
    /// `unique` declares whether `key` never repeats; it is not checked.
    pub fn open(db: DatabaseEngine, table: &str, key: &str, unique: bool) -> Result<Self> {
        validate_identifier(table)?;
        validate_identifier(key)?;
        if key.contains('.') {
            return Err(Error::config(format!("Invalid key column: '{key}'")));
        }

        let columns = table_columns(&db, table)?;
        if columns.is_empty() {
            return Err(Error::config(format!("Table '{table}' not found")));
        }
        if !columns.iter().any(|column| column == key) {
            return Err(Error::config(format!(
                "Table '{table}' has no column '{key}'"
            )));
        }

        let ordering = if unique {
            KeyOrdering::unique(key)
        } else {
            KeyOrdering::non_unique(key)
        };

        Ok(Self {
            db,
            table: table.to_string(),
            columns,
            ordering,
            filters: Vec::new(),
            capability: CountCapability::Cheap,
        })
    }

    /// Declare how expensive counting is
    #[must_use]
    pub fn with_count_capability(mut self, capability: CountCapability) -> Self {
        self.capability = capability;
        self
    }

    /// Table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column names in table order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn key_column(&self) -> String {
        quote_identifier(&self.ordering.key)
    }

    /// `FROM ... WHERE ...` with its parameters
    fn from_clause(&self) -> (String, Vec<i64>) {
        let mut sql = format!("FROM {}", quote_identifier(&self.table));
        let key = self.key_column();

        for (i, (op, _)) in self.filters.iter().enumerate() {
            let joiner = if i == 0 { "WHERE" } else { "AND" };
            sql.push_str(&format!(" {joiner} {key} {} ?", op.as_sql()));
        }

        (sql, self.filters.iter().map(|(_, value)| *value).collect())
    }

    /// Full `SELECT` for positions `first..last` of the view
    fn select_sql(&self, columns: &str, first: u64, last: u64) -> (String, Vec<i64>) {
        let (from, params) = self.from_clause();
        let sql = format!(
            "SELECT {columns} {from} ORDER BY {} {} LIMIT {} OFFSET {first}",
            self.key_column(),
            self.ordering.direction.as_sql(),
            sql_bound(last.saturating_sub(first)),
        );
        (sql, params)
    }

    fn count_sql(&self, sql: &str, params: &[i64]) -> Result<u64> {
        tracing::debug!("Executing query: {} {:?}", sql, params);
        let conn = self.db.lock()?;
        let count: i64 = conn.query_row(sql, params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl OrderedCollection for TableCollection {
    type Item = Row;
    type Key = i64;

    fn ordering(&self) -> KeyOrdering {
        self.ordering.clone()
    }

    fn key_of(&self, item: &Row) -> i64 {
        item.key
    }

    fn slice(&self, first: u64, last: u64) -> Result<Vec<Row>> {
        if last <= first || first > MAX_SQL_BOUND {
            return Ok(Vec::new());
        }

        let column_list = std::iter::once(self.key_column())
            .chain(self.columns.iter().map(|column| quote_identifier(column)))
            .collect::<Vec<_>>()
            .join(", ");
        let (sql, params) = self.select_sql(&column_list, first, last);
        tracing::debug!("Executing query: {} {:?}", sql, params);

        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let key: i64 = row.get(0)?;
                let mut fields = Map::with_capacity(self.columns.len());
                for (i, column) in self.columns.iter().enumerate() {
                    let value: duckdb::types::Value = row.get(i + 1)?;
                    fields.insert(column.clone(), duckdb_value_to_json(value));
                }
                Ok(Row { key, fields })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn keys(&self, first: u64, last: u64) -> Result<Vec<i64>> {
        if last <= first || first > MAX_SQL_BOUND {
            return Ok(Vec::new());
        }

        let (sql, params) = self.select_sql(&self.key_column(), first, last);
        tracing::debug!("Executing query: {} {:?}", sql, params);

        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let keys = stmt
            .query_map(params_from_iter(params.iter()), |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;

        Ok(keys)
    }

    fn count_capability(&self) -> CountCapability {
        self.capability
    }

    fn count(&self) -> Result<Option<u64>> {
        if self.capability == CountCapability::Unsupported {
            return Ok(None);
        }
        let (from, params) = self.from_clause();
        self.count_sql(&format!("SELECT COUNT(*) {from}"), &params)
            .map(Some)
    }

    fn count_up_to(&self, limit: u64) -> Result<u64> {
        let (from, params) = self.from_clause();
        let sql = format!(
            "SELECT COUNT(*) FROM (SELECT 1 {from} LIMIT {}) AS capped",
            sql_bound(limit)
        );
        self.count_sql(&sql, &params)
    }

    fn filter_key(&self, op: KeyOp, value: &i64) -> Self {
        let mut filtered = self.clone();
        filtered.filters.push((op, *value));
        filtered
    }

    fn order_by(&self, key: &str, direction: SortDirection) -> Result<Self> {
        if key != self.ordering.key {
            return Err(Error::config(format!(
                "Table '{}' is keyed by '{}', cannot order by '{key}'",
                self.table, self.ordering.key
            )));
        }
        let mut ordered = self.clone();
        ordered.ordering.direction = direction;
        Ok(ordered)
    }
}

impl Unwrap for TableCollection {
    type Raw = Self;

    fn inner(&self) -> Layer<'_, Self> {
        Layer::Raw(self)
    }
}

/// Largest LIMIT/OFFSET DuckDB accepts
const MAX_SQL_BOUND: u64 = i64::MAX as u64;

fn sql_bound(n: u64) -> u64 {
    n.min(MAX_SQL_BOUND)
}

/// Column names of `table` in ordinal order
fn table_columns(db: &DatabaseEngine, table: &str) -> Result<Vec<String>> {
    let (sql, params) = match table.split_once('.') {
        Some((catalog, name)) => (
            "SELECT column_name FROM information_schema.columns
             WHERE table_catalog = ? AND table_name = ?
             ORDER BY ordinal_position",
            vec![catalog, name],
        ),
        None => (
            "SELECT column_name FROM information_schema.columns
             WHERE table_schema = 'main' AND table_name = ?
             ORDER BY ordinal_position",
            vec![table],
        ),
    };

    let conn = db.lock()?;
    let mut stmt = conn.prepare(sql)?;
    let columns = stmt
        .query_map(params_from_iter(params), |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(columns)
}

/// Convert DuckDB Value to JSON Value
fn duckdb_value_to_json(value: duckdb::types::Value) -> Value {
    use duckdb::types::Value as Db;

    match value {
        Db::Null => Value::Null,
        Db::Boolean(b) => Value::Bool(b),
        Db::TinyInt(i) => Value::Number(i.into()),
        Db::SmallInt(i) => Value::Number(i.into()),
        Db::Int(i) => Value::Number(i.into()),
        Db::BigInt(i) => Value::Number(i.into()),
        Db::HugeInt(i) => Value::String(i.to_string()),
        Db::UTinyInt(i) => Value::Number(i.into()),
        Db::USmallInt(i) => Value::Number(i.into()),
        Db::UInt(i) => Value::Number(i.into()),
        Db::UBigInt(i) => Value::Number(i.into()),
        Db::Float(f) => serde_json::Number::from_f64(f64::from(f)).map_or(Value::Null, Value::Number),
        Db::Double(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        Db::Text(s) => Value::String(s),
        Db::Blob(bytes) => Value::Array(bytes.into_iter().map(Value::from).collect()),
        Db::Timestamp(_, micros) => {
            let secs = micros.div_euclid(1_000_000);
            let nsecs = (micros.rem_euclid(1_000_000) * 1000) as u32;
            chrono::DateTime::from_timestamp(secs, nsecs)
                .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()))
                .unwrap_or(Value::Number(micros.into()))
        }
        Db::Date32(days) => {
            // 719163 days from 0001-01-01 to 1970-01-01
            chrono::NaiveDate::from_num_days_from_ce_opt(days + 719_163)
                .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Number(days.into()))
        }
        other => Value::String(format!("{other:?}")),
    }
}
