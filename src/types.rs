//! Common types used throughout pagewise
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Flat, ordered list of query-string parameters
pub type QueryPairs = Vec<(String, String)>;

// ============================================================================
// Ordering
// ============================================================================

/// Sort direction of an ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest key first
    #[default]
    Asc,
    /// Largest key first
    Desc,
}

impl SortDirection {
    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Key filter that keeps the given key and everything after it
    /// when reading in this direction
    pub fn from_op(self) -> KeyOp {
        match self {
            SortDirection::Asc => KeyOp::Gte,
            SortDirection::Desc => KeyOp::Lte,
        }
    }

    /// Key filter that keeps the given key and everything before it
    pub fn until_op(self) -> KeyOp {
        self.reversed().from_op()
    }
}

/// Boundary filter on the ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyOp {
    /// key <= value
    Lte,
    /// key >= value
    Gte,
}

impl KeyOp {
    /// Check a key against a boundary value
    pub fn matches<K: Ord>(self, key: &K, value: &K) -> bool {
        match self {
            KeyOp::Lte => key <= value,
            KeyOp::Gte => key >= value,
        }
    }

    /// SQL comparison operator
    pub fn as_sql(self) -> &'static str {
        match self {
            KeyOp::Lte => "<=",
            KeyOp::Gte => ">=",
        }
    }
}

/// Ordering of a collection: key name, direction and whether the key is unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOrdering {
    /// Name of the ordering key (column or field)
    pub key: String,
    /// Direction items are returned in
    pub direction: SortDirection,
    /// Whether no two items share a key value
    pub unique: bool,
}

impl KeyOrdering {
    /// Ascending ordering on a unique key
    pub fn unique(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
            unique: true,
        }
    }

    /// Ascending ordering on a key that may repeat
    pub fn non_unique(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
            unique: false,
        }
    }

    /// Set direction
    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }
}

// ============================================================================
// Counting
// ============================================================================

/// How expensive it is to count a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountCapability {
    /// Counting is cheap (indexed table, in-memory list)
    #[default]
    Cheap,
    /// Counting works but requires a full scan
    Expensive,
    /// The source cannot count (or only approximately, like a search index)
    Unsupported,
}

impl CountCapability {
    /// Whether a full count may be run
    pub fn allows_full_count(self) -> bool {
        matches!(self, Self::Cheap)
    }
}

/// Total item count of a paginated view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Count {
    /// Exactly this many items
    Exact(u64),
    /// At least this many items (capped or inferred)
    AtLeast(u64),
}

impl Count {
    /// The numeric value regardless of precision
    pub fn value(&self) -> u64 {
        match self {
            Count::Exact(n) | Count::AtLeast(n) => *n,
        }
    }

    /// Whether the value is only a lower bound
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, Count::AtLeast(_))
    }

    /// Number of pages needed for this count
    pub fn pages(&self, per_page: u64) -> u64 {
        if per_page == 0 {
            return 0;
        }
        self.value().div_ceil(per_page)
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::Exact(n) => write!(f, "{n}"),
            Count::AtLeast(n) => write!(f, "{n}+"),
        }
    }
}
