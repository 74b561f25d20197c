//! Paginator configuration
//!
//! Window sizes, page size and counting limits, passed explicitly into the
//! engine. Every field has a default so a partial YAML document is enough.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of items per page
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Default size of the leading page cluster
pub const DEFAULT_LEADING_DISPLAYED: u64 = 8;

/// Default size of the trailing page cluster
pub const DEFAULT_TRAILING_DISPLAYED: u64 = 8;

/// Default number of pages shown on each side of the current page
pub const DEFAULT_ADJACENT: u64 = 2;

/// Default bound on decorator chain unwrapping
pub const DEFAULT_MAX_UNWRAP_DEPTH: usize = 10;

/// Configuration for the pagination engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginatorConfig {
    /// Items per page
    pub per_page: u64,

    /// Pages shown in the leading cluster (`1 2 3 ... 8`)
    pub leading_displayed: u64,

    /// Pages shown in the trailing cluster
    pub trailing_displayed: u64,

    /// Pages shown immediately around the current page
    pub adjacent: u64,

    /// Stop counting at this many items and report a lower bound
    pub max_count: Option<u64>,

    /// Address pages by anchor key instead of offset
    pub keyset: bool,

    /// Prefix for the `page` / `pk` query parameters
    pub var_prefix: String,

    /// Maximum decorator layers to walk through before giving up
    pub max_unwrap_depth: usize,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            leading_displayed: DEFAULT_LEADING_DISPLAYED,
            trailing_displayed: DEFAULT_TRAILING_DISPLAYED,
            adjacent: DEFAULT_ADJACENT,
            max_count: None,
            keyset: false,
            var_prefix: String::new(),
            max_unwrap_depth: DEFAULT_MAX_UNWRAP_DEPTH,
        }
    }
}

impl PaginatorConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document and validate it
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Set items per page
    #[must_use]
    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set the count cap
    #[must_use]
    pub fn with_max_count(mut self, max_count: u64) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Enable or disable keyset navigation
    #[must_use]
    pub fn with_keyset(mut self, keyset: bool) -> Self {
        self.keyset = keyset;
        self
    }

    /// Set the query parameter prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.var_prefix = prefix.into();
        self
    }

    /// Set window sizes
    #[must_use]
    pub fn with_window(mut self, leading: u64, trailing: u64, adjacent: u64) -> Self {
        self.leading_displayed = leading;
        self.trailing_displayed = trailing;
        self.adjacent = adjacent;
        self
    }

    /// Set the decorator unwrap bound
    #[must_use]
    pub fn with_max_unwrap_depth(mut self, depth: usize) -> Self {
        self.max_unwrap_depth = depth;
        self
    }

    /// Last page number that still belongs to the leading cluster
    pub fn leading_range(&self) -> u64 {
        self.leading_displayed - self.adjacent
    }

    /// Number of pages at the end that belong to the trailing cluster
    pub fn trailing_range(&self) -> u64 {
        self.trailing_displayed - self.adjacent
    }

    /// Check the config for values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(Error::invalid_value("per_page", "must be at least 1"));
        }
        if self.adjacent >= self.leading_displayed {
            return Err(Error::invalid_value(
                "adjacent",
                format!(
                    "must be smaller than leading_displayed ({})",
                    self.leading_displayed
                ),
            ));
        }
        if self.adjacent >= self.trailing_displayed {
            return Err(Error::invalid_value(
                "adjacent",
                format!(
                    "must be smaller than trailing_displayed ({})",
                    self.trailing_displayed
                ),
            ));
        }
        if self.max_count == Some(0) {
            return Err(Error::invalid_value("max_count", "must be at least 1"));
        }
        if self.max_unwrap_depth == 0 {
            return Err(Error::invalid_value("max_unwrap_depth", "must be at least 1"));
        }
        Ok(())
    }
}
