//! Error types for pagewise
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for pagewise
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Page {page} has no results")]
    PageOutOfRange { page: u64 },

    #[error(
        "Unable to reach the raw collection within {max_depth} steps, \
         the decorator chain seems to loop"
    )]
    UnwrapLoop { max_depth: usize },

    #[error(
        "Keyset pagination requires a unique ordering key ('{key}' is not unique) \
         or a max_count/count fallback"
    )]
    UniqueKeyRequired { key: String },

    // ============================================================================
    // Backing Store Errors
    // ============================================================================
    #[error("Backing store error: {message}")]
    BackingStore { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a page out of range error
    pub fn page_out_of_range(page: u64) -> Self {
        Self::PageOutOfRange { page }
    }

    /// Create a backing store error
    pub fn backing_store(message: impl Into<String>) -> Self {
        Self::BackingStore {
            message: message.into(),
        }
    }

    /// Create a unique key required error
    pub fn unique_key_required(key: impl Into<String>) -> Self {
        Self::UniqueKeyRequired { key: key.into() }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the error should surface as "not found" at an HTTP boundary
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PageOutOfRange { .. })
    }

    /// Whether the error points at a malformed collaborator or configuration
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            Error::UnwrapLoop { .. }
                | Error::UniqueKeyRequired { .. }
                | Error::Config { .. }
                | Error::InvalidConfigValue { .. }
        )
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::backing_store(err.to_string())
    }
}

/// Result type alias for pagewise
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::page_out_of_range(7);
        assert_eq!(err.to_string(), "Page 7 has no results");

        let err = Error::config("per_page must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: per_page must be positive"
        );

        let err = Error::backing_store("connection reset");
        assert_eq!(err.to_string(), "Backing store error: connection reset");

        let err = Error::UnwrapLoop { max_depth: 10 };
        assert!(err.to_string().contains("within 10 steps"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::page_out_of_range(2).is_not_found());

        assert!(!Error::backing_store("io").is_not_found());
        assert!(!Error::UnwrapLoop { max_depth: 10 }.is_not_found());
        assert!(!Error::unique_key_required("created").is_not_found());
    }

    #[test]
    fn test_is_fatal_config() {
        assert!(Error::UnwrapLoop { max_depth: 10 }.is_fatal_config());
        assert!(Error::unique_key_required("created").is_fatal_config());
        assert!(Error::invalid_value("per_page", "must be positive").is_fatal_config());

        assert!(!Error::page_out_of_range(3).is_fatal_config());
        assert!(!Error::backing_store("io").is_fatal_config());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::backing_store("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Backing store error: inner"));
    }
}
