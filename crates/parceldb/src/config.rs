//! Database configuration.
//!
//! This module provides [`Config`] and [`DatabaseBuilder`] for opening a
//! database with custom options.
//!
//! # Example
//!
//! ```ignore
//! use parceldb::DatabaseBuilder;
//!
//! let db = DatabaseBuilder::new()
//!     .path("parcels.db")
//!     .cache_size(64 * 1024 * 1024)
//!     .open()?;
//! ```

use std::path::PathBuf;

use crate::database::Database;
use crate::error::{Error, Result};

/// Configuration options used to open a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the database file. Ignored for in-memory databases.
    pub path: PathBuf,
    /// Whether the database lives entirely in memory.
    pub in_memory: bool,
    /// Storage cache size in bytes, if overridden.
    pub cache_size: Option<usize>,
}

impl Config {
    /// Create a file-backed configuration with the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), in_memory: false, cache_size: None }
    }

    /// Create an in-memory configuration.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { path: PathBuf::new(), in_memory: true, cache_size: None }
    }
}

/// Builder for opening a database with custom configuration.
///
/// # Example
///
/// ```ignore
/// use parceldb::DatabaseBuilder;
///
/// // File-backed database with a larger cache
/// let db = DatabaseBuilder::new()
///     .path("parcels.db")
///     .cache_size(128 * 1024 * 1024)
///     .open()?;
///
/// // In-memory database for testing
/// let db = DatabaseBuilder::in_memory().open()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DatabaseBuilder {
    path: Option<PathBuf>,
    in_memory: bool,
    cache_size: Option<usize>,
}

impl DatabaseBuilder {
    /// Create a builder for a file-backed database.
    ///
    /// A path must be set with [`path`](Self::path) before opening.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for an in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { path: None, in_memory: true, cache_size: None }
    }

    /// Set the database file path.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the storage cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }

    /// Build the configuration without opening a database.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder is file-backed and no path was set.
    pub fn build(self) -> Result<Config> {
        if self.in_memory {
            let mut config = Config::in_memory();
            config.cache_size = self.cache_size;
            return Ok(config);
        }

        let path = self.path.ok_or_else(|| Error::config("database path is required"))?;
        let mut config = Config::new(path);
        config.cache_size = self.cache_size;
        Ok(config)
    }

    /// Build the configuration and open the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the database
    /// cannot be opened.
    pub fn open(self) -> Result<Database> {
        Database::open_with_config(self.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = Config::new("parcels.db");
        assert!(!config.in_memory);
        assert_eq!(config.path, PathBuf::from("parcels.db"));
        assert_eq!(config.cache_size, None);
    }

    #[test]
    fn test_builder_requires_path() {
        let result = DatabaseBuilder::new().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_in_memory_needs_no_path() {
        let config = DatabaseBuilder::in_memory().build().expect("failed to build config");
        assert!(config.in_memory);
    }

    #[test]
    fn test_builder_sets_cache_size() {
        let config = DatabaseBuilder::in_memory()
            .cache_size(64 * 1024 * 1024)
            .build()
            .expect("failed to build config");
        assert_eq!(config.cache_size, Some(64 * 1024 * 1024));
    }
}
