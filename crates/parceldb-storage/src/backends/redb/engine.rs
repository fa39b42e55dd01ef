//! The redb-backed storage engine behind the parcel store.

use std::path::Path;

use redb::Database;

use crate::engine::{StorageEngine, StorageError};

use super::transaction::RedbTransaction;

/// Tuning knobs for the redb backend.
///
/// Everything is optional; unset fields fall back to redb's own defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbConfig {
    /// Page cache budget in bytes.
    pub cache_size: Option<usize>,
}

impl RedbConfig {
    /// Configuration with redb's defaults throughout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cache budget in bytes.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }
}

/// An embedded, single-file store for parcel records and their
/// spatial-index entries.
///
/// All parcel data lives in one redb database file; logical tables
/// ("parcels", "geo_index", ...) are multiplexed over it by key prefix.
///
/// # Example
///
/// ```ignore
/// use parceldb_storage::backends::RedbEngine;
///
/// let engine = RedbEngine::open("parcels.redb")?;
///
/// let mut tx = engine.begin_write()?;
/// tx.put("parcels", b"apn-5843-021", b"...")?;
/// tx.commit()?;
/// ```
pub struct RedbEngine {
    db: Database,
}

impl RedbEngine {
    /// Open the parcel database at `path`, creating the file if it does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the file cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open the parcel database at `path` with explicit tuning options.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the file cannot be opened or created.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: RedbConfig,
    ) -> Result<Self, StorageError> {
        let mut builder = Database::builder();

        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder.create(path.as_ref()).map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self { db })
    }

    /// Create a throwaway in-memory database.
    ///
    /// Contents vanish when the engine is dropped; intended for tests.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the backend cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self { db })
    }
}

impl StorageEngine for RedbEngine {
    type Transaction<'a> = RedbTransaction;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_read(tx))
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_write(tx))
    }

    fn flush(&self) -> Result<(), StorageError> {
        // Redb makes commits durable on their own; nothing to flush here.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Transaction;

    #[test]
    fn in_memory_engine_serves_transactions() {
        let engine = RedbEngine::in_memory().expect("failed to create in-memory db");

        let tx = engine.begin_read().expect("failed to begin read");
        assert!(tx.is_read_only());
    }

    #[test]
    fn config_builder_records_cache_size() {
        let config = RedbConfig::new().cache_size(1024 * 1024 * 10);

        assert_eq!(config.cache_size, Some(10 * 1024 * 1024));
    }

    #[test]
    fn committed_record_is_visible_to_readers() {
        let engine = RedbEngine::in_memory().expect("failed to create in-memory db");

        {
            let mut tx = engine.begin_write().expect("failed to begin write");
            tx.put("parcels", b"apn-0001-001", b"record").expect("failed to put");
            tx.commit().expect("failed to commit");
        }

        {
            let tx = engine.begin_read().expect("failed to begin read");
            let value = tx.get("parcels", b"apn-0001-001").expect("failed to get");
            assert_eq!(value, Some(b"record".to_vec()));
        }
    }
}
