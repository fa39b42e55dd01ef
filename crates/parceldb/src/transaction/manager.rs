//! Transaction manager for coordinating storage transactions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parceldb_core::TransactionError;
use parceldb_storage::{StorageEngine, StorageError};

use super::handle::DatabaseTransaction;

/// Manages transactions across the record store and the spatial index.
///
/// The `TransactionManager` hands out [`DatabaseTransaction`] handles backed
/// by the storage engine. Each handle carries a unique transaction ID for
/// debugging and logging.
///
/// # Example
///
/// ```ignore
/// use parceldb::transaction::TransactionManager;
/// use parceldb_storage::backends::RedbEngine;
///
/// let engine = RedbEngine::in_memory()?;
/// let manager = TransactionManager::new(engine);
///
/// let mut tx = manager.begin_write()?;
/// // ... operations ...
/// tx.commit()?;
/// ```
pub struct TransactionManager<E: StorageEngine> {
    /// The underlying storage engine.
    engine: Arc<E>,

    /// Counter for assigning transaction IDs.
    next_tx_id: AtomicU64,
}

impl<E: StorageEngine> TransactionManager<E> {
    /// Create a new transaction manager with the given storage engine.
    pub fn new(engine: E) -> Self {
        Self { engine: Arc::new(engine), next_tx_id: AtomicU64::new(1) }
    }

    /// Create a transaction manager from a shared storage engine.
    pub const fn from_arc(engine: Arc<E>) -> Self {
        Self { engine, next_tx_id: AtomicU64::new(1) }
    }

    /// Begin a read-only transaction.
    ///
    /// Read transactions see a consistent snapshot of the database taken at
    /// this call. Multiple read transactions can run concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_read(&self) -> Result<DatabaseTransaction<E::Transaction<'_>>, TransactionError> {
        let tx_id = self.next_tx_id.fetch_add(1, Ordering::Relaxed);
        let storage_tx =
            self.engine.begin_read().map_err(|e| storage_error_to_transaction_error(&e))?;

        Ok(DatabaseTransaction::new_read(tx_id, storage_tx))
    }

    /// Begin a read-write transaction.
    ///
    /// Write transactions are serialized by the storage engine: only one is
    /// active at a time, so writes to a given parcel never interleave.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_write(&self) -> Result<DatabaseTransaction<E::Transaction<'_>>, TransactionError> {
        let tx_id = self.next_tx_id.fetch_add(1, Ordering::Relaxed);
        let storage_tx =
            self.engine.begin_write().map_err(|e| storage_error_to_transaction_error(&e))?;

        Ok(DatabaseTransaction::new_write(tx_id, storage_tx))
    }

    /// Flush any buffered data to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&self) -> Result<(), TransactionError> {
        self.engine.flush().map_err(|e| storage_error_to_transaction_error(&e))
    }

    /// Get a reference to the underlying storage engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Get a shared handle to the underlying storage engine.
    #[must_use]
    pub fn engine_arc(&self) -> Arc<E> {
        Arc::clone(&self.engine)
    }
}

/// Convert a storage error to a transaction error.
fn storage_error_to_transaction_error(err: &StorageError) -> TransactionError {
    match err {
        StorageError::ReadOnly => TransactionError::ReadOnly,
        StorageError::Serialization(msg) => TransactionError::Serialization(msg.clone()),
        _ => TransactionError::Storage(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parceldb_storage::backends::RedbEngine;

    #[test]
    fn manager_hands_out_distinct_ids() {
        let engine = RedbEngine::in_memory().expect("failed to create engine");
        let manager = TransactionManager::new(engine);

        let tx1 = manager.begin_read().expect("failed to begin tx1");
        let tx2 = manager.begin_read().expect("failed to begin tx2");

        assert_ne!(tx1.id(), tx2.id());
    }

    #[test]
    fn read_only_error_maps_to_transaction_read_only() {
        let mapped = storage_error_to_transaction_error(&StorageError::ReadOnly);
        assert!(matches!(mapped, TransactionError::ReadOnly));
    }
}
