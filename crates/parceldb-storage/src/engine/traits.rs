//! Storage abstraction the parcel store is written against.
//!
//! The parcel database persists two kinds of data: serialized property
//! records keyed by id, and grid-cell index entries whose ordering drives
//! spatial scans. Both reduce to ordered key-value access, so the seam is
//! three traits:
//!
//! - [`StorageEngine`] hands out transactions
//! - [`Transaction`] does reads, writes, and opens cursors
//! - [`Cursor`] walks entries forward in key order
//!
//! Backends pick their own transaction and cursor types through GATs.

use std::ops::Bound;
use std::sync::Arc;

use super::StorageError;

/// A decoded key-value pair yielded by a cursor.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Result of advancing a cursor: the next pair, or `None` at the end.
pub type CursorResult = Result<Option<KeyValue>, StorageError>;

/// Entry point for transactional key-value storage.
///
/// Every parcel mutation runs inside a transaction obtained here, which is
/// what makes record writes and index writes land atomically. Engines are
/// shared across threads, so implementations must be `Send + Sync`.
///
/// # Example
///
/// ```ignore
/// use parceldb_storage::{StorageEngine, Transaction};
///
/// fn example<E: StorageEngine>(engine: &E) -> Result<(), StorageError> {
///     let tx = engine.begin_read()?;
///     let record = tx.get("parcels", b"some-id")?;
///
///     let mut tx = engine.begin_write()?;
///     tx.put("parcels", b"some-id", b"...")?;
///     tx.commit()?;
///     Ok(())
/// }
/// ```
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    ///
    /// Readers see a consistent snapshot and may run concurrently with
    /// each other and with a writer.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Begin a read-write transaction.
    ///
    /// Backends may serialize writers against each other.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Flush any buffered data to durable storage.
    ///
    /// Default is a no-op; backends that are durable on commit need nothing
    /// more.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the flush fails.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// A unit of atomic work against the store.
///
/// Changes become visible only on [`commit`](Transaction::commit); a
/// transaction dropped without committing rolls back.
pub trait Transaction {
    /// The cursor type for iteration.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Look up a value by key in a logical table.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(value))` if the key exists, `Ok(None)` if it doesn't.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TableNotFound`] if the backend distinguishes
    /// missing tables from empty ones.
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write a key-value pair, replacing any existing value.
    ///
    /// Tables spring into existence on first write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction.
    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Remove a key from a table.
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the key was deleted, `Ok(false)` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction.
    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError>;

    /// Open a cursor over every entry in a table, in key order.
    ///
    /// The cursor starts before the first key; advance it with
    /// [`Cursor::next`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TableNotFound`] if the backend distinguishes
    /// missing tables from empty ones.
    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError>;

    /// Open a cursor over a bounded key range.
    ///
    /// Grid-cell scans use this to visit exactly one cell's index entries.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use std::ops::Bound;
    ///
    /// // Scan keys from "a" (inclusive) to "z" (exclusive)
    /// let cursor = tx.range(
    ///     "geo_index",
    ///     Bound::Included(b"a".as_slice()),
    ///     Bound::Excluded(b"z".as_slice()),
    /// )?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TableNotFound`] if the backend distinguishes
    /// missing tables from empty ones.
    fn range(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
    ) -> Result<Self::Cursor<'_>, StorageError>;

    /// Commit, making all changes durable and visible.
    ///
    /// Consumes the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails.
    fn commit(self) -> Result<(), StorageError>;

    /// Discard all changes made in this transaction.
    ///
    /// Dropping without commit has the same effect; this makes the intent
    /// explicit at call sites.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the rollback fails.
    fn rollback(self) -> Result<(), StorageError>;

    /// Whether this transaction rejects writes.
    fn is_read_only(&self) -> bool;
}

/// Forward-only iteration over key-value pairs in key order.
///
/// # Iteration Pattern
///
/// ```ignore
/// let mut cursor = tx.cursor("parcels")?;
/// while let Some((key, value)) = cursor.next()? {
///     // decode and process
/// }
/// ```
pub trait Cursor {
    /// Position at the first entry and return it, or `None` if the range
    /// is empty.
    fn seek_first(&mut self) -> CursorResult;

    /// Advance to the next entry.
    ///
    /// An unpositioned cursor moves to the first pair, so a plain `next`
    /// loop visits every entry.
    fn next(&mut self) -> CursorResult;

    /// The entry under the cursor, without advancing.
    ///
    /// Returns `None` if the cursor is not positioned at a valid entry.
    fn current(&self) -> Option<(&[u8], &[u8])>;
}

/// Implement `StorageEngine` for `Arc<E>` to allow shared ownership of engines.
///
/// This lets the transaction manager and consistency checks share one engine
/// without threading lifetimes through every caller.
impl<E: StorageEngine> StorageEngine for Arc<E> {
    type Transaction<'a>
        = E::Transaction<'a>
    where
        Self: 'a;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_read()
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_write()
    }

    fn flush(&self) -> Result<(), StorageError> {
        (**self).flush()
    }
}
