//! Database transaction handle for user operations.

use parceldb_core::{Parcel, ParcelDraft, ParcelId, TransactionError};
use parceldb_spatial::GeoIndex;
use parceldb_storage::{Cursor, StorageError, Transaction};

use crate::error::{Error, Result};

/// Well-known table names for parcel storage.
pub(crate) mod tables {
    /// Full parcel records, keyed by parcel identifier bytes.
    pub const PARCELS: &str = "parcels";
}

/// A database transaction handle for user operations.
///
/// `DatabaseTransaction` wraps a storage transaction and provides high-level
/// operations on parcel records. Record writes and the spatial index updates
/// they imply happen inside the same storage transaction, so a commit makes
/// both visible at once and a rollback discards both.
///
/// # Read vs Write Transactions
///
/// - **Read transactions**: see a consistent snapshot; writes return an error.
/// - **Write transactions**: can both read and write data.
///
/// # Commit and Rollback
///
/// Transactions must be explicitly committed to persist changes. Dropping a
/// transaction without committing will roll back all changes.
///
/// # Example
///
/// ```ignore
/// // Write transaction
/// let mut tx = manager.begin_write()?;
/// let draft = ParcelDraft::new(ParcelId::new("4218-016-018")?)
///     .with_coordinates(34.0522, -118.2437);
/// tx.put_parcel(draft)?;
/// tx.commit()?;
///
/// // Read transaction
/// let tx = manager.begin_read()?;
/// let parcel = tx.get_parcel(&ParcelId::new("4218-016-018")?)?;
/// ```
pub struct DatabaseTransaction<T: Transaction> {
    /// Unique transaction ID for debugging and logging.
    tx_id: u64,

    /// The underlying storage transaction.
    storage: Option<T>,

    /// Whether this is a read-only transaction.
    read_only: bool,
}

impl<T: Transaction> DatabaseTransaction<T> {
    /// Create a new read-only transaction.
    pub(crate) const fn new_read(tx_id: u64, storage: T) -> Self {
        Self { tx_id, storage: Some(storage), read_only: true }
    }

    /// Create a new read-write transaction.
    pub(crate) const fn new_write(tx_id: u64, storage: T) -> Self {
        Self { tx_id, storage: Some(storage), read_only: false }
    }

    /// Get the transaction ID.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.tx_id
    }

    /// Check if this is a read-only transaction.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Get the storage transaction, returning an error if already consumed.
    pub(crate) fn storage(&self) -> std::result::Result<&T, TransactionError> {
        self.storage.as_ref().ok_or(TransactionError::AlreadyCompleted)
    }

    /// Get the storage transaction mutably, for write operations.
    pub(crate) fn storage_mut(&mut self) -> std::result::Result<&mut T, TransactionError> {
        if self.read_only {
            return Err(TransactionError::ReadOnly);
        }
        self.storage.as_mut().ok_or(TransactionError::AlreadyCompleted)
    }

    // ========================================================================
    // Parcel Operations
    // ========================================================================

    /// Get a parcel by its identifier.
    ///
    /// Returns `Ok(None)` if the parcel does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has completed or the stored record
    /// cannot be decoded.
    pub fn get_parcel(&self, id: &ParcelId) -> Result<Option<Parcel>> {
        let storage = self.storage()?;

        match storage.get(tables::PARCELS, id.as_bytes()) {
            Ok(Some(bytes)) => Ok(Some(decode_parcel(&bytes)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or replace a parcel record.
    ///
    /// The draft's coordinates are validated, the point geometry is derived
    /// from them, and `updated_at` is stamped with the current time. Each
    /// upsert replaces the stored record wholesale. The spatial index is
    /// updated in the same transaction: a parcel gaining coordinates is
    /// added, one losing them is removed, and one that moved is re-placed.
    ///
    /// Returns the record as stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if a coordinate is present but
    /// out of range; nothing is written in that case.
    pub fn put_parcel(&mut self, draft: ParcelDraft) -> Result<Parcel> {
        let parcel = Parcel::from_draft(draft)?;
        self.write_record(&parcel)?;
        Ok(parcel)
    }

    /// Insert or replace multiple parcel records in one call.
    ///
    /// All drafts are validated before anything is written, so one invalid
    /// coordinate rejects the entire batch.
    ///
    /// Returns the records as stored, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if any draft carries an
    /// out-of-range coordinate.
    pub fn put_parcels_batch(&mut self, drafts: Vec<ParcelDraft>) -> Result<Vec<Parcel>> {
        let mut parcels = Vec::with_capacity(drafts.len());
        for draft in drafts {
            parcels.push(Parcel::from_draft(draft)?);
        }

        for parcel in &parcels {
            self.write_record(parcel)?;
        }

        Ok(parcels)
    }

    /// Write a validated record and sync its spatial index entry.
    fn write_record(&mut self, parcel: &Parcel) -> Result<()> {
        let previous = self.get_parcel(parcel.id())?;
        let value = encode_parcel(parcel)?;

        let storage = self.storage_mut()?;
        storage.put(tables::PARCELS, parcel.id().as_bytes(), &value)?;

        let old_point = previous.as_ref().and_then(Parcel::geometry);
        match (old_point, parcel.geometry()) {
            (old, Some(point)) => {
                GeoIndex::upsert(storage, parcel.id(), old.as_ref(), &point)?;
            }
            (Some(old), None) => {
                GeoIndex::remove(storage, parcel.id(), &old)?;
            }
            (None, None) => {}
        }

        Ok(())
    }

    /// Delete a parcel by its identifier.
    ///
    /// Returns `true` if the parcel existed and was deleted, `false` if it
    /// didn't exist. The spatial index entry, if any, is removed in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is read-only or has completed.
    pub fn delete_parcel(&mut self, id: &ParcelId) -> Result<bool> {
        let previous = self.get_parcel(id)?;

        let storage = self.storage_mut()?;
        let deleted = storage.delete(tables::PARCELS, id.as_bytes())?;

        if deleted {
            if let Some(point) = previous.as_ref().and_then(Parcel::geometry) {
                GeoIndex::remove(storage, id, &point)?;
            }
        }

        Ok(deleted)
    }

    /// Collect all parcels matching a predicate, in identifier order.
    ///
    /// The scan runs against this transaction's snapshot, so records written
    /// by later transactions are not visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has completed or a record cannot
    /// be decoded.
    pub fn scan<F>(&self, mut predicate: F) -> Result<Vec<Parcel>>
    where
        F: FnMut(&Parcel) -> bool,
    {
        let mut parcels = Vec::new();
        self.for_each_parcel(|parcel| {
            if predicate(parcel) {
                parcels.push(parcel.clone());
            }
            true
        })?;
        Ok(parcels)
    }

    /// Visit every parcel in identifier order.
    ///
    /// The callback returns `true` to continue or `false` to stop early.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has completed or a record cannot
    /// be decoded.
    pub fn for_each_parcel<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&Parcel) -> bool,
    {
        let storage = self.storage()?;

        let mut cursor = match storage.cursor(tables::PARCELS) {
            Ok(c) => c,
            Err(StorageError::TableNotFound(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some((_key, value)) = cursor.next()? {
            let parcel = decode_parcel(&value)?;
            if !f(&parcel) {
                break;
            }
        }

        Ok(())
    }

    /// Count the stored parcels.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has completed.
    pub fn count_parcels(&self) -> Result<u64> {
        let storage = self.storage()?;

        let mut cursor = match storage.cursor(tables::PARCELS) {
            Ok(c) => c,
            Err(StorageError::TableNotFound(_)) => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut count = 0u64;
        while cursor.next()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    // ========================================================================
    // Index Maintenance
    // ========================================================================

    /// Rebuild the spatial index from the stored records.
    ///
    /// Clears the index and re-adds an entry for every parcel with geometry.
    /// Use this to recover from an
    /// [`IndexInconsistency`](crate::Error::IndexInconsistency).
    ///
    /// Returns the number of entries in the rebuilt index.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is read-only or has completed.
    pub fn rebuild_spatial_index(&mut self) -> Result<u64> {
        let mut located = Vec::new();
        self.for_each_parcel(|parcel| {
            if let Some(point) = parcel.geometry() {
                located.push((parcel.id().clone(), point));
            }
            true
        })?;

        let storage = self.storage_mut()?;
        GeoIndex::clear(storage)?;
        for (id, point) in &located {
            GeoIndex::upsert(storage, id, None, point)?;
        }

        Ok(located.len() as u64)
    }

    /// Verify that the spatial index agrees with the stored records.
    ///
    /// Checks that every index entry points at an existing record with the
    /// same location, that each entry sits in the grid cell its location
    /// maps to, and that the entry count equals the number of parcels with
    /// geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexInconsistency`] naming the first divergence
    /// found.
    pub fn verify_spatial_index(&self) -> Result<()> {
        let storage = self.storage()?;

        let mut entries = Vec::new();
        GeoIndex::for_each(storage, |id, point| {
            entries.push((id.clone(), *point));
            true
        })?;

        for (id, point) in &entries {
            let Some(parcel) = self.get_parcel(id)? else {
                return Err(Error::index_inconsistency(format!(
                    "indexed parcel '{id}' has no stored record"
                )));
            };
            if parcel.geometry() != Some(*point) {
                return Err(Error::index_inconsistency(format!(
                    "indexed location for parcel '{id}' does not match its record"
                )));
            }
            if GeoIndex::entry(storage, id, point)? != Some(*point) {
                return Err(Error::index_inconsistency(format!(
                    "index entry for parcel '{id}' is in the wrong grid cell"
                )));
            }
        }

        let mut with_geometry = 0u64;
        self.for_each_parcel(|parcel| {
            if parcel.has_geometry() {
                with_geometry += 1;
            }
            true
        })?;

        if with_geometry != entries.len() as u64 {
            return Err(Error::index_inconsistency(format!(
                "{with_geometry} parcels have geometry but the index holds {} entries",
                entries.len()
            )));
        }

        Ok(())
    }

    // ========================================================================
    // Transaction Lifecycle
    // ========================================================================

    /// Commit the transaction, making all changes durable.
    ///
    /// After commit, the transaction handle is consumed and cannot be used.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has already completed or the
    /// commit fails.
    pub fn commit(mut self) -> Result<()> {
        let storage = self.storage.take().ok_or(TransactionError::AlreadyCompleted)?;
        storage.commit()?;
        Ok(())
    }

    /// Rollback the transaction, discarding all changes.
    ///
    /// This is implicit when a transaction is dropped without committing,
    /// but can be called explicitly for clarity.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has already completed or the
    /// rollback fails.
    pub fn rollback(mut self) -> Result<()> {
        let storage = self.storage.take().ok_or(TransactionError::AlreadyCompleted)?;
        storage.rollback()?;
        Ok(())
    }
}

impl<T: Transaction> Drop for DatabaseTransaction<T> {
    fn drop(&mut self) {
        // If storage is still Some, the transaction was not committed or
        // rolled back. Roll back best-effort; errors cannot propagate here.
        if let Some(storage) = self.storage.take() {
            let _ = storage.rollback();
        }
    }
}

/// Encode a parcel record for storage.
fn encode_parcel(parcel: &Parcel) -> std::result::Result<Vec<u8>, TransactionError> {
    bincode::serde::encode_to_vec(parcel, bincode::config::standard())
        .map_err(|e| TransactionError::Serialization(e.to_string()))
}

/// Decode a parcel record from storage.
fn decode_parcel(bytes: &[u8]) -> std::result::Result<Parcel, TransactionError> {
    let (parcel, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map_err(|e| TransactionError::Serialization(e.to_string()))?;
    Ok(parcel)
}
