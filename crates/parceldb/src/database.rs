//! Main database interface.
//!
//! This module provides the [`Database`] struct, which is the primary entry
//! point for interacting with a `ParcelDB` database.
//!
//! # Examples
//!
//! Open a database and perform basic operations:
//!
//! ```ignore
//! use parceldb::{Database, ParcelDraft, ParcelId};
//!
//! // Open or create a database
//! let db = Database::open("parcels.db")?;
//!
//! // Store a parcel
//! let draft = ParcelDraft::new(ParcelId::new("4218-016-018")?)
//!     .with_coordinates(34.0522, -118.2437)
//!     .with_attribute("zoning", "R1");
//! db.upsert(draft)?;
//!
//! // Read it back
//! let parcel = db.parcel(&ParcelId::new("4218-016-018")?)?;
//! assert!(parcel.has_geometry());
//! ```
//!
//! Use transactions for multi-record atomic operations:
//!
//! ```ignore
//! use parceldb::Database;
//!
//! let db = Database::open("parcels.db")?;
//!
//! let mut tx = db.begin()?;
//! tx.put_parcel(draft_a)?;
//! tx.put_parcel(draft_b)?;
//! tx.commit()?;
//! ```

use std::path::Path;

use tracing::{info, warn};

use parceldb_core::{GeoPoint, Parcel, ParcelDraft, ParcelId, ScoredParcel};
use parceldb_spatial::GeoSummary;
use parceldb_storage::backends::redb::{RedbConfig, RedbEngine};

use crate::config::{Config, DatabaseBuilder};
use crate::error::{Error, Result};
use crate::query::GeometryValidation;
use crate::transaction::{DatabaseTransaction, TransactionManager};

/// The main `ParcelDB` database handle.
///
/// `Database` is the primary entry point for interacting with a `ParcelDB`
/// database. It provides methods for:
///
/// - Opening and configuring databases
/// - Storing, reading, and deleting parcel records
/// - Proximity queries over the spatial index
/// - Managing transactions
///
/// # Thread Safety
///
/// `Database` is `Send + Sync` and can be safely shared across threads.
/// Multiple concurrent read transactions are supported; write transactions
/// are serialized by the storage engine.
///
/// # Examples
///
/// ```ignore
/// use parceldb::{Database, GeoPoint};
///
/// let db = Database::open("parcels.db")?;
///
/// // One-shot operations manage their own transactions
/// db.upsert(draft)?;
///
/// // Proximity query: everything within 10 km of downtown LA
/// let downtown = GeoPoint::new(34.0522, -118.2437)?;
/// let nearby = db.radius_search(&downtown, 10_000.0)?;
/// ```
pub struct Database {
    /// The transaction manager coordinating storage and the spatial index.
    manager: TransactionManager<RedbEngine>,
    /// The configuration used to open this database.
    config: Config,
}

impl Database {
    /// Open or create a database at the given path.
    ///
    /// This is a convenience method that uses default configuration options.
    /// For more control, use [`DatabaseBuilder`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use parceldb::Database;
    ///
    /// let db = Database::open("parcels.db")?;
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        DatabaseBuilder::new().path(path.as_ref()).open()
    }

    /// Open or create an in-memory database.
    ///
    /// In-memory databases are useful for testing and temporary data.
    /// All data is lost when the database is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn in_memory() -> Result<Self> {
        DatabaseBuilder::in_memory().open()
    }

    /// Open a database with the given configuration.
    ///
    /// This is typically called through [`DatabaseBuilder::open()`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let engine = if config.in_memory {
            RedbEngine::in_memory().map_err(|e| Error::Open(e.to_string()))?
        } else {
            let mut redb_config = RedbConfig::new();
            if let Some(cache_size) = config.cache_size {
                redb_config = redb_config.cache_size(cache_size);
            }
            RedbEngine::open_with_config(&config.path, redb_config)
                .map_err(|e| Error::Open(e.to_string()))?
        };

        if config.in_memory {
            info!("Opened in-memory parcel database");
        } else {
            info!("Opened parcel database: {}", config.path.display());
        }

        let manager = TransactionManager::new(engine);
        Ok(Self { manager, config })
    }

    /// Returns a builder for creating a database with custom configuration.
    #[must_use]
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Get the configuration used to open this database.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin a new read-write transaction.
    ///
    /// Write transactions allow both reading and writing data. Only one
    /// write transaction is active at a time, so writes to a parcel never
    /// interleave.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut tx = db.begin()?;
    /// tx.put_parcel(draft)?;
    /// tx.commit()?;
    /// ```
    pub fn begin(
        &self,
    ) -> Result<
        DatabaseTransaction<<RedbEngine as parceldb_storage::StorageEngine>::Transaction<'_>>,
    > {
        self.manager.begin_write().map_err(Error::Transaction)
    }

    /// Begin a new read-only transaction.
    ///
    /// Read transactions provide a consistent snapshot of the database.
    /// Multiple read transactions can run concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_read(
        &self,
    ) -> Result<
        DatabaseTransaction<<RedbEngine as parceldb_storage::StorageEngine>::Transaction<'_>>,
    > {
        self.manager.begin_read().map_err(Error::Transaction)
    }

    // ========================================================================
    // One-Shot Record Operations
    // ========================================================================

    /// Insert or replace a parcel record in its own transaction.
    ///
    /// Validates coordinates, derives the geometry, updates the spatial
    /// index, and commits. Returns the record as stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if a coordinate is present but
    /// out of range; neither the store nor the index is modified then.
    pub fn upsert(&self, draft: ParcelDraft) -> Result<Parcel> {
        let mut tx = self.begin()?;
        let parcel = tx.put_parcel(draft)?;
        tx.commit()?;
        Ok(parcel)
    }

    /// Insert or replace multiple parcels in a single transaction.
    ///
    /// One invalid draft rejects the entire batch; either every record is
    /// stored or none is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if any draft carries an
    /// out-of-range coordinate.
    pub fn upsert_batch(&self, drafts: Vec<ParcelDraft>) -> Result<Vec<Parcel>> {
        let mut tx = self.begin()?;
        let parcels = tx.put_parcels_batch(drafts)?;
        tx.commit()?;
        Ok(parcels)
    }

    /// Get a parcel by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParcelNotFound`] if no parcel has this identifier.
    pub fn parcel(&self, id: &ParcelId) -> Result<Parcel> {
        let tx = self.begin_read()?;
        tx.get_parcel(id)?.ok_or_else(|| Error::ParcelNotFound(id.clone()))
    }

    /// Delete a parcel by its identifier.
    ///
    /// The spatial index entry, if any, is removed in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParcelNotFound`] if no parcel has this identifier;
    /// nothing is modified then.
    pub fn delete(&self, id: &ParcelId) -> Result<()> {
        let mut tx = self.begin()?;
        if !tx.delete_parcel(id)? {
            return Err(Error::ParcelNotFound(id.clone()));
        }
        tx.commit()
    }

    /// Collect all parcels matching a predicate, in identifier order.
    ///
    /// The scan runs against a single read snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or a record cannot be decoded.
    pub fn scan<F>(&self, predicate: F) -> Result<Vec<Parcel>>
    where
        F: FnMut(&Parcel) -> bool,
    {
        let tx = self.begin_read()?;
        tx.scan(predicate)
    }

    /// Count the stored parcels.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn count_parcels(&self) -> Result<u64> {
        let tx = self.begin_read()?;
        tx.count_parcels()
    }

    // ========================================================================
    // One-Shot Proximity Queries
    // ========================================================================

    /// Geodesic distance in meters between two parcels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParcelNotFound`] if either parcel does not exist,
    /// or [`Error::MissingGeometry`] if either has no known location.
    pub fn distance_between(&self, a: &ParcelId, b: &ParcelId) -> Result<f64> {
        let tx = self.begin_read()?;
        tx.distance_between(a, b)
    }

    /// Find every parcel within `radius_meters` of a center point.
    ///
    /// The radius is inclusive. Results are ordered by ascending distance,
    /// ties broken by identifier; parcels without geometry never appear.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexInconsistency`] if the index disagrees with
    /// the stored records.
    pub fn radius_search(
        &self,
        center: &GeoPoint,
        radius_meters: f64,
    ) -> Result<Vec<ScoredParcel>> {
        let tx = self.begin_read()?;
        tx.radius_search(center, radius_meters)
    }

    /// Find the `k` parcels closest to a center point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexInconsistency`] if the index disagrees with
    /// the stored records.
    pub fn nearest_neighbors(&self, center: &GeoPoint, k: usize) -> Result<Vec<ScoredParcel>> {
        let tx = self.begin_read()?;
        tx.nearest_neighbors(center, k)
    }

    /// Validate a parcel's stored geometry against its coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParcelNotFound`] if the parcel does not exist.
    pub fn validate_geometry(&self, id: &ParcelId) -> Result<GeometryValidation> {
        let tx = self.begin_read()?;
        tx.validate_geometry(id)
    }

    /// Bounding box and centroid over every parcel with geometry.
    ///
    /// Returns `None` when no parcel has geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn spatial_summary(&self) -> Result<Option<GeoSummary>> {
        let tx = self.begin_read()?;
        tx.spatial_summary()
    }

    // ========================================================================
    // Index Maintenance
    // ========================================================================

    /// Rebuild the spatial index from the stored records.
    ///
    /// Returns the number of entries in the rebuilt index.
    ///
    /// # Errors
    ///
    /// Returns an error if the rebuild transaction fails.
    pub fn rebuild_spatial_index(&self) -> Result<u64> {
        let mut tx = self.begin()?;
        let entries = tx.rebuild_spatial_index()?;
        tx.commit()?;

        info!("Rebuilt spatial index: {entries} entries");
        Ok(entries)
    }

    /// Verify that the spatial index agrees with the stored records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexInconsistency`] naming the first divergence
    /// found. Run [`rebuild_spatial_index`](Self::rebuild_spatial_index)
    /// to repair.
    pub fn verify_spatial_index(&self) -> Result<()> {
        let tx = self.begin_read()?;
        if let Err(err) = tx.verify_spatial_index() {
            warn!("Spatial index verification failed: {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Flush any buffered data to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&self) -> Result<()> {
        self.manager.flush().map_err(Error::Transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParcelId {
        ParcelId::new(s).expect("valid id")
    }

    #[test]
    fn test_one_shot_upsert_and_get() {
        let db = Database::in_memory().expect("failed to open db");

        let draft = ParcelDraft::new(id("A")).with_coordinates(34.0522, -118.2437);
        db.upsert(draft).expect("failed to upsert");

        let parcel = db.parcel(&id("A")).expect("failed to get parcel");
        assert!(parcel.has_geometry());
    }

    #[test]
    fn test_missing_parcel_is_not_found() {
        let db = Database::in_memory().expect("failed to open db");

        let err = db.parcel(&id("missing")).expect_err("expected not-found error");
        assert!(err.is_not_found());
    }
}
