//! Error types for `ParcelDB`.
//!
//! This module provides the [`enum@Error`] type that represents all possible
//! errors when using `ParcelDB`.

use parceldb_core::{CoordinateError, ParcelId, ParcelIdError, TransactionError};
use parceldb_spatial::SpatialError;
use parceldb_storage::StorageError;
use thiserror::Error;

/// Errors that can occur when using `ParcelDB`.
///
/// This enum covers all error conditions from opening a database to running
/// proximity queries.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate was present but non-finite or out of range.
    ///
    /// The write that produced this error left the store and the spatial
    /// index unmodified.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),

    /// A parcel identifier failed validation.
    #[error("invalid parcel id: {0}")]
    InvalidParcelId(#[from] ParcelIdError),

    /// A parcel was not found when required.
    #[error("parcel not found: {0}")]
    ParcelNotFound(ParcelId),

    /// A parcel exists but has no derived geometry, and the operation
    /// requires one.
    #[error("parcel '{0}' has no geometry")]
    MissingGeometry(ParcelId),

    /// The stored records and the spatial index disagree.
    ///
    /// This indicates corruption rather than bad input; callers should not
    /// retry. [`Database::rebuild_spatial_index`](crate::Database::rebuild_spatial_index)
    /// restores consistency from the stored records.
    #[error("spatial index inconsistency: {0}")]
    IndexInconsistency(String),

    /// A transaction error occurred.
    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),

    /// A storage error occurred.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A spatial index error occurred.
    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors are caused by the request rather than the state of
    /// the database: the caller can fix the input and retry. Index
    /// inconsistencies, storage failures, and open failures are not
    /// recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate(_)
                | Self::InvalidParcelId(_)
                | Self::ParcelNotFound(_)
                | Self::MissingGeometry(_)
        )
    }

    /// Returns `true` if this error means a requested parcel does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ParcelNotFound(_))
    }

    /// Create a config error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an index inconsistency error.
    #[must_use]
    pub fn index_inconsistency(msg: impl Into<String>) -> Self {
        Self::IndexInconsistency(msg.into())
    }
}

/// A specialized `Result` type for `ParcelDB` operations.
pub type Result<T> = std::result::Result<T, Error>;
