//! Error types for the spatial crate.

use thiserror::Error;

/// Errors that can occur in spatial index operations.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Encoding/decoding error for index entries.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] parceldb_storage::StorageError),
}

impl SpatialError {
    /// Create an encoding error with a message.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

/// Result type for spatial operations.
pub type SpatialResult<T> = Result<T, SpatialError>;
