//! Transaction error types shared by the storage-facing crates.

use thiserror::Error;

/// Errors raised by transaction lifecycle and storage access.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The transaction was already committed or rolled back.
    #[error("transaction already completed")]
    AlreadyCompleted,

    /// A write operation was attempted on a read-only transaction.
    #[error("transaction is read-only")]
    ReadOnly,

    /// A record could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The underlying storage layer reported an error.
    #[error("storage error: {0}")]
    Storage(String),

    /// An internal invariant was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
