//! `ParcelDB` Storage
//!
//! This crate provides the storage engine abstraction and backend implementations
//! for `ParcelDB`.
//!
//! # Overview
//!
//! The storage layer provides a transactional key-value interface that backends
//! implement. This allows `ParcelDB` to support multiple storage engines while
//! providing consistent ACID semantics.
//!
//! # Core Traits
//!
//! - [`StorageEngine`] - The main entry point for storage operations
//! - [`Transaction`] - ACID transaction support with read/write operations
//! - [`Cursor`] - Forward iteration over key-value pairs in key order
//!
//! # Error Handling
//!
//! All storage operations return [`StorageResult<T>`], which is an alias for
//! `Result<T, StorageError>`. The [`StorageError`] enum covers all possible
//! failure modes from database-level issues to I/O errors.
//!
//! # Example
//!
//! ```ignore
//! use parceldb_storage::{StorageEngine, Transaction};
//! use parceldb_storage::backends::RedbEngine;
//!
//! // Open or create a database
//! let engine = RedbEngine::open("parcels.redb")?;
//!
//! // Write some data
//! let mut tx = engine.begin_write()?;
//! tx.put("parcels", b"apn-5843-021", b"...")?;
//! tx.commit()?;
//!
//! // Read it back
//! let tx = engine.begin_read()?;
//! let parcel = tx.get("parcels", b"apn-5843-021")?;
//! assert!(parcel.is_some());
//! ```
//!
//! # Modules
//!
//! - [`engine`] - Storage engine traits and abstractions
//! - [`backends`] - Concrete storage backend implementations

pub mod backends;
pub mod engine;

pub use engine::{
    Cursor, CursorResult, KeyValue, StorageEngine, StorageError, StorageResult, Transaction,
};
