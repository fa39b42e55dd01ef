//! Transaction management for `ParcelDB`.
//!
//! This module provides the [`TransactionManager`] and [`DatabaseTransaction`]
//! types that coordinate transactions across the record store and the spatial
//! index. Every write applies its index updates inside the same storage
//! transaction as the record write, so the two commit or roll back together.
//!
//! # Example
//!
//! ```ignore
//! use parceldb::transaction::TransactionManager;
//! use parceldb::{ParcelDraft, ParcelId};
//! use parceldb_storage::backends::RedbEngine;
//!
//! // Create the engine and manager
//! let engine = RedbEngine::open("parcels.db")?;
//! let manager = TransactionManager::new(engine);
//!
//! // Write transaction
//! let mut tx = manager.begin_write()?;
//! let draft = ParcelDraft::new(ParcelId::new("4218-016-018")?)
//!     .with_coordinates(34.0522, -118.2437);
//! tx.put_parcel(draft)?;
//! tx.commit()?;
//!
//! // Read transaction
//! let tx = manager.begin_read()?;
//! let parcel = tx.get_parcel(&ParcelId::new("4218-016-018")?)?;
//! ```

mod handle;
mod manager;

pub use handle::DatabaseTransaction;
pub use manager::TransactionManager;
