//! `ParcelDB` - An Embedded Geospatial Parcel Store
//!
//! ParcelDB is an embedded database for real-estate parcel records with
//! derived point geometry and geodesic proximity queries.
//!
//! # Features
//!
//! - **Parcel Records**: Store parcels with coordinates and open attributes
//! - **Derived Geometry**: WGS84 point geometry computed from coordinates,
//!   never set by hand, so records and index can always be reconciled
//! - **Proximity Queries**: Radius search, nearest neighbors, and pairwise
//!   distances, all in geodesic meters
//! - **ACID Transactions**: Record writes and spatial index updates commit
//!   atomically
//!
//! # Quick Start
//!
//! ## Opening a Database
//!
//! ```ignore
//! use parceldb::Database;
//!
//! // Open or create a database file
//! let db = Database::open("parcels.db")?;
//!
//! // Or create an in-memory database for testing
//! let db = Database::in_memory()?;
//! ```
//!
//! ## Storing Parcels
//!
//! ```ignore
//! use parceldb::{Database, ParcelDraft, ParcelId};
//!
//! let db = Database::in_memory()?;
//!
//! let draft = ParcelDraft::new(ParcelId::new("4218-016-018")?)
//!     .with_coordinates(34.0522, -118.2437)
//!     .with_attribute("zoning", "R1")
//!     .with_attribute("assessed_value", 425_000i64);
//!
//! let parcel = db.upsert(draft)?;
//! assert!(parcel.has_geometry());
//! ```
//!
//! ## Proximity Queries
//!
//! ```ignore
//! use parceldb::{Database, GeoPoint};
//!
//! let db = Database::open("parcels.db")?;
//!
//! // Everything within 10 km of downtown Los Angeles, closest first
//! let downtown = GeoPoint::new(34.0522, -118.2437)?;
//! for hit in db.radius_search(&downtown, 10_000.0)? {
//!     println!("{} at {:.0} m", hit.id(), hit.distance_meters);
//! }
//!
//! // The five nearest parcels
//! let closest = db.nearest_neighbors(&downtown, 5)?;
//! ```
//!
//! ## Using Transactions
//!
//! ```ignore
//! use parceldb::Database;
//!
//! let db = Database::in_memory()?;
//!
//! // Write transaction: both upserts commit together
//! let mut tx = db.begin()?;
//! tx.put_parcel(draft_a)?;
//! tx.put_parcel(draft_b)?;
//! tx.commit()?;
//!
//! // Read transaction: a consistent snapshot
//! let tx = db.begin_read()?;
//! let parcel = tx.get_parcel(&parcel_id)?;
//! ```
//!
//! # Configuration
//!
//! Use [`DatabaseBuilder`] for advanced configuration:
//!
//! ```ignore
//! use parceldb::DatabaseBuilder;
//!
//! let db = DatabaseBuilder::new()
//!     .path("parcels.db")
//!     .cache_size(128 * 1024 * 1024)  // 128MB cache
//!     .open()?;
//! ```
//!
//! # Modules
//!
//! - [`config`] - Database configuration and builder
//! - [`database`] - Main database interface
//! - [`error`] - Error types
//! - [`query`] - Proximity queries and geometry validation
//! - [`transaction`] - Transaction management

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

// Re-export core types
pub use parceldb_core::{
    check_coordinates, derive_point, CoordinateError, GeoPoint, Parcel, ParcelDraft, ParcelId,
    ParcelIdError, ScoredId, ScoredParcel, TransactionError, TransactionResult, Value, SRID_WGS84,
};

// Re-export spatial types surfaced by queries
pub use parceldb_spatial::{haversine_meters, BoundingBox, GeoSummary, EARTH_RADIUS_METERS};

// Re-export storage types
pub use parceldb_storage::{StorageEngine, Transaction};

// Modules
pub mod config;
pub mod database;
pub mod error;
pub mod query;
pub mod transaction;

// Public API re-exports
pub use config::{Config, DatabaseBuilder};
pub use database::Database;
pub use error::{Error, Result};
pub use query::GeometryValidation;
pub use transaction::{DatabaseTransaction, TransactionManager};
