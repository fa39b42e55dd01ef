//! `ParcelDB` Spatial
//!
//! This crate provides the geometry index and geodesic search operations
//! for `ParcelDB`.
//!
//! # Overview
//!
//! The spatial module provides:
//!
//! - **Grid index**: Parcels bucketed into 1-degree cells for cheap radius scans
//! - **Geodesic math**: Haversine distances and radius search windows
//! - **Search operations**: Radius search, nearest neighbors, index summaries
//!
//! The same haversine distance ranks candidates and is reported back to
//! callers, so result ordering always agrees with the returned distances.
//!
//! # Example
//!
//! ```ignore
//! use parceldb_core::{GeoPoint, ParcelId};
//! use parceldb_spatial::GeoIndex;
//! use parceldb_storage::backends::RedbEngine;
//! use parceldb_storage::{StorageEngine, Transaction};
//!
//! let engine = RedbEngine::in_memory()?;
//!
//! // Index a parcel inside a write transaction
//! let mut tx = engine.begin_write()?;
//! let id = ParcelId::new("apn-5843-021")?;
//! let point = GeoPoint::new(34.0522, -118.2437)?;
//! GeoIndex::upsert(&mut tx, &id, None, &point)?;
//! tx.commit()?;
//!
//! // Search around downtown LA
//! let tx = engine.begin_read()?;
//! let hits = GeoIndex::within(&tx, &point, 10_000.0)?;
//! assert_eq!(hits.len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`index`] - The grid-backed geometry index ([`GeoIndex`])
//! - [`geodesic`] - Haversine distance and search windows
//! - [`grid`] - Cell assignment and entry key encoding
//! - [`bounds`] - Bounding boxes and summaries
//! - [`error`] - Error types

pub mod bounds;
pub mod error;
pub mod geodesic;
pub mod grid;
pub mod index;

pub use bounds::{BoundingBox, GeoSummary};
pub use error::{SpatialError, SpatialResult};
pub use geodesic::{haversine_meters, radius_bounds, RadiusBounds, EARTH_RADIUS_METERS};
pub use grid::GridCell;
pub use index::GeoIndex;
