//! `ParcelDB` Core
//!
//! This crate provides the fundamental types shared across the `ParcelDB`
//! workspace: the parcel record, its identifier, derived point geometry,
//! attribute values, and distance-scored result wrappers.
//!
//! # Overview
//!
//! - **Identifier**: [`ParcelId`], the validated primary key of a parcel
//! - **Record**: [`Parcel`] (stored record) and [`ParcelDraft`] (upsert payload)
//! - **Geometry**: [`GeoPoint`] plus the derivation and validation functions
//!   in [`geometry`]
//! - **Attributes**: [`Value`], the open mapping of descriptive and scoring
//!   fields
//! - **Results**: [`ScoredParcel`] and [`ScoredId`] for proximity queries
//!
//! # Example
//!
//! ```
//! use parceldb_core::{Parcel, ParcelDraft, ParcelId};
//!
//! // Drafts carry the caller-settable fields of a parcel
//! let draft = ParcelDraft::new(ParcelId::new("4218-016-018").unwrap())
//!     .with_coordinates(34.0522, -118.2437)
//!     .with_attribute("zoning", "R1")
//!     .with_attribute("walk_score", 73i64);
//!
//! // Building a record validates coordinates and derives the geometry
//! let parcel = Parcel::from_draft(draft).unwrap();
//! let geometry = parcel.geometry().unwrap();
//! assert_eq!(geometry.longitude(), -118.2437);
//! assert_eq!(geometry.latitude(), 34.0522);
//!
//! // Out-of-range coordinates reject the whole record
//! let bad = ParcelDraft::new(ParcelId::new("X").unwrap()).with_coordinates(91.0, 0.0);
//! assert!(Parcel::from_draft(bad).is_err());
//! ```
//!
//! # Modules
//!
//! - [`types`] - Core data types ([`Parcel`], [`ParcelDraft`], [`Value`], IDs)
//! - [`geometry`] - Point geometry and coordinate validation
//! - [`transaction`] - Transaction error types ([`TransactionError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod geometry;
pub mod transaction;
pub mod types;


// Re-export commonly used types
pub use geometry::{check_coordinates, derive_point, CoordinateError, GeoPoint, SRID_WGS84};
pub use transaction::{TransactionError, TransactionResult};
pub use types::{Parcel, ParcelDraft, ParcelId, ParcelIdError, ScoredId, ScoredParcel, Value};
