//! Proximity queries and geometry validation.
//!
//! This module extends [`DatabaseTransaction`] with the read-side spatial
//! operations: pairwise distances, radius search, nearest neighbors, and
//! per-record geometry validation. All distances are geodesic meters, used
//! both for ranking and in the reported values.
//!
//! # Example
//!
//! ```ignore
//! use parceldb::{Database, GeoPoint};
//!
//! let db = Database::in_memory()?;
//! // ... upsert parcels ...
//!
//! let downtown = GeoPoint::new(34.0522, -118.2437)?;
//! let tx = db.begin_read()?;
//!
//! // Everything within 10 km, closest first
//! for hit in tx.radius_search(&downtown, 10_000.0)? {
//!     println!("{} at {:.0} m", hit.id(), hit.distance_meters);
//! }
//! ```

use std::cmp::Ordering;

use parceldb_core::{GeoPoint, ParcelId, ScoredId, ScoredParcel};
use parceldb_spatial::{haversine_meters, GeoIndex, GeoSummary};
use parceldb_storage::Transaction;

use crate::error::{Error, Result};
use crate::transaction::DatabaseTransaction;

/// The outcome of validating a parcel's geometry against its coordinates.
///
/// A record is valid when its stored geometry equals the geometry derived
/// from its coordinates, and also when it has neither coordinates nor
/// geometry. Divergence means the record was corrupted or written by a
/// buggy path, since geometry is never independently settable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryValidation {
    /// The stored geometry matches the derived geometry.
    Consistent,

    /// The parcel has no coordinates and no geometry. Valid: location is
    /// simply unknown.
    NoGeometry,

    /// The stored geometry diverges from what the coordinates derive to.
    Mismatch {
        /// The geometry on the stored record.
        stored: Option<GeoPoint>,
        /// The geometry derived from the record's coordinates.
        derived: Option<GeoPoint>,
    },
}

impl GeometryValidation {
    /// Whether the record passed validation.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Consistent | Self::NoGeometry)
    }

    /// A short human-readable note on the outcome, if there is one.
    #[must_use]
    pub const fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Consistent => None,
            Self::NoGeometry => Some("no geometry"),
            Self::Mismatch { .. } => {
                Some("stored geometry does not match the record's coordinates")
            }
        }
    }
}

impl<T: Transaction> DatabaseTransaction<T> {
    /// Geodesic distance in meters between two parcels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParcelNotFound`] if either parcel does not exist,
    /// or [`Error::MissingGeometry`] if either has no known location.
    pub fn distance_between(&self, a: &ParcelId, b: &ParcelId) -> Result<f64> {
        let first = self.get_parcel(a)?.ok_or_else(|| Error::ParcelNotFound(a.clone()))?;
        let second = self.get_parcel(b)?.ok_or_else(|| Error::ParcelNotFound(b.clone()))?;

        let from = first.geometry().ok_or_else(|| Error::MissingGeometry(a.clone()))?;
        let to = second.geometry().ok_or_else(|| Error::MissingGeometry(b.clone()))?;

        Ok(haversine_meters(&from, &to))
    }

    /// Find every parcel within `radius_meters` of a center point.
    ///
    /// The radius is inclusive: a parcel exactly at the boundary is
    /// returned. Results are full records ordered by ascending distance,
    /// ties broken by identifier. Parcels without geometry never appear.
    /// A negative or NaN radius matches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexInconsistency`] if the index refers to a
    /// parcel with no stored record.
    pub fn radius_search(
        &self,
        center: &GeoPoint,
        radius_meters: f64,
    ) -> Result<Vec<ScoredParcel>> {
        let storage = self.storage()?;

        let mut hits = GeoIndex::within(storage, center, radius_meters)?;
        hits.sort_by(|x, y| {
            x.distance_meters
                .partial_cmp(&y.distance_meters)
                .unwrap_or(Ordering::Equal)
                .then_with(|| x.id.cmp(&y.id))
        });

        self.hydrate(hits)
    }

    /// Find the `k` parcels closest to a center point.
    ///
    /// Results are full records ordered by ascending distance, ties broken
    /// by identifier. Fewer than `k` are returned when fewer parcels have
    /// geometry; `k == 0` returns an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexInconsistency`] if the index refers to a
    /// parcel with no stored record.
    pub fn nearest_neighbors(&self, center: &GeoPoint, k: usize) -> Result<Vec<ScoredParcel>> {
        let storage = self.storage()?;
        let hits = GeoIndex::nearest(storage, center, k)?;
        self.hydrate(hits)
    }

    /// Validate a parcel's stored geometry against its coordinates.
    ///
    /// Re-derives the geometry from the record's own coordinates and
    /// compares it with the stored geometry field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParcelNotFound`] if the parcel does not exist.
    pub fn validate_geometry(&self, id: &ParcelId) -> Result<GeometryValidation> {
        let parcel = self.get_parcel(id)?.ok_or_else(|| Error::ParcelNotFound(id.clone()))?;

        let stored = parcel.geometry();
        let derived = parcel.derived_geometry();

        Ok(match (stored, derived) {
            (None, None) => GeometryValidation::NoGeometry,
            (s, d) if s == d => GeometryValidation::Consistent,
            (stored, derived) => GeometryValidation::Mismatch { stored, derived },
        })
    }

    /// Bounding box and centroid over every parcel with geometry.
    ///
    /// Returns `None` when no parcel has geometry, so callers never see a
    /// degenerate box.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction has completed or the index
    /// cannot be read.
    pub fn spatial_summary(&self) -> Result<Option<GeoSummary>> {
        let storage = self.storage()?;
        Ok(GeoIndex::summary(storage)?)
    }

    /// Fetch the full record for each scored identifier, keeping order.
    fn hydrate(&self, hits: Vec<ScoredId>) -> Result<Vec<ScoredParcel>> {
        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(parcel) = self.get_parcel(&hit.id)? else {
                return Err(Error::index_inconsistency(format!(
                    "indexed parcel '{}' has no stored record",
                    hit.id
                )));
            };
            results.push(ScoredParcel::new(parcel, hit.distance_meters));
        }
        Ok(results)
    }
}
