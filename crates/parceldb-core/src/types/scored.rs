//! Distance-scored result types for spatial queries.
//!
//! This module provides [`ScoredParcel`], a full record paired with its
//! geodesic distance to a query center, and [`ScoredId`], the lightweight
//! form the spatial index produces before records are hydrated.

use serde::{Deserialize, Serialize};

use super::{Parcel, ParcelId};

/// A parcel with its geodesic distance to a query center, in meters.
///
/// This is the return type of radius and nearest-neighbor searches.
/// Results order ascending by distance, with ties broken by identifier.
///
/// # Example
///
/// ```
/// use parceldb_core::{Parcel, ParcelDraft, ParcelId, ScoredParcel};
///
/// let parcel = Parcel::from_draft(
///     ParcelDraft::new(ParcelId::new("A").unwrap()).with_coordinates(34.0522, -118.2437),
/// )
/// .unwrap();
///
/// let scored = ScoredParcel::new(parcel, 125.0);
/// assert_eq!(scored.distance_meters, 125.0);
/// assert_eq!(scored.id().as_str(), "A");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredParcel {
    /// The parcel returned from the search.
    pub parcel: Parcel,
    /// Geodesic distance to the query center, in meters.
    pub distance_meters: f64,
}

impl ScoredParcel {
    /// Create a new scored parcel.
    #[inline]
    #[must_use]
    pub const fn new(parcel: Parcel, distance_meters: f64) -> Self {
        Self { parcel, distance_meters }
    }

    /// Get the parcel identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &ParcelId {
        self.parcel.id()
    }

    /// Get a reference to the underlying parcel.
    #[inline]
    #[must_use]
    pub const fn parcel(&self) -> &Parcel {
        &self.parcel
    }

    /// Consume self and return the underlying parcel.
    #[inline]
    #[must_use]
    pub fn into_parcel(self) -> Parcel {
        self.parcel
    }
}

/// A lightweight scored reference containing just the identifier and
/// distance.
///
/// This is what the spatial index returns before full records are fetched;
/// it avoids loading record attributes until they are needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredId {
    /// The parcel identifier.
    pub id: ParcelId,
    /// Geodesic distance to the query center, in meters.
    pub distance_meters: f64,
}

impl ScoredId {
    /// Create a new scored identifier.
    #[inline]
    #[must_use]
    pub const fn new(id: ParcelId, distance_meters: f64) -> Self {
        Self { id, distance_meters }
    }
}
