//! The parcel record and its upsert payload.
//!
//! [`Parcel`] is the authoritative record stored per real-world parcel.
//! Its geometry field is derived from the record's own coordinates and is
//! never independently settable: the only way to obtain a `Parcel` is
//! [`Parcel::from_draft`], which validates the coordinates, derives the
//! geometry, and stamps the update time. [`ParcelDraft`] is the
//! caller-facing payload an upsert supplies.
//!
//! # Example
//!
//! ```
//! use parceldb_core::{Parcel, ParcelDraft, ParcelId};
//!
//! let draft = ParcelDraft::new(ParcelId::new("4218-016-018").unwrap())
//!     .with_coordinates(34.0522, -118.2437)
//!     .with_attribute("zoning", "R1")
//!     .with_attribute("assessed_value", 425_000i64);
//!
//! let parcel = Parcel::from_draft(draft).unwrap();
//! assert!(parcel.geometry().is_some());
//! assert_eq!(parcel.attribute("zoning").and_then(|v| v.as_str()), Some("R1"));
//! ```

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::geometry::{check_coordinates, derive_point, CoordinateError, GeoPoint};
use crate::types::id::ParcelId;
use crate::types::value::Value;

/// A stored parcel record.
///
/// Invariant: `geometry` is present if and only if both coordinates are
/// present and in range, and its `(longitude, latitude)` equal the record's
/// coordinates exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    id: ParcelId,
    latitude: Option<f64>,
    longitude: Option<f64>,
    geometry: Option<GeoPoint>,
    attributes: HashMap<String, Value>,
    updated_at: u64,
}

impl Parcel {
    /// Build a record from an upsert payload.
    ///
    /// Validates the draft's coordinates, derives the geometry, and stamps
    /// `updated_at` with the current Unix time. Absent coordinates are
    /// accepted and yield a record without geometry.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if a coordinate is present but non-finite
    /// or out of range. Nothing is partially constructed on error.
    pub fn from_draft(draft: ParcelDraft) -> Result<Self, CoordinateError> {
        check_coordinates(draft.latitude, draft.longitude)?;
        let geometry = derive_point(draft.latitude, draft.longitude);

        Ok(Self {
            id: draft.id,
            latitude: draft.latitude,
            longitude: draft.longitude,
            geometry,
            attributes: draft.attributes,
            updated_at: now_seconds(),
        })
    }

    /// The parcel identifier.
    #[must_use]
    pub const fn id(&self) -> &ParcelId {
        &self.id
    }

    /// Latitude in degrees, if known.
    #[must_use]
    pub const fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// Longitude in degrees, if known.
    #[must_use]
    pub const fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// The derived point geometry, if the parcel has a known location.
    #[must_use]
    pub const fn geometry(&self) -> Option<GeoPoint> {
        self.geometry
    }

    /// Whether the parcel has a derived geometry.
    #[must_use]
    pub const fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    /// Re-derive the geometry from the stored coordinates.
    ///
    /// Under the record invariant this equals [`Self::geometry`]; validity
    /// checks compare the two to detect divergence.
    #[must_use]
    pub fn derived_geometry(&self) -> Option<GeoPoint> {
        derive_point(self.latitude, self.longitude)
    }

    /// All attributes on the record.
    #[must_use]
    pub const fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    /// Look up a single attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Unix time (seconds) of the last successful mutation.
    #[must_use]
    pub const fn updated_at(&self) -> u64 {
        self.updated_at
    }
}

/// The payload supplied to an upsert.
///
/// A draft carries the caller-settable fields of a parcel: identifier,
/// optional coordinates, and attributes. Each upsert replaces the stored
/// record wholesale with the record built from the draft.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelDraft {
    id: ParcelId,
    latitude: Option<f64>,
    longitude: Option<f64>,
    attributes: HashMap<String, Value>,
}

impl ParcelDraft {
    /// Create a draft with no coordinates and no attributes.
    #[must_use]
    pub fn new(id: ParcelId) -> Self {
        Self { id, latitude: None, longitude: None, attributes: HashMap::new() }
    }

    /// Set both coordinates, in degrees.
    ///
    /// Values are validated when the draft is turned into a record, not
    /// here, so a failed upsert can report the offending value.
    #[must_use]
    pub const fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The draft's parcel identifier.
    #[must_use]
    pub const fn id(&self) -> &ParcelId {
        &self.id
    }

    /// The draft's latitude, if set.
    #[must_use]
    pub const fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// The draft's longitude, if set.
    #[must_use]
    pub const fn longitude(&self) -> Option<f64> {
        self.longitude
    }
}

/// Current Unix time in seconds, saturating to zero before the epoch.
fn now_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParcelId {
        ParcelId::new(s).expect("valid id")
    }

    #[test]
    fn builds_record_with_geometry() {
        let draft = ParcelDraft::new(id("A")).with_coordinates(34.0522, -118.2437);
        let parcel = Parcel::from_draft(draft).expect("valid draft");

        assert_eq!(parcel.latitude(), Some(34.0522));
        assert_eq!(parcel.longitude(), Some(-118.2437));
        let geom = parcel.geometry().expect("expected geometry");
        assert_eq!(geom.latitude(), 34.0522);
        assert_eq!(geom.longitude(), -118.2437);
        assert!(parcel.updated_at() > 0);
    }

    #[test]
    fn builds_record_without_coordinates() {
        let draft = ParcelDraft::new(id("B")).with_attribute("zoning", "C2");
        let parcel = Parcel::from_draft(draft).expect("valid draft");

        assert!(!parcel.has_geometry());
        assert_eq!(parcel.latitude(), None);
        assert_eq!(parcel.attribute("zoning").and_then(|v| v.as_str()), Some("C2"));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let draft = ParcelDraft::new(id("C")).with_coordinates(91.0, 0.0);
        assert!(matches!(
            Parcel::from_draft(draft),
            Err(CoordinateError::LatitudeOutOfRange(_))
        ));

        let draft = ParcelDraft::new(id("C")).with_coordinates(0.0, -181.0);
        assert!(matches!(
            Parcel::from_draft(draft),
            Err(CoordinateError::LongitudeOutOfRange(_))
        ));
    }

    #[test]
    fn geometry_matches_rederivation() {
        let draft = ParcelDraft::new(id("D")).with_coordinates(-33.8688, 151.2093);
        let parcel = Parcel::from_draft(draft).expect("valid draft");
        assert_eq!(parcel.geometry(), parcel.derived_geometry());
    }

    #[test]
    fn single_coordinate_yields_no_geometry() {
        let draft = ParcelDraft {
            id: id("E"),
            latitude: Some(10.0),
            longitude: None,
            attributes: HashMap::new(),
        };
        let parcel = Parcel::from_draft(draft).expect("valid draft");
        assert_eq!(parcel.latitude(), Some(10.0));
        assert!(!parcel.has_geometry());
    }
}
