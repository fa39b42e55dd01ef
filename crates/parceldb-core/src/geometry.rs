//! Point geometry and coordinate validation.
//!
//! This module provides [`GeoPoint`], the WGS84 point geometry attached to
//! parcels, together with the derivation and validation functions the store
//! runs on every write.
//!
//! Coordinates are geographic degrees: latitude in `[-90, 90]`, longitude in
//! `[-180, 180]`. The reference frame is fixed at WGS84 (SRID 4326); no
//! reprojection is performed anywhere in the workspace.
//!
//! # Example
//!
//! ```
//! use parceldb_core::geometry::{derive_point, GeoPoint};
//!
//! // Derivation from a full coordinate pair yields a point
//! let point = derive_point(Some(34.0522), Some(-118.2437)).unwrap();
//! assert_eq!(point.latitude(), 34.0522);
//! assert_eq!(point.longitude(), -118.2437);
//!
//! // A missing or out-of-range coordinate yields no geometry
//! assert!(derive_point(None, Some(-118.2437)).is_none());
//! assert!(derive_point(Some(91.0), Some(0.0)).is_none());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spatial Reference System Identifier for WGS84 geographic coordinates.
pub const SRID_WGS84: u32 = 4326;

/// Minimum valid latitude in degrees.
pub const MIN_LATITUDE: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LONGITUDE: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Errors raised when a supplied coordinate is present but not usable.
///
/// Absent coordinates are never an error; they simply yield no geometry.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude outside `[-90, 90]` degrees, or not a finite number.
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside `[-180, 180]` degrees, or not a finite number.
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A point geometry in WGS84 (SRID 4326).
///
/// Coordinates are stored in `(longitude, latitude)` order, matching the
/// conventional axis order of geometry encodings. Construction validates
/// ranges, so a `GeoPoint` value is always a real location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
    srid: u32,
}

impl GeoPoint {
    /// Create a point from a latitude/longitude pair in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if either coordinate is non-finite or
    /// outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        check_latitude(latitude)?;
        check_longitude(longitude)?;
        Ok(Self { longitude, latitude, srid: SRID_WGS84 })
    }

    /// Longitude in degrees.
    #[inline]
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees.
    #[inline]
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// The Spatial Reference System Identifier (always [`SRID_WGS84`]).
    #[inline]
    #[must_use]
    pub const fn srid(&self) -> u32 {
        self.srid
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT({} {})", self.longitude, self.latitude)
    }
}

/// Derive a point geometry from optional coordinates.
///
/// Returns `None` when either coordinate is absent or out of range. An
/// absent result is a legitimate state (a parcel without a known location),
/// not an error; callers that need to reject malformed input use
/// [`check_coordinates`] first.
///
/// Derivation is pure and idempotent: the same inputs always produce the
/// same point, and a derived point's coordinates round-trip exactly.
#[must_use]
pub fn derive_point(latitude: Option<f64>, longitude: Option<f64>) -> Option<GeoPoint> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).ok(),
        _ => None,
    }
}

/// Validate optional coordinates without deriving a geometry.
///
/// Absent values pass; a value that is present but non-finite or out of
/// range fails. Store mutation paths call this before writing so malformed
/// coordinates reject the whole write instead of silently dropping the
/// geometry.
///
/// # Errors
///
/// Returns [`CoordinateError`] naming the offending coordinate.
pub fn check_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), CoordinateError> {
    if let Some(lat) = latitude {
        check_latitude(lat)?;
    }
    if let Some(lon) = longitude {
        check_longitude(lon)?;
    }
    Ok(())
}

fn check_latitude(latitude: f64) -> Result<(), CoordinateError> {
    if !latitude.is_finite() || !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        return Err(CoordinateError::LatitudeOutOfRange(latitude));
    }
    Ok(())
}

fn check_longitude(longitude: f64) -> Result<(), CoordinateError> {
    if !longitude.is_finite() || !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        return Err(CoordinateError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_round_trips_exactly() {
        let point = derive_point(Some(34.0522), Some(-118.2437)).expect("expected geometry");
        assert_eq!(point.latitude(), 34.0522);
        assert_eq!(point.longitude(), -118.2437);
        assert_eq!(point.srid(), SRID_WGS84);

        // Re-deriving from the point's own coordinates yields an identical point
        let again = derive_point(Some(point.latitude()), Some(point.longitude()))
            .expect("expected geometry");
        assert_eq!(again, point);
    }

    #[test]
    fn derive_absent_input_is_absent() {
        assert!(derive_point(None, None).is_none());
        assert!(derive_point(Some(10.0), None).is_none());
        assert!(derive_point(None, Some(10.0)).is_none());
    }

    #[test]
    fn derive_out_of_range_is_absent() {
        assert!(derive_point(Some(91.0), Some(0.0)).is_none());
        assert!(derive_point(Some(-91.0), Some(0.0)).is_none());
        assert!(derive_point(Some(0.0), Some(181.0)).is_none());
        assert!(derive_point(Some(0.0), Some(-181.0)).is_none());
    }

    #[test]
    fn derive_accepts_boundary_values() {
        assert!(derive_point(Some(90.0), Some(180.0)).is_some());
        assert!(derive_point(Some(-90.0), Some(-180.0)).is_some());
        assert!(derive_point(Some(0.0), Some(0.0)).is_some());
    }

    #[test]
    fn check_reports_the_offending_coordinate() {
        assert_eq!(
            check_coordinates(Some(91.0), Some(0.0)),
            Err(CoordinateError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            check_coordinates(Some(0.0), Some(-181.0)),
            Err(CoordinateError::LongitudeOutOfRange(-181.0))
        );
        assert_eq!(check_coordinates(None, Some(0.0)), Ok(()));
        assert_eq!(check_coordinates(None, None), Ok(()));
    }

    #[test]
    fn check_rejects_non_finite_values() {
        assert!(check_coordinates(Some(f64::NAN), Some(0.0)).is_err());
        assert!(check_coordinates(Some(0.0), Some(f64::INFINITY)).is_err());
        assert!(check_coordinates(Some(f64::NEG_INFINITY), Some(0.0)).is_err());
    }

    #[test]
    fn display_uses_lon_lat_order() {
        let point = GeoPoint::new(34.0522, -118.2437).expect("valid point");
        assert_eq!(point.to_string(), "POINT(-118.2437 34.0522)");
    }
}
