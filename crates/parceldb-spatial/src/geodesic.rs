//! Geodesic distance and search-region math.
//!
//! Distances use the haversine formula over a spherical Earth model with a
//! mean radius of 6,371 km. The same formula ranks candidates and reports
//! distances, so ordering and reported values never disagree.

use parceldb_core::GeoPoint;

/// Mean Earth radius in meters for the spherical distance model.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Calculate the great-circle distance between two points in meters.
///
/// Uses the haversine formula, which is numerically stable for the short
/// and medium distances typical of parcel queries. The formula is symmetric:
/// `haversine_meters(a, b) == haversine_meters(b, a)`.
#[inline]
#[must_use]
pub fn haversine_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.latitude().to_radians();
    let lat_b = b.latitude().to_radians();
    let half_dlat = (b.latitude() - a.latitude()).to_radians() / 2.0;
    let half_dlon = (b.longitude() - a.longitude()).to_radians() / 2.0;

    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlon.sin().powi(2);

    // Clamp before asin so rounding at antipodal points can't produce NaN
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// A latitude/longitude window guaranteed to contain every point within a
/// given distance of a center point.
///
/// When the window crosses the antimeridian, `min_longitude` is greater than
/// `max_longitude` and the covered longitudes are `[min_longitude, 180]`
/// joined with `[-180, max_longitude]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusBounds {
    /// Southern edge of the window.
    pub min_latitude: f64,
    /// Northern edge of the window.
    pub max_latitude: f64,
    /// Western edge of the window.
    pub min_longitude: f64,
    /// Eastern edge of the window.
    pub max_longitude: f64,
}

impl RadiusBounds {
    /// Whether the window crosses the antimeridian.
    #[must_use]
    pub fn wraps_antimeridian(&self) -> bool {
        self.min_longitude > self.max_longitude
    }
}

/// Compute the bounding window for a radius search.
///
/// The returned window contains every point on the sphere within
/// `radius_meters` of `center`. A circle that reaches either pole spans all
/// longitudes, so the window widens to the full ring in that case.
///
/// Negative radii are treated as zero.
#[must_use]
pub fn radius_bounds(center: &GeoPoint, radius_meters: f64) -> RadiusBounds {
    let angular_degrees = (radius_meters.max(0.0) / EARTH_RADIUS_METERS).to_degrees();

    let min_latitude = center.latitude() - angular_degrees;
    let max_latitude = center.latitude() + angular_degrees;

    // A circle that reaches a pole covers every longitude.
    if min_latitude <= -90.0 || max_latitude >= 90.0 {
        return RadiusBounds {
            min_latitude: min_latitude.max(-90.0),
            max_latitude: max_latitude.min(90.0),
            min_longitude: -180.0,
            max_longitude: 180.0,
        };
    }

    // Widest longitude offset anywhere on the circle: asin(sin d / cos lat).
    // The pole check above guarantees the ratio stays below 1 up to rounding.
    let angular = angular_degrees.to_radians();
    let sin_ratio = (angular.sin() / center.latitude().to_radians().cos()).min(1.0);
    let delta_longitude = sin_ratio.asin().to_degrees();

    let mut min_longitude = center.longitude() - delta_longitude;
    let mut max_longitude = center.longitude() + delta_longitude;

    // Wrap across the antimeridian; min > max encodes the wrapped window.
    if min_longitude < -180.0 {
        min_longitude += 360.0;
    }
    if max_longitude > 180.0 {
        max_longitude -= 360.0;
    }

    RadiusBounds { min_latitude, max_latitude, min_longitude, max_longitude }
}
