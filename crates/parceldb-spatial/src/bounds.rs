//! Bounding boxes and index summaries.

use parceldb_core::GeoPoint;

/// An axis-aligned bounding box over stored coordinates.
///
/// Grown one point at a time with [`BoundingBox::expand`]; the edges are the
/// running minima and maxima of the folded points. Longitudes are plain
/// coordinate values, so a dataset spanning the antimeridian produces a box
/// spanning most of the globe rather than a wrapped window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge.
    pub min_longitude: f64,
    /// Southern edge.
    pub min_latitude: f64,
    /// Eastern edge.
    pub max_longitude: f64,
    /// Northern edge.
    pub max_latitude: f64,
}

impl BoundingBox {
    /// A degenerate box containing exactly one point.
    #[must_use]
    pub const fn from_point(point: &GeoPoint) -> Self {
        Self {
            min_longitude: point.longitude(),
            min_latitude: point.latitude(),
            max_longitude: point.longitude(),
            max_latitude: point.latitude(),
        }
    }

    /// Grow the box to contain the given point.
    pub fn expand(&mut self, point: &GeoPoint) {
        self.min_longitude = self.min_longitude.min(point.longitude());
        self.min_latitude = self.min_latitude.min(point.latitude());
        self.max_longitude = self.max_longitude.max(point.longitude());
        self.max_latitude = self.max_latitude.max(point.latitude());
    }

    /// Whether the box contains the given point (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_longitude..=self.max_longitude).contains(&point.longitude())
            && (self.min_latitude..=self.max_latitude).contains(&point.latitude())
    }
}

/// Aggregate view of every geometry in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoSummary {
    /// Bounding box over all indexed points.
    pub bounds: BoundingBox,
    /// Arithmetic mean of the indexed longitudes.
    pub centroid_longitude: f64,
    /// Arithmetic mean of the indexed latitudes.
    pub centroid_latitude: f64,
    /// Number of indexed entries.
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).expect("failed to build point")
    }

    #[test]
    fn single_point_box_is_degenerate() {
        let p = point(34.0, -118.0);
        let bounds = BoundingBox::from_point(&p);

        assert_eq!(bounds.min_latitude, bounds.max_latitude);
        assert_eq!(bounds.min_longitude, bounds.max_longitude);
        assert!(bounds.contains(&p));
    }

    #[test]
    fn expand_grows_every_edge() {
        let mut bounds = BoundingBox::from_point(&point(10.0, 20.0));
        bounds.expand(&point(-5.0, 25.0));
        bounds.expand(&point(12.0, 15.0));

        assert_eq!(bounds.min_latitude, -5.0);
        assert_eq!(bounds.max_latitude, 12.0);
        assert_eq!(bounds.min_longitude, 15.0);
        assert_eq!(bounds.max_longitude, 25.0);

        assert!(bounds.contains(&point(0.0, 20.0)));
        assert!(!bounds.contains(&point(13.0, 20.0)));
    }
}
