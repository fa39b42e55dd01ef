//! Integration tests for proximity queries and geometry validation.
//!
//! The fixture mirrors a small Los Angeles data set: parcel `A` in downtown,
//! parcel `B` about 9.3 km away in Mid-Wilshire, and parcel `C` with no
//! known location.

use parceldb::{Database, Error, GeoPoint, GeometryValidation, ParcelDraft, ParcelId};

const DOWNTOWN: (f64, f64) = (34.0522, -118.2437);
const MID_WILSHIRE: (f64, f64) = (34.0998, -118.3268);

fn id(s: &str) -> ParcelId {
    ParcelId::new(s).expect("valid id")
}

fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).expect("valid point")
}

fn draft_at(s: &str, lat: f64, lon: f64) -> ParcelDraft {
    ParcelDraft::new(id(s)).with_coordinates(lat, lon)
}

/// Database with parcels A (downtown), B (Mid-Wilshire), and C (no coords).
fn la_fixture() -> Database {
    let db = Database::in_memory().expect("failed to create db");
    db.upsert(draft_at("A", DOWNTOWN.0, DOWNTOWN.1).with_attribute("zoning", "M1"))
        .expect("failed to upsert A");
    db.upsert(draft_at("B", MID_WILSHIRE.0, MID_WILSHIRE.1).with_attribute("zoning", "R3"))
        .expect("failed to upsert B");
    db.upsert(ParcelDraft::new(id("C")).with_attribute("zoning", "R1"))
        .expect("failed to upsert C");
    db
}

fn hit_ids(hits: &[parceldb::ScoredParcel]) -> Vec<&str> {
    hits.iter().map(|h| h.id().as_str()).collect()
}

// ============================================================================
// Radius Search Tests
// ============================================================================

#[test]
fn test_la_radius_search_end_to_end() {
    let db = la_fixture();
    let center = point(DOWNTOWN.0, DOWNTOWN.1);

    let hits = db.radius_search(&center, 10_000.0).expect("failed to search");
    assert_eq!(hit_ids(&hits), vec!["A", "B"]);

    // A sits exactly at the center; B is roughly 9.3 km out
    assert_eq!(hits[0].distance_meters, 0.0);
    assert!((hits[1].distance_meters - 9306.0).abs() < 50.0);

    // Results carry the full records
    assert_eq!(hits[0].parcel().attribute("zoning").and_then(|v| v.as_str()), Some("M1"));
}

#[test]
fn test_radius_search_returns_sorted_distances() {
    let db = Database::in_memory().expect("failed to create db");
    let center = point(10.0, 20.0);

    // Insert parcels at increasing offsets, out of order
    for (s, dlon) in [("far", 0.5), ("near", 0.1), ("mid", 0.3)] {
        db.upsert(draft_at(s, 10.0, 20.0 + dlon)).expect("failed to upsert");
    }

    let hits = db.radius_search(&center, 100_000.0).expect("failed to search");
    assert_eq!(hit_ids(&hits), vec!["near", "mid", "far"]);
    assert!(hits[0].distance_meters < hits[1].distance_meters);
    assert!(hits[1].distance_meters < hits[2].distance_meters);
}

#[test]
fn test_radius_boundary_is_inclusive() {
    let db = la_fixture();
    let center = point(DOWNTOWN.0, DOWNTOWN.1);
    let exact = db.distance_between(&id("A"), &id("B")).expect("failed to measure");

    let at_boundary = db.radius_search(&center, exact).expect("failed to search");
    assert_eq!(hit_ids(&at_boundary), vec!["A", "B"]);

    let inside_boundary = db.radius_search(&center, exact - 1.0).expect("failed to search");
    assert_eq!(hit_ids(&inside_boundary), vec!["A"]);
}

#[test]
fn test_radius_search_zero_radius_matches_exact_location() {
    let db = la_fixture();
    let center = point(DOWNTOWN.0, DOWNTOWN.1);

    let hits = db.radius_search(&center, 0.0).expect("failed to search");
    assert_eq!(hit_ids(&hits), vec!["A"]);
}

#[test]
fn test_radius_search_negative_radius_matches_nothing() {
    let db = la_fixture();
    let center = point(DOWNTOWN.0, DOWNTOWN.1);

    let hits = db.radius_search(&center, -100.0).expect("failed to search");
    assert!(hits.is_empty());
}

#[test]
fn test_parcel_without_coordinates_never_in_spatial_results() {
    let db = la_fixture();
    let center = point(DOWNTOWN.0, DOWNTOWN.1);

    let radius_hits = db.radius_search(&center, 5_000_000.0).expect("failed to search");
    assert!(!hit_ids(&radius_hits).contains(&"C"));

    let nearest_hits = db.nearest_neighbors(&center, 100).expect("failed to search");
    assert!(!hit_ids(&nearest_hits).contains(&"C"));
    assert_eq!(nearest_hits.len(), 2);
}

// ============================================================================
// Nearest Neighbor Tests
// ============================================================================

#[test]
fn test_nearest_neighbors_orders_and_truncates() {
    let db = la_fixture();
    let center = point(DOWNTOWN.0, DOWNTOWN.1);

    let one = db.nearest_neighbors(&center, 1).expect("failed to search");
    assert_eq!(hit_ids(&one), vec!["A"]);

    let all = db.nearest_neighbors(&center, 10).expect("failed to search");
    assert_eq!(hit_ids(&all), vec!["A", "B"]);

    let none = db.nearest_neighbors(&center, 0).expect("failed to search");
    assert!(none.is_empty());
}

#[test]
fn test_nearest_breaks_distance_ties_by_id() {
    let db = Database::in_memory().expect("failed to create db");
    let center = point(10.0, 20.0);

    // Same latitude, symmetric longitude offsets: identical distances
    db.upsert(draft_at("zulu-tie", 10.0, 19.5)).expect("failed to upsert");
    db.upsert(draft_at("alpha-tie", 10.0, 20.5)).expect("failed to upsert");

    let hits = db.nearest_neighbors(&center, 2).expect("failed to search");
    assert_eq!(hit_ids(&hits), vec!["alpha-tie", "zulu-tie"]);
    assert_eq!(hits[0].distance_meters, hits[1].distance_meters);
}

// ============================================================================
// Distance Tests
// ============================================================================

#[test]
fn test_distance_between_la_parcels() {
    let db = la_fixture();

    let distance = db.distance_between(&id("A"), &id("B")).expect("failed to measure");
    assert!((distance - 9306.0).abs() < 50.0);

    // Symmetric, and zero against itself
    let reverse = db.distance_between(&id("B"), &id("A")).expect("failed to measure");
    assert_eq!(distance, reverse);
    assert_eq!(db.distance_between(&id("A"), &id("A")).expect("failed to measure"), 0.0);
}

#[test]
fn test_distance_to_parcel_without_geometry() {
    let db = la_fixture();

    let err = db.distance_between(&id("A"), &id("C")).expect_err("expected error");
    assert!(matches!(err, Error::MissingGeometry(_)));
    assert!(err.is_recoverable());
}

#[test]
fn test_distance_to_unknown_parcel() {
    let db = la_fixture();

    let err = db.distance_between(&id("A"), &id("nope")).expect_err("expected error");
    assert!(matches!(err, Error::ParcelNotFound(_)));
}

// ============================================================================
// Geometry Validation Tests
// ============================================================================

#[test]
fn test_validate_located_parcel() {
    let db = la_fixture();

    let validation = db.validate_geometry(&id("A")).expect("failed to validate");
    assert_eq!(validation, GeometryValidation::Consistent);
    assert!(validation.is_valid());
    assert_eq!(validation.reason(), None);
}

#[test]
fn test_validate_parcel_without_coordinates() {
    let db = la_fixture();

    let validation = db.validate_geometry(&id("C")).expect("failed to validate");
    assert_eq!(validation, GeometryValidation::NoGeometry);
    assert!(validation.is_valid());
    assert_eq!(validation.reason(), Some("no geometry"));
}

#[test]
fn test_validate_unknown_parcel() {
    let db = la_fixture();

    let err = db.validate_geometry(&id("nope")).expect_err("expected error");
    assert!(matches!(err, Error::ParcelNotFound(_)));
}

// ============================================================================
// Index Follows Record Mutations
// ============================================================================

#[test]
fn test_moving_a_parcel_moves_its_index_entry() {
    let db = la_fixture();
    let la_center = point(DOWNTOWN.0, DOWNTOWN.1);
    let nyc = (40.7128, -74.0060);

    db.upsert(draft_at("B", nyc.0, nyc.1)).expect("failed to move B");

    let la_hits = db.radius_search(&la_center, 20_000.0).expect("failed to search");
    assert_eq!(hit_ids(&la_hits), vec!["A"]);

    let nyc_hits =
        db.radius_search(&point(nyc.0, nyc.1), 1_000.0).expect("failed to search");
    assert_eq!(hit_ids(&nyc_hits), vec!["B"]);
}

#[test]
fn test_removing_coordinates_removes_the_index_entry() {
    let db = la_fixture();
    let center = point(DOWNTOWN.0, DOWNTOWN.1);

    // Re-upsert A without coordinates
    db.upsert(ParcelDraft::new(id("A"))).expect("failed to upsert");

    let hits = db.radius_search(&center, 10_000.0).expect("failed to search");
    assert_eq!(hit_ids(&hits), vec!["B"]);

    let validation = db.validate_geometry(&id("A")).expect("failed to validate");
    assert_eq!(validation, GeometryValidation::NoGeometry);
}

#[test]
fn test_deleting_a_parcel_removes_the_index_entry() {
    let db = la_fixture();
    let center = point(DOWNTOWN.0, DOWNTOWN.1);

    db.delete(&id("B")).expect("failed to delete");

    let hits = db.radius_search(&center, 10_000.0).expect("failed to search");
    assert_eq!(hit_ids(&hits), vec!["A"]);
}

#[test]
fn test_failed_upsert_leaves_the_index_unchanged() {
    let db = la_fixture();
    let center = point(DOWNTOWN.0, DOWNTOWN.1);

    let err = db.upsert(draft_at("A", -95.0, 0.0)).expect_err("expected error");
    assert!(matches!(err, Error::InvalidCoordinate(_)));

    // A is still indexed at its original location
    let hits = db.radius_search(&center, 100.0).expect("failed to search");
    assert_eq!(hit_ids(&hits), vec!["A"]);
}

// ============================================================================
// Spatial Summary Tests
// ============================================================================

#[test]
fn test_spatial_summary_over_la_parcels() {
    let db = la_fixture();

    let summary = db.spatial_summary().expect("failed to summarize").expect("expected summary");
    assert_eq!(summary.count, 2);

    assert_eq!(summary.bounds.min_latitude, DOWNTOWN.0);
    assert_eq!(summary.bounds.max_latitude, MID_WILSHIRE.0);
    assert_eq!(summary.bounds.min_longitude, MID_WILSHIRE.1);
    assert_eq!(summary.bounds.max_longitude, DOWNTOWN.1);

    let expected_lat = (DOWNTOWN.0 + MID_WILSHIRE.0) / 2.0;
    let expected_lon = (DOWNTOWN.1 + MID_WILSHIRE.1) / 2.0;
    assert!((summary.centroid_latitude - expected_lat).abs() < 1e-9);
    assert!((summary.centroid_longitude - expected_lon).abs() < 1e-9);
}

#[test]
fn test_spatial_summary_absent_without_geometry() {
    let db = Database::in_memory().expect("failed to create db");
    assert!(db.spatial_summary().expect("failed to summarize").is_none());

    // A parcel without coordinates doesn't create a summary either
    db.upsert(ParcelDraft::new(id("C"))).expect("failed to upsert");
    assert!(db.spatial_summary().expect("failed to summarize").is_none());
}
