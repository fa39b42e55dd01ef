//! Integration tests for spatial index consistency checking and repair.
//!
//! Corruption scenarios are staged by writing to the index table through the
//! raw storage engine, bypassing the transaction handle that normally keeps
//! records and index in lockstep.

use parceldb::transaction::TransactionManager;
use parceldb::{Database, Error, GeoPoint, ParcelDraft, ParcelId};
use parceldb_spatial::GeoIndex;
use parceldb_storage::backends::RedbEngine;
use parceldb_storage::{StorageEngine, Transaction};

fn id(s: &str) -> ParcelId {
    ParcelId::new(s).expect("valid id")
}

fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).expect("valid point")
}

fn draft_at(s: &str, lat: f64, lon: f64) -> ParcelDraft {
    ParcelDraft::new(id(s)).with_coordinates(lat, lon)
}

/// Manager seeded with one located parcel and one without coordinates.
fn seeded_manager() -> TransactionManager<RedbEngine> {
    let engine = RedbEngine::in_memory().expect("failed to create engine");
    let manager = TransactionManager::new(engine);

    let mut tx = manager.begin_write().expect("failed to begin write");
    tx.put_parcel(draft_at("located", 34.0522, -118.2437)).expect("failed to upsert");
    tx.put_parcel(ParcelDraft::new(id("unlocated"))).expect("failed to upsert");
    tx.commit().expect("failed to commit");

    manager
}

// ============================================================================
// Verification Tests
// ============================================================================

#[test]
fn test_verify_passes_on_consistent_data() {
    let manager = seeded_manager();

    let tx = manager.begin_read().expect("failed to begin read");
    tx.verify_spatial_index().expect("expected consistent index");
}

#[test]
fn test_verify_detects_an_entry_with_no_record() {
    let manager = seeded_manager();

    // Plant an index entry for a parcel that was never stored
    let engine = manager.engine_arc();
    let mut raw = engine.begin_write().expect("failed to begin raw write");
    GeoIndex::upsert(&mut raw, &id("ghost"), None, &point(10.0, 20.0))
        .expect("failed to plant entry");
    raw.commit().expect("failed to commit");

    let tx = manager.begin_read().expect("failed to begin read");
    let err = tx.verify_spatial_index().expect_err("expected inconsistency");
    assert!(matches!(err, Error::IndexInconsistency(_)));
    assert!(err.to_string().contains("no stored record"));
    assert!(!err.is_recoverable());
}

#[test]
fn test_verify_detects_a_divergent_location() {
    let manager = seeded_manager();

    // Move the index entry without touching the record
    let engine = manager.engine_arc();
    let mut raw = engine.begin_write().expect("failed to begin raw write");
    GeoIndex::upsert(
        &mut raw,
        &id("located"),
        Some(&point(34.0522, -118.2437)),
        &point(35.0, -117.0),
    )
    .expect("failed to move entry");
    raw.commit().expect("failed to commit");

    let tx = manager.begin_read().expect("failed to begin read");
    let err = tx.verify_spatial_index().expect_err("expected inconsistency");
    assert!(err.to_string().contains("does not match its record"));
}

#[test]
fn test_verify_detects_a_missing_entry() {
    let manager = seeded_manager();

    // Drop the index entry while the record keeps its geometry
    let engine = manager.engine_arc();
    let mut raw = engine.begin_write().expect("failed to begin raw write");
    let removed = GeoIndex::remove(&mut raw, &id("located"), &point(34.0522, -118.2437))
        .expect("failed to remove entry");
    assert!(removed);
    raw.commit().expect("failed to commit");

    let tx = manager.begin_read().expect("failed to begin read");
    let err = tx.verify_spatial_index().expect_err("expected inconsistency");
    assert!(err.to_string().contains("parcels have geometry"));
}

// ============================================================================
// Rebuild Tests
// ============================================================================

#[test]
fn test_rebuild_restores_consistency() {
    let manager = seeded_manager();

    // Corrupt both directions: a phantom entry and a missing one
    let engine = manager.engine_arc();
    let mut raw = engine.begin_write().expect("failed to begin raw write");
    GeoIndex::upsert(&mut raw, &id("ghost"), None, &point(10.0, 20.0))
        .expect("failed to plant entry");
    GeoIndex::remove(&mut raw, &id("located"), &point(34.0522, -118.2437))
        .expect("failed to remove entry");
    raw.commit().expect("failed to commit");

    {
        let tx = manager.begin_read().expect("failed to begin read");
        tx.verify_spatial_index().expect_err("expected inconsistency");
    }

    let mut tx = manager.begin_write().expect("failed to begin write");
    let entries = tx.rebuild_spatial_index().expect("failed to rebuild");
    tx.commit().expect("failed to commit");
    assert_eq!(entries, 1); // only "located" has geometry

    let tx = manager.begin_read().expect("failed to begin read");
    tx.verify_spatial_index().expect("expected consistent index after rebuild");

    let hits = tx
        .radius_search(&point(34.0522, -118.2437), 100.0)
        .expect("failed to search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id().as_str(), "located");
}

#[test]
fn test_database_verify_and_rebuild() {
    let db = Database::in_memory().expect("failed to create db");

    db.upsert(draft_at("A", 34.0522, -118.2437)).expect("failed to upsert");
    db.upsert(draft_at("B", 34.0998, -118.3268)).expect("failed to upsert");
    db.upsert(ParcelDraft::new(id("C"))).expect("failed to upsert");

    db.verify_spatial_index().expect("expected consistent index");

    let entries = db.rebuild_spatial_index().expect("failed to rebuild");
    assert_eq!(entries, 2);

    db.verify_spatial_index().expect("expected consistent index after rebuild");
}
