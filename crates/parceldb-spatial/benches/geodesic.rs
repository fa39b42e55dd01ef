//! Benchmarks for geodesic distance and search-window math.
//!
//! Run with: `cargo bench -p parceldb-spatial`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use parceldb_core::GeoPoint;
use parceldb_spatial::grid::covering_cells;
use parceldb_spatial::{haversine_meters, radius_bounds, GridCell};
use rand::Rng;

/// Generate a random valid point.
fn random_point() -> GeoPoint {
    let mut rng = rand::thread_rng();
    let latitude = rng.gen_range(-90.0..=90.0);
    let longitude = rng.gen_range(-180.0..=180.0);
    GeoPoint::new(latitude, longitude).expect("failed to build point")
}

/// Benchmark a single haversine distance calculation.
fn bench_haversine(c: &mut Criterion) {
    let a = random_point();
    let b = random_point();

    c.bench_function("haversine_meters", |bench| {
        bench.iter(|| haversine_meters(black_box(&a), black_box(&b)));
    });
}

/// Benchmark ranking a candidate set by distance, the hot loop of a
/// radius search over one cell.
fn bench_rank_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_candidates");

    for count in [100, 1_000, 10_000] {
        let center = random_point();
        let candidates: Vec<GeoPoint> = (0..count).map(|_| random_point()).collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("{count}_candidates"), |bench| {
            bench.iter(|| {
                for candidate in &candidates {
                    black_box(haversine_meters(black_box(&center), candidate));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark computing the search window for common radii.
fn bench_radius_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("radius_bounds");

    let center = GeoPoint::new(34.0522, -118.2437).expect("failed to build point");

    for radius in [1_000.0, 10_000.0, 100_000.0] {
        group.bench_function(format!("{radius}m"), |bench| {
            bench.iter(|| radius_bounds(black_box(&center), black_box(radius)));
        });
    }

    group.finish();
}

/// Benchmark expanding a search window into grid cells.
fn bench_covering_cells(c: &mut Criterion) {
    let mut group = c.benchmark_group("covering_cells");

    let center = GeoPoint::new(34.0522, -118.2437).expect("failed to build point");

    for radius in [10_000.0, 100_000.0, 500_000.0] {
        let bounds = radius_bounds(&center, radius);
        group.bench_function(format!("{radius}m"), |bench| {
            bench.iter(|| covering_cells(black_box(&bounds)));
        });
    }

    group.finish();
}

/// Benchmark cell assignment for a point.
fn bench_cell_assignment(c: &mut Criterion) {
    let points: Vec<GeoPoint> = (0..1_000).map(|_| random_point()).collect();

    c.bench_function("grid_cell_of_1000_points", |bench| {
        bench.iter(|| {
            for point in &points {
                black_box(GridCell::of(black_box(point)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_haversine,
    bench_rank_candidates,
    bench_radius_bounds,
    bench_covering_cells,
    bench_cell_assignment,
);

criterion_main!(benches);
