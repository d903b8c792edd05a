// Criterion benchmarks for Atlas Markers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use atlas_markers::core::{engine::FilterEngine, filter_markers, haversine_distance};
use atlas_markers::models::{Coordinate, FilterMode, FilterSettings, Marker};

fn create_marker(id: i64, latitude: f64, longitude: f64) -> Marker {
    Marker {
        id,
        coordinate: Coordinate::new(latitude, longitude),
        title: format!("Attraction {}", id),
        description: "benchmark fixture".to_string(),
        favorite: id % 3 == 0,
    }
}

fn create_markers(count: i64) -> Vec<Marker> {
    (0..count)
        .map(|i| {
            let lat_offset = (i as f64 * 0.001) % 0.5;
            let lon_offset = (i as f64 * 0.001) % 0.5;
            create_marker(i, 40.7128 + lat_offset, -74.0060 + lon_offset)
        })
        .collect()
}

fn radius_settings() -> FilterSettings {
    FilterSettings {
        favorites_only: false,
        radius_m: 10000,
        reference: Some(Coordinate::new(40.7128, -74.0060)),
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(Coordinate::new(40.7128, -74.0060)),
                black_box(Coordinate::new(40.72, -74.01)),
            )
        });
    });
}

fn bench_filter_markers(c: &mut Criterion) {
    let settings = radius_settings();

    let mut group = c.benchmark_group("filtering");

    for marker_count in [10, 50, 100, 500, 1000].iter() {
        let markers = create_markers(*marker_count);

        group.bench_with_input(
            BenchmarkId::new("filter_markers", marker_count),
            marker_count,
            |b, _| {
                b.iter(|| filter_markers(black_box(&markers), black_box(&settings)));
            },
        );
    }

    group.finish();
}

fn bench_engine_select(c: &mut Criterion) {
    let engine = FilterEngine::with_default_steps();
    let settings = radius_settings();
    let markers = create_markers(100);

    c.bench_function("engine_select_100_markers", |b| {
        b.iter(|| {
            engine.select(
                black_box(markers.clone()),
                black_box(&settings),
                FilterMode::Standard,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_filter_markers,
    bench_engine_select
);

criterion_main!(benches);
