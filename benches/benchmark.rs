use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use spectral_change::processing::indices::{compute_index, IndexKind};
use spectral_change::{BandSet, ChangeDetector};

/// Synthetic 256x256 acquisition, roughly the size a tile fetcher returns
fn synthetic_bands(shift: f64) -> BandSet {
    let size = (256, 256);
    let nir = Array2::from_shape_fn(size, |(y, x)| 0.3 + ((x * 7 + y * 3) % 100) as f64 / 250.0 - shift);
    let red = Array2::from_shape_fn(size, |(y, x)| 0.05 + ((x + y * 11) % 50) as f64 / 500.0);
    let swir = Array2::from_shape_fn(size, |(y, x)| 0.15 + ((x * 5 + y) % 80) as f64 / 400.0 + shift);
    BandSet::new(nir, red, swir).expect("synthetic bands share a shape")
}

/// Benchmark the core NDVI calculation logic in isolation
fn benchmark_index_calculation(c: &mut Criterion) {
    let bands = synthetic_bands(0.0);

    c.bench_function("ndvi_core_calculation", |b| {
        b.iter(|| compute_index(IndexKind::Ndvi, black_box(bands.nir()), black_box(bands.red())))
    });
}

/// Benchmark the full change detection pipeline
fn benchmark_change_detection(c: &mut Criterion) {
    let before = synthetic_bands(0.0);
    let after = synthetic_bands(0.05);
    let detector = ChangeDetector::default();

    c.bench_function("change_detection_256", |b| {
        b.iter(|| detector.detect_changes(black_box(&before), black_box(&after)))
    });
}

criterion_group!(benches, benchmark_index_calculation, benchmark_change_detection);
criterion_main!(benches);
