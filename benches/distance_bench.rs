//! Benchmarks for the pairwise distance metrics.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mtsim::distance::{Dtw, Euclidean, MatrixProfile, Metric};

fn generate_sine(n: usize, period: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin())
        .collect()
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    for size in [64, 128, 256, 512].iter() {
        let a = generate_sine(*size, 12);
        let b = generate_sine(*size, 17);

        group.bench_with_input(BenchmarkId::new("Euclidean", size), size, |bench, _| {
            bench.iter(|| Euclidean.distance(black_box(&a), black_box(&b)))
        });

        group.bench_with_input(BenchmarkId::new("DTW", size), size, |bench, _| {
            let metric = Dtw::new();
            bench.iter(|| metric.distance(black_box(&a), black_box(&b)))
        });

        group.bench_with_input(BenchmarkId::new("DTW_banded", size), size, |bench, _| {
            let metric = Dtw::windowed(10);
            bench.iter(|| metric.distance(black_box(&a), black_box(&b)))
        });

        group.bench_with_input(BenchmarkId::new("MPdist", size), size, |bench, _| {
            let metric = MatrixProfile::new(16);
            bench.iter(|| metric.distance(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_metrics);
criterion_main!(benches);
