//! Benchmarks for [`SkipMap`].

use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::prelude::*;
use skipmap::SkipMap;

/// Benchmarking sizes
const SIZES: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

/// Benchmarking insertion
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipMap Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut sm: SkipMap<usize, usize> =
                std::iter::repeat_with(|| rng.random()).take(size).collect();

            b.iter(|| {
                sm.insert(rng.random(), rng.random());
            });
        });
    }
}

/// Benchmarking lookups of present keys
pub fn rand_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipMap Random Access");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let sm: SkipMap<usize, usize> = (0..size).map(|k| (k, rng.random())).collect();
            let keys: Vec<usize> = std::iter::repeat_with(|| rng.random_range(0..size))
                .take(10)
                .collect();

            b.iter(|| {
                for k in &keys {
                    black_box(sm.get(k));
                }
            });
        });
    }
}

/// Benchmarking neighbour queries for absent keys
pub fn floor(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipMap Floor");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let sm: SkipMap<usize, usize> = (0..size).map(|k| (2 * k, k)).collect();
            let keys: Vec<usize> = std::iter::repeat_with(|| 2 * rng.random_range(0..size) + 1)
                .take(10)
                .collect();

            b.iter(|| {
                for k in &keys {
                    black_box(sm.floor(k));
                }
            });
        });
    }
}

/// Benchmarking a range traversal over a tenth of the keys
pub fn range(c: &mut Criterion) {
    c.bench_function("SkipMap Range", |b| {
        let sm: SkipMap<usize, usize> = (0..100_000).map(|k| (k, k)).collect();

        b.iter(|| {
            sm.for_each_range(&45_000, &55_000, |k, v| {
                black_box((k, v));
                true
            });
        });
    });
}

/// Benchmarking iteration
pub fn iter(c: &mut Criterion) {
    c.bench_function("SkipMap Iter", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let sm: SkipMap<usize, usize> = std::iter::repeat_with(|| (rng.random(), rng.random()))
            .take(100_000)
            .collect();

        b.iter(|| {
            for el in &sm {
                black_box(el);
            }
        });
    });
}
