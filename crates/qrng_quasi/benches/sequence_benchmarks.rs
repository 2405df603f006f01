//! Criterion benchmarks for the quasi-random engines.
//!
//! Measures point generation for Halton (plain and RR2-scrambled) and Sobol
//! across dimensionalities, plus direction table decoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qrng_core::traits::PointSequence;
use qrng_quasi::halton::HaltonSequence;
use qrng_quasi::sobol::{
    PackedDirectionNumbers, SobolSequence, TextDirectionNumbers, BUNDLED_MAX_DIMENSION,
    BUNDLED_TABLE_TEXT,
};

const POINTS: usize = 1024;

/// Benchmark Halton point generation.
fn bench_halton(c: &mut Criterion) {
    let mut group = c.benchmark_group("halton");
    group.throughput(Throughput::Elements(POINTS as u64));

    for dims in [2, 10, 40] {
        for scrambled in [false, true] {
            let name = if scrambled { "scrambled" } else { "plain" };
            group.bench_with_input(BenchmarkId::new(name, dims), &dims, |b, &dims| {
                let mut buf = vec![0.0; dims];
                b.iter(|| {
                    let mut halton = HaltonSequence::builder(dims)
                        .scrambled(scrambled)
                        .build()
                        .unwrap();
                    for _ in 0..POINTS {
                        halton.fill_point(black_box(&mut buf));
                    }
                });
            });
        }
    }

    group.finish();
}

/// Benchmark Sobol point generation with prebuilt direction numbers.
fn bench_sobol(c: &mut Criterion) {
    let mut group = c.benchmark_group("sobol");
    group.throughput(Throughput::Elements(POINTS as u64));
    let table = PackedDirectionNumbers::bundled(BUNDLED_MAX_DIMENSION).unwrap();

    for dims in [2, 10, 40] {
        group.bench_with_input(BenchmarkId::new("points", dims), &dims, |b, &dims| {
            let mut buf = vec![0.0; dims];
            b.iter(|| {
                let mut sobol = SobolSequence::new(&table, dims).unwrap();
                for _ in 0..POINTS {
                    sobol.fill_point(black_box(&mut buf));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark loading direction numbers from each table format.
fn bench_table_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("direction_tables");

    group.bench_function("packed", |b| {
        b.iter(|| PackedDirectionNumbers::bundled(black_box(40)).unwrap());
    });
    group.bench_function("text", |b| {
        b.iter(|| {
            TextDirectionNumbers::from_text(BUNDLED_TABLE_TEXT, black_box(40)).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_halton, bench_sobol, bench_table_loading);
criterion_main!(benches);
