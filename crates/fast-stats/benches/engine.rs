//! Performance benchmarks for the fast-stats engine.
//!
//! Run with: `cargo bench -p fast-stats`
//!
//! These benchmarks compare the vectorized and scalar backends across batch
//! sizes and sequence lengths, including batch sizes with a remainder group.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fast_stats::kernels::lanes::{describe_group, PortableLanes};
use fast_stats::kernels::{describe_group_native, scalar::describe};
use fast_stats::prelude::*;

/// Generate a deterministic batch of `sequences` rows of `length` values.
fn generate_batch(sequences: usize, length: usize) -> Vec<Vec<f32>> {
    (0..sequences)
        .map(|s| {
            (0..length)
                .map(|i| {
                    let t = (s * length + i) as f32;
                    (t * 0.1).sin() * 2.0 + (t * 0.03).cos() * 1.5 + s as f32
                })
                .collect()
        })
        .collect()
}

// (sequences, length) pairs; 1_027 leaves a remainder of three
const SHAPES: &[(usize, usize)] = &[(4, 1_000), (64, 256), (1_024, 64), (1_027, 64), (16, 100_000)];

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");
    for &(sequences, length) in SHAPES {
        let data = generate_batch(sequences, length);
        let batch = Batch::new(&data).unwrap();
        let id = format!("{sequences}x{length}");
        group.throughput(Throughput::Elements((sequences * length) as u64));

        let vectorized = Engine::new();
        group.bench_with_input(BenchmarkId::new("vectorized", &id), &batch, |b, batch| {
            b.iter(|| vectorized.compute(black_box(batch)))
        });

        let scalar = Engine::new().backend(Backend::Scalar);
        group.bench_with_input(BenchmarkId::new("scalar", &id), &batch, |b, batch| {
            b.iter(|| scalar.compute(black_box(batch)))
        });
    }
    group.finish();
}

fn bench_row_major(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_row_major");
    for &(sequences, length) in SHAPES {
        let flat = generate_batch(sequences, length).concat();
        group.throughput(Throughput::Elements(flat.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{sequences}x{length}")),
            &flat,
            |b, flat| b.iter(|| compute_row_major(black_box(flat), sequences, length)),
        );
    }
    group.finish();
}

fn bench_lane_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("lane_group");
    for &length in &[64_usize, 1_024, 16_384] {
        let data = generate_batch(4, length);
        let rows = [&data[0][..], &data[1][..], &data[2][..], &data[3][..]];
        let len = length as f32;
        group.throughput(Throughput::Elements((4 * length) as u64));

        group.bench_with_input(BenchmarkId::new("native", length), &rows, |b, rows| {
            b.iter(|| describe_group_native(black_box(rows), len))
        });
        group.bench_with_input(BenchmarkId::new("portable", length), &rows, |b, rows| {
            b.iter(|| describe_group::<PortableLanes>(black_box(rows), len))
        });
        group.bench_with_input(BenchmarkId::new("scalar", length), &rows, |b, rows| {
            b.iter(|| rows.map(|row| describe(black_box(row))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_backends, bench_row_major, bench_lane_group);
criterion_main!(benches);
