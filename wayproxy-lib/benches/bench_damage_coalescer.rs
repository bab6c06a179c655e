//! Benchmarks for the damage-interval coalescer: the hot path a busy
//! compositor session drives once per committed frame.
//!
//! ## Run
//! ```bash
//! cargo bench --bench bench_damage_coalescer
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wayproxy_lib::{DamageSet, ExtInterval};

const MARGIN: i32 = 1024;

fn bench_scattered_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("scattered_inserts");
    for &n in &[16usize, 256, 4096] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut set = DamageSet::new();
                for i in 0..n {
                    set.insert(&[ExtInterval::solid((i * 4096) as i32, 32)], MARGIN);
                }
                set
            });
        });
    }
    group.finish();
}

fn bench_dense_row_damage(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_row_damage");
    for &rows in &[32i32, 256, 1080] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut set = DamageSet::new();
                let stride = 4096;
                set.insert(&[ExtInterval { start: 0, width: 3200, stride, rep: rows }], MARGIN);
                set
            });
        });
    }
    group.finish();
}

fn bench_repeated_full_frame_damage(c: &mut Criterion) {
    c.bench_function("repeated_full_frame_damage", |b| {
        b.iter(|| {
            let mut set = DamageSet::new();
            for _ in 0..64 {
                set.insert(&[ExtInterval::solid(0, 1920 * 1080 * 4)], MARGIN);
            }
            set
        });
    });
}

criterion_group!(benches, bench_scattered_inserts, bench_dense_row_damage, bench_repeated_full_frame_damage);
criterion_main!(benches);
