//! Criterion micro-benchmarks for pushing into and indexing a `HetVec`.

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use hetvec::HetVec;

const NUM_ITER: usize = 5000;

#[derive(Clone)]
struct BigType {
    bytes: [u8; 5000],
}

type Set = (i32, i64, BigType);

fn filled() -> HetVec<Set> {
    let arg = BigType { bytes: [0; 5000] };
    let mut values = HetVec::new();
    for _ in 0..NUM_ITER {
        values.push_cloned(&arg);
    }
    values
}

/// Benchmark: push 5000 clones of a 5000-byte value into a fresh vector.
fn bench_push_big(c: &mut Criterion) {
    let arg = BigType { bytes: [0; 5000] };
    c.bench_function("push_big_5k", |b| {
        b.iter(|| {
            let mut values: HetVec<Set> = HetVec::new();
            for _ in 0..NUM_ITER {
                values.push_cloned(&arg);
            }
            black_box(values);
        });
    });
}

/// Benchmark: push 5000 alternating `i32` and 5000-byte values.
fn bench_push_mixed(c: &mut Criterion) {
    let arg = BigType { bytes: [0; 5000] };
    c.bench_function("push_mixed_5k", |b| {
        b.iter(|| {
            let mut values: HetVec<Set> = HetVec::new();
            for i in 0..NUM_ITER {
                if i % 2 == 0 {
                    values.push(i as i32);
                } else {
                    values.push_cloned(&arg);
                }
            }
            black_box(values);
        });
    });
}

/// Benchmark: push into a vector pre-sized by `with_capacity`.
fn bench_push_presized(c: &mut Criterion) {
    let arg = BigType { bytes: [0; 5000] };
    c.bench_function("push_presized_5k", |b| {
        b.iter_batched(
            || HetVec::<Set>::with_capacity(NUM_ITER, NUM_ITER * 5000),
            |mut values| {
                for _ in 0..NUM_ITER {
                    values.push_cloned(&arg);
                }
                values
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: checked typed access to each of 5000 elements.
fn bench_index(c: &mut Criterion) {
    let values = filled();
    c.bench_function("index_big_5k", |b| {
        b.iter(|| {
            for i in 0..NUM_ITER {
                let big = values.get::<BigType, _>(i).map(|big| big.bytes[0]);
                black_box(big.ok());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_push_big,
    bench_push_mixed,
    bench_push_presized,
    bench_index
);
criterion_main!(benches);
