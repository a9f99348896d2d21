//! Ported from the teacher's nightly `#[bench]` harness
//! (`benchmark.rs`'s `simple_benchmark_NNNNN` sweep over power-of-two
//! sizes) to `criterion`, since `#[bench]`/`test::Bencher` require
//! unstable `#![feature(test)]` and this crate targets stable Rust
//! (spec.md §2.4/§6.5).
//!
//! To convert a result into a BenchFFT-style MFLOPS figure: `mflops = 5000
//! * N * log2(N) / (time for one transform in nanoseconds)`, halved again
//! for the real-plan benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dft_engine::{Direction, Order, PackFormat, Plan, RealPlan};

const SIZES: &[usize] = &[1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 4096];

fn complex_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("complex_forward");
    for &size in SIZES {
        let plan = Plan::<f32>::new(size, Order::Normal, false).unwrap();
        let mut scratch = vec![0f32; plan.temp_size()];
        let input = vec![0f32; size * 2];
        let mut out = vec![0f32; size * 2];
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                plan.execute(
                    Direction::Forward,
                    black_box(&mut out),
                    black_box(&input),
                    if plan.temp_size() > 0 { Some(&mut scratch) } else { None },
                );
            })
        });
    }
    group.finish();
}

fn real_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("real_forward");
    for &size in SIZES {
        let size = if size % 2 == 0 { size } else { size + 1 };
        let plan = RealPlan::<f32>::new(size, PackFormat::Ccs, false).unwrap();
        let mut scratch = vec![0f32; plan.temp_size()];
        let input = vec![0f32; size];
        let mut out = vec![0f32; plan.complex_size() * 2];
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                plan.execute_forward(black_box(&mut out), black_box(&input), &mut scratch);
            })
        });
    }
    group.finish();
}

fn bluestein_prime_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("bluestein_prime_sizes");
    for &size in &[97usize, 509, 1021] {
        let plan = Plan::<f32>::new(size, Order::Normal, false).unwrap();
        let mut scratch = vec![0f32; plan.temp_size()];
        let input = vec![0f32; size * 2];
        let mut out = vec![0f32; size * 2];
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                plan.execute(
                    Direction::Forward,
                    black_box(&mut out),
                    black_box(&input),
                    if plan.temp_size() > 0 { Some(&mut scratch) } else { None },
                );
            })
        });
    }
    group.finish();
}

criterion_group!(benches, complex_forward, real_forward, bluestein_prime_sizes);
criterion_main!(benches);
