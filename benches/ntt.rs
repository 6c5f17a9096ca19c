use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hexl_kernel::NttEngine;
use hexl_kernel::numtheory::generate_primes;

const LOG_N: usize = 12;
const N: usize = 1usize << LOG_N;

fn modulus() -> u64 {
    generate_primes(1, 58, N).unwrap()[0]
}

fn bench_forward(c: &mut Criterion) {
    let engine = NttEngine::new(N, modulus()).unwrap();
    let values: Vec<u64> = (0..N as u64).map(|i| i % engine.modulus()).collect();

    c.bench_function("ntt forward", |b| {
        b.iter(|| {
            let mut v = values.clone();
            engine.compute_forward(black_box(&mut v), 1, 1).unwrap();
            black_box(v);
        })
    });
}

fn bench_forward_exact(c: &mut Criterion) {
    let engine = NttEngine::new(N, modulus()).unwrap();
    let values: Vec<u64> = (0..N as u64).map(|i| i % engine.modulus()).collect();

    c.bench_function("ntt forward exact", |b| {
        b.iter(|| {
            let mut v = values.clone();
            engine.compute_forward_exact(black_box(&mut v)).unwrap();
            black_box(v);
        })
    });
}

fn bench_inverse(c: &mut Criterion) {
    let engine = NttEngine::new(N, modulus()).unwrap();
    let mut values: Vec<u64> = (0..N as u64).map(|i| i % engine.modulus()).collect();
    engine.compute_forward(&mut values, 1, 1).unwrap();

    c.bench_function("ntt inverse", |b| {
        b.iter(|| {
            let mut v = values.clone();
            engine.compute_inverse(black_box(&mut v), 1, 1).unwrap();
            black_box(v);
        })
    });
}

fn bench_inverse_exact(c: &mut Criterion) {
    let engine = NttEngine::new(N, modulus()).unwrap();
    let mut values: Vec<u64> = (0..N as u64).map(|i| i % engine.modulus()).collect();
    engine.compute_forward(&mut values, 1, 1).unwrap();

    c.bench_function("ntt inverse exact", |b| {
        b.iter(|| {
            let mut v = values.clone();
            engine.compute_inverse_exact(black_box(&mut v)).unwrap();
            black_box(v);
        })
    });
}

fn bench_negacyclic_convolution(c: &mut Criterion) {
    let engine = NttEngine::new(N, modulus()).unwrap();
    let a: Vec<u64> = (0..N as u64).map(|i| i % engine.modulus()).collect();
    let b: Vec<u64> = (0..N as u64).map(|i| (i * 3 + 1) % engine.modulus()).collect();

    c.bench_function("ntt negacyclic convolution", |bencher| {
        bencher.iter(|| black_box(engine.negacyclic_convolution(black_box(&a), black_box(&b)).unwrap()))
    });
}

criterion_group!(
    ntt,
    bench_forward,
    bench_forward_exact,
    bench_inverse,
    bench_inverse_exact,
    bench_negacyclic_convolution,
);
criterion_main!(ntt);
