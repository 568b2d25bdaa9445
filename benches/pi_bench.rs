//! Criterion benchmarks for the counting pipeline.
//!
//! Run with `cargo bench`. The segment-sieve benches isolate the Fenwick
//! engine; the π benches compare the algorithm family end to end at
//! sizes where their asymptotics start to separate.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use primecount::generate::generate_primes;
use primecount::sieve::SegmentSieve;

fn bench_segment_sieve(c: &mut Criterion) {
    let primes = generate_primes(1000);
    let mut group = c.benchmark_group("segment_sieve");

    for &size in &[1u64 << 14, 1 << 18] {
        group.bench_with_input(BenchmarkId::new("init", size), &size, |b, &size| {
            let mut sieve = SegmentSieve::new(size);
            let mut next = vec![0u64; primes.len()];
            b.iter(|| {
                next.iter_mut().for_each(|n| *n = 0);
                sieve.init(black_box(0), size, &primes, 6, &mut next);
            });
        });

        group.bench_with_input(
            BenchmarkId::new("cross_out_and_count", size),
            &size,
            |b, &size| {
                let mut sieve = SegmentSieve::new(size);
                let mut next = vec![0u64; primes.len()];
                b.iter(|| {
                    next.iter_mut().for_each(|n| *n = 0);
                    sieve.init(0, size, &primes, 6, &mut next);
                    for bi in 7..primes.len().min(100) {
                        let p = primes[bi];
                        let mut bookmark = p;
                        sieve.cross_out(p, &mut bookmark);
                        black_box(sieve.count(size / 2));
                    }
                });
            },
        );
    }
    group.finish();
}

fn bench_pi_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("pi");
    group.sample_size(10);

    for &x in &[1_000_000u64, 10_000_000] {
        group.bench_with_input(BenchmarkId::new("lmo_simple", x), &x, |b, &x| {
            b.iter(|| primecount::pi_lmo_simple(black_box(x)))
        });
        group.bench_with_input(BenchmarkId::new("lmo", x), &x, |b, &x| {
            b.iter(|| primecount::pi_lmo(black_box(x), 4))
        });
        group.bench_with_input(BenchmarkId::new("gourdon", x), &x, |b, &x| {
            b.iter(|| primecount::pi_gourdon_64(black_box(x), 4))
        });
        group.bench_with_input(BenchmarkId::new("meissel", x), &x, |b, &x| {
            b.iter(|| primecount::pi_meissel(black_box(x), 4))
        });
    }
    group.finish();
}

fn bench_nth_prime(c: &mut Criterion) {
    c.bench_function("nth_prime_1e6", |b| {
        b.iter(|| primecount::nth_prime(black_box(1_000_000)).unwrap())
    });
}

criterion_group!(benches, bench_segment_sieve, bench_pi_algorithms, bench_nth_prime);
criterion_main!(benches);
