//! Micro-benchmark for automaton build time and lookup throughput.
//!
//! Compares:
//! 1. `KeySet::new` build time across input sizes
//! 2. `contains` lookup throughput on a built set
//! 3. `CompletionSet::keys(prefix)` enumeration cost

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dafsa::variants::{CompletionSet, KeySet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate `n` distinct, sorted, lowercase-ish keys of varying length.
fn generate_keys(n: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut keys: Vec<Vec<u8>> = (0..n)
        .map(|i| {
            let len = rng.gen_range(3..16);
            let mut key: Vec<u8> = (0..len).map(|_| rng.gen_range(b'a'..=b'z')).collect();
            key.extend_from_slice(i.to_string().as_bytes());
            key
        })
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyset_build");

    for n in [1_000, 10_000, 100_000] {
        let keys = generate_keys(n, 42);

        group.bench_with_input(BenchmarkId::new("build", n), &keys, |b, keys| {
            b.iter(|| KeySet::new(black_box(keys.clone()), true).unwrap());
        });
    }

    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyset_contains");

    for n in [1_000, 10_000, 100_000] {
        let keys = generate_keys(n, 42);
        let set = KeySet::new(keys.clone(), true).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(123);
        let probes: Vec<Vec<u8>> = (0..10_000)
            .map(|_| keys[rng.gen_range(0..keys.len())].clone())
            .collect();

        group.bench_with_input(BenchmarkId::new("contains", n), &(&set, &probes), |b, (set, probes)| {
            b.iter(|| {
                let mut hits = 0usize;
                for probe in probes.iter() {
                    if set.contains(black_box(probe)) {
                        hits += 1;
                    }
                }
                hits
            });
        });
    }

    group.finish();
}

fn bench_prefix_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion_set_keys");

    for n in [1_000, 10_000, 100_000] {
        let keys = generate_keys(n, 7);
        let set = CompletionSet::new(keys.clone(), true).unwrap();
        let prefix = keys[keys.len() / 2][..2].to_vec();

        group.bench_with_input(BenchmarkId::new("keys", n), &(&set, &prefix), |b, (set, prefix)| {
            b.iter(|| set.keys(black_box(prefix)).len());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_contains, bench_prefix_enumeration);
criterion_main!(benches);
