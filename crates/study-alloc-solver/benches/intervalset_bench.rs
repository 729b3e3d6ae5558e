// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use study_alloc_core::primitives::Interval;
use study_alloc_solver::intervalset::IntervalSet;

const SEED: u64 = 0x5EED_0F_DA75;
const DAY: i32 = 24 * 60;

fn gen_intervals(n: usize, rng: &mut impl Rng) -> Vec<Interval<i32>> {
    (0..n)
        .map(|_| {
            let a = rng.random_range(0..DAY - 1);
            let w = rng.random_range(1..=90.min(DAY - a));
            Interval::new(a, a + w)
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("intervalset_insert");
    for &n in &[8usize, 32, 128] {
        let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ n as u64);
        let items = gen_intervals(n, &mut rng);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("in_place", n), &items, |b, items| {
            b.iter_batched(
                IntervalSet::<i32>::new,
                |mut set| {
                    for &iv in items {
                        set.insert_and_coalesce(iv);
                    }
                    black_box(set)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("pure", n), &items, |b, items| {
            b.iter(|| {
                let mut set = IntervalSet::<i32>::new();
                for &iv in items {
                    set = set.inserted(iv);
                }
                black_box(set)
            })
        });
    }
    group.finish();
}

fn bench_gap_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("intervalset_gaps");
    let window = Interval::new(0, DAY);
    for &n in &[8usize, 32, 128] {
        let mut rng = ChaCha8Rng::seed_from_u64(SEED.rotate_left(7) ^ n as u64);
        let set = IntervalSet::from_vec(gen_intervals(n, &mut rng));
        let required: Vec<i32> = (0..64).map(|_| rng.random_range(5..=120)).collect();

        group.bench_with_input(BenchmarkId::new("first_free_gap", n), &set, |b, set| {
            b.iter(|| {
                for &r in &required {
                    black_box(set.first_free_gap(black_box(window), r));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("largest_free_gap", n), &set, |b, set| {
            b.iter(|| black_box(set.largest_free_gap::<i32>(black_box(window))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_gap_queries);
criterion_main!(benches);
