// Comparative benchmark suite for double-ended sequences
//
// Benchmarks the block deque against the standard library:
// - Deque: chain of circular-buffer blocks, O(sqrt(n)) middle edits
// - VecDeque: single ring buffer, O(n) middle edits
// - Vec: contiguous array, O(n) front and middle edits

use std::collections::VecDeque;

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use blockdeque::Deque;

// =============================================================================
// Common Interface
// =============================================================================

trait Sequence: Default {
    fn name() -> &'static str;
    fn len(&self) -> usize;
    fn push_back(&mut self, value: u64);
    fn push_front(&mut self, value: u64);
    fn pop_front(&mut self) -> Option<u64>;
    fn at(&self, pos: usize) -> u64;
    fn insert(&mut self, pos: usize, value: u64);
    fn remove(&mut self, pos: usize) -> Option<u64>;
}

impl Sequence for Deque<u64> {
    fn name() -> &'static str {
        "Deque"
    }
    fn len(&self) -> usize {
        Deque::len(self)
    }
    fn push_back(&mut self, value: u64) {
        Deque::push_back(self, value)
    }
    fn push_front(&mut self, value: u64) {
        Deque::push_front(self, value)
    }
    fn pop_front(&mut self) -> Option<u64> {
        Deque::pop_front(self).ok()
    }
    fn at(&self, pos: usize) -> u64 {
        self[pos]
    }
    fn insert(&mut self, pos: usize, value: u64) {
        let cursor = self.cursor_at(pos).expect("position within bounds");
        Deque::insert(self, cursor, value).expect("fresh cursor");
    }
    fn remove(&mut self, pos: usize) -> Option<u64> {
        let cursor = self.cursor_at(pos).ok()?;
        let value = *self.get_at(&cursor).ok()?;
        self.erase(cursor).ok()?;
        Some(value)
    }
}

impl Sequence for VecDeque<u64> {
    fn name() -> &'static str {
        "VecDeque"
    }
    fn len(&self) -> usize {
        VecDeque::len(self)
    }
    fn push_back(&mut self, value: u64) {
        VecDeque::push_back(self, value)
    }
    fn push_front(&mut self, value: u64) {
        VecDeque::push_front(self, value)
    }
    fn pop_front(&mut self) -> Option<u64> {
        VecDeque::pop_front(self)
    }
    fn at(&self, pos: usize) -> u64 {
        self[pos]
    }
    fn insert(&mut self, pos: usize, value: u64) {
        VecDeque::insert(self, pos, value)
    }
    fn remove(&mut self, pos: usize) -> Option<u64> {
        VecDeque::remove(self, pos)
    }
}

impl Sequence for Vec<u64> {
    fn name() -> &'static str {
        "Vec"
    }
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn push_back(&mut self, value: u64) {
        self.push(value)
    }
    fn push_front(&mut self, value: u64) {
        Vec::insert(self, 0, value)
    }
    fn pop_front(&mut self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(Vec::remove(self, 0))
        }
    }
    fn at(&self, pos: usize) -> u64 {
        self[pos]
    }
    fn insert(&mut self, pos: usize, value: u64) {
        Vec::insert(self, pos, value)
    }
    fn remove(&mut self, pos: usize) -> Option<u64> {
        (pos < Vec::len(self)).then(|| Vec::remove(self, pos))
    }
}

// =============================================================================
// Benchmark Helpers
// =============================================================================

fn filled<S: Sequence>(size: usize) -> S {
    let mut seq = S::default();
    for i in 0..size as u64 {
        seq.push_back(i);
    }
    seq
}

/// Alternate pushes at both ends
fn push_both_ends<S: Sequence>(seq: &mut S, count: usize) {
    for i in 0..count as u64 {
        if i % 2 == 0 {
            seq.push_back(i);
        } else {
            seq.push_front(i);
        }
    }
}

/// Insert at uniformly random positions
fn random_inserts<S: Sequence>(seq: &mut S, count: usize, rng: &mut StdRng) {
    for i in 0..count as u64 {
        let pos = rng.gen_range(0..=seq.len());
        seq.insert(pos, i);
    }
}

/// Remove at uniformly random positions until empty
fn random_removes<S: Sequence>(seq: &mut S, rng: &mut StdRng) {
    while seq.len() > 0 {
        let pos = rng.gen_range(0..seq.len());
        black_box(seq.remove(pos));
    }
}

/// Read uniformly random positions
fn random_reads<S: Sequence>(seq: &S, count: usize, rng: &mut StdRng) -> u64 {
    let mut sum = 0u64;
    for _ in 0..count {
        let pos = rng.gen_range(0..seq.len());
        sum = sum.wrapping_add(seq.at(pos));
    }
    sum
}

fn bench_sequence<S: Sequence>(c: &mut Criterion, sizes: &[usize]) {
    let mut group = c.benchmark_group(S::name());

    for &size in sizes {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("push_both_ends", size), &size, |b, &size| {
            b.iter(|| {
                let mut seq = S::default();
                push_both_ends(&mut seq, size);
                black_box(seq.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("drain_front", size), &size, |b, &size| {
            b.iter(|| {
                let mut seq: S = filled(size);
                while let Some(value) = seq.pop_front() {
                    black_box(value);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("random_inserts", size), &size, |b, &size| {
            b.iter(|| {
                let mut seq = S::default();
                let mut rng = StdRng::seed_from_u64(42);
                random_inserts(&mut seq, size, &mut rng);
                black_box(seq.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("random_removes", size), &size, |b, &size| {
            b.iter(|| {
                let mut seq: S = filled(size);
                let mut rng = StdRng::seed_from_u64(42);
                random_removes(&mut seq, &mut rng);
            });
        });

        group.bench_with_input(BenchmarkId::new("random_reads", size), &size, |b, &size| {
            let seq: S = filled(size);
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                black_box(random_reads(&seq, size, &mut rng))
            });
        });
    }

    group.finish();
}

// =============================================================================
// Entry Points
// =============================================================================

const SIZES: [usize; 3] = [1_000, 10_000, 50_000];

fn bench_deque(c: &mut Criterion) {
    bench_sequence::<Deque<u64>>(c, &SIZES);
}

fn bench_vec_deque(c: &mut Criterion) {
    bench_sequence::<VecDeque<u64>>(c, &SIZES);
}

fn bench_vec(c: &mut Criterion) {
    // Front operations are quadratic, so stay small
    bench_sequence::<Vec<u64>>(c, &SIZES[..2]);
}

criterion_group!(benches, bench_deque, bench_vec_deque, bench_vec);
criterion_main!(benches);
