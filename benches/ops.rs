//! Micro-operation benchmarks for both queue strategies.
//!
//! Run with: `cargo bench --bench ops`
//!
//! Measures per-operation latency for inserts, priority updates, erases and
//! full drains on the lazy-heap and eager-tree strategies under identical
//! key streams.

use std::hint::black_box;
use std::time::Instant;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use keyqueue::ds::{EagerTreeQueue, LazyHeapQueue};
use keyqueue::traits::AddressableQueue;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const KEYS: u64 = 16_384;
const OPS: u64 = 100_000;

fn lazy() -> LazyHeapQueue<u64, u64> {
    LazyHeapQueue::with_capacity(KEYS as usize)
}

fn eager() -> EagerTreeQueue<u64, u64> {
    EagerTreeQueue::with_capacity(KEYS as usize)
}

fn filled<Q: AddressableQueue<u64, u64>>(mut queue: Q) -> Q {
    for key in 0..KEYS {
        queue.insert_or_update(key, key.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    }
    queue
}

/// Seeded `(key, value)` stream shared by every strategy in a group.
fn update_stream(seed: u64) -> Vec<(u64, u64)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..OPS)
        .map(|_| (rng.random::<u64>() % KEYS, rng.random::<u64>()))
        .collect()
}

// ============================================================================
// Insert (fresh keys)
// ============================================================================

fn bench_insert<Q, F>(c: &mut Criterion, name: &str, make: F)
where
    Q: AddressableQueue<u64, u64>,
    F: Fn() -> Q,
{
    let mut group = c.benchmark_group("insert_ns");
    group.throughput(Throughput::Elements(KEYS));
    group.bench_function(name, |b| {
        b.iter_custom(|iters| {
            let mut elapsed = std::time::Duration::ZERO;
            for _ in 0..iters {
                let mut queue = make();
                let start = Instant::now();
                for key in 0..KEYS {
                    black_box(queue.insert_or_update(key, key ^ 0x5555));
                }
                elapsed += start.elapsed();
            }
            elapsed
        })
    });
    group.finish();
}

// ============================================================================
// Update (random priority changes on existing keys)
// ============================================================================

fn bench_update<Q, F>(c: &mut Criterion, name: &str, make: F)
where
    Q: AddressableQueue<u64, u64>,
    F: Fn() -> Q,
{
    let stream = update_stream(42);
    let mut group = c.benchmark_group("update_ns");
    group.throughput(Throughput::Elements(OPS));
    group.bench_function(name, |b| {
        b.iter_custom(|iters| {
            let mut queue = filled(make());
            let start = Instant::now();
            for _ in 0..iters {
                for &(key, value) in &stream {
                    black_box(queue.insert_or_update(key, value));
                }
            }
            start.elapsed()
        })
    });
    group.finish();
}

// ============================================================================
// Erase + reinsert
// ============================================================================

fn bench_erase<Q, F>(c: &mut Criterion, name: &str, make: F)
where
    Q: AddressableQueue<u64, u64>,
    F: Fn() -> Q,
{
    let stream = update_stream(7);
    let mut group = c.benchmark_group("erase_reinsert_ns");
    group.throughput(Throughput::Elements(OPS));
    group.bench_function(name, |b| {
        b.iter_custom(|iters| {
            let mut queue = filled(make());
            let start = Instant::now();
            for _ in 0..iters {
                for &(key, value) in &stream {
                    black_box(queue.erase(&key));
                    black_box(queue.insert_or_update(key, value));
                }
            }
            start.elapsed()
        })
    });
    group.finish();
}

// ============================================================================
// Drain (pop everything after a burst of updates)
// ============================================================================

fn bench_drain(c: &mut Criterion) {
    let stream = update_stream(1337);
    let mut group = c.benchmark_group("drain_after_updates");

    for updates in [0usize, OPS as usize / 10, OPS as usize] {
        group.throughput(Throughput::Elements(KEYS));
        group.bench_with_input(BenchmarkId::new("lazy_heap", updates), &updates, |b, &n| {
            b.iter_custom(|iters| drain_timed(iters, lazy, &stream[..n]))
        });
        group.bench_with_input(
            BenchmarkId::new("lazy_heap_uncompacted", updates),
            &updates,
            |b, &n| {
                b.iter_custom(|iters| {
                    drain_timed(
                        iters,
                        || {
                            let mut queue = lazy();
                            queue.set_compaction_factor(None);
                            queue
                        },
                        &stream[..n],
                    )
                })
            },
        );
        group.bench_with_input(BenchmarkId::new("eager_tree", updates), &updates, |b, &n| {
            b.iter_custom(|iters| drain_timed(iters, eager, &stream[..n]))
        });
    }
    group.finish();
}

fn drain_timed<Q, F>(iters: u64, make: F, updates: &[(u64, u64)]) -> std::time::Duration
where
    Q: AddressableQueue<u64, u64>,
    F: Fn() -> Q,
{
    let mut elapsed = std::time::Duration::ZERO;
    for _ in 0..iters {
        let mut queue = filled(make());
        for &(key, value) in updates {
            queue.insert_or_update(key, value);
        }
        let start = Instant::now();
        while let Ok(pair) = queue.pop() {
            black_box(pair);
        }
        elapsed += start.elapsed();
    }
    elapsed
}

fn bench_ops(c: &mut Criterion) {
    bench_insert(c, "lazy_heap", lazy);
    bench_insert(c, "eager_tree", eager);
    bench_update(c, "lazy_heap", lazy);
    bench_update(c, "eager_tree", eager);
    bench_erase(c, "lazy_heap", lazy);
    bench_erase(c, "eager_tree", eager);
    bench_drain(c);
}

criterion_group!(benches, bench_ops);
criterion_main!(benches);
