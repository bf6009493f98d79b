// ==============================================
// CROSS-STRATEGY EQUIVALENCE TESTS (integration)
// ==============================================
//
// Seeded random workloads run against both strategies and a BTreeMap oracle.
// Any divergence in an observable result is a bug in one of the strategies.

use std::collections::BTreeMap;

use keyqueue::ds::{EagerTreeQueue, LazyHeapQueue};
use keyqueue::traits::AddressableQueue;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn oracle_top(model: &BTreeMap<u32, u32>) -> Option<(u32, u32)> {
    model
        .iter()
        .map(|(&k, &v)| (k, v))
        .min_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
}

fn run_workload(seed: u64, ops: usize, universe: u32, compaction: Option<usize>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut lazy: LazyHeapQueue<u32, u32> = LazyHeapQueue::new();
    lazy.set_compaction_factor(compaction);
    let mut eager: EagerTreeQueue<u32, u32> = EagerTreeQueue::new();
    let mut model: BTreeMap<u32, u32> = BTreeMap::new();

    for step in 0..ops {
        let key = rng.random_range(0..universe);
        match rng.random_range(0..10u8) {
            0..=5 => {
                let value = rng.random_range(0..1_000);
                let expected = model.insert(key, value).is_some();
                assert_eq!(lazy.insert_or_update(key, value), expected, "step {step}");
                assert_eq!(eager.insert_or_update(key, value), expected, "step {step}");
            },
            6 | 7 => {
                let expected = model.remove(&key).is_some();
                assert_eq!(lazy.erase(&key), expected, "step {step}");
                assert_eq!(eager.erase(&key), expected, "step {step}");
            },
            _ => {
                let expected = oracle_top(&model);
                if let Some((k, _)) = expected {
                    model.remove(&k);
                }
                assert_eq!(lazy.pop().ok(), expected, "step {step}");
                assert_eq!(eager.pop().ok(), expected, "step {step}");
            },
        }

        let top = oracle_top(&model);
        assert_eq!(lazy.top().ok().map(|(k, v)| (*k, *v)), top, "step {step}");
        assert_eq!(eager.top().ok().map(|(k, v)| (*k, *v)), top, "step {step}");
        assert_eq!(lazy.len(), model.len());
        assert_eq!(eager.len(), model.len());
        assert_eq!(eager.tree_len(), model.len());
    }

    lazy.check_invariants().unwrap();
    eager.check_invariants().unwrap();

    let drained_lazy = lazy.into_sorted_vec();
    let drained_eager = eager.into_sorted_vec();
    assert_eq!(drained_lazy, drained_eager);
    assert_eq!(drained_lazy.len(), model.len());
}

#[test]
fn small_universe_heavy_updates() {
    for seed in 0..8 {
        run_workload(seed, 2_000, 16, Some(4));
    }
}

#[test]
fn large_universe() {
    run_workload(0xDEAD_BEEF, 20_000, 4_096, Some(4));
}

#[test]
fn without_compaction() {
    run_workload(17, 10_000, 64, None);
}

#[test]
fn aggressive_compaction() {
    run_workload(99, 10_000, 64, Some(1));
}

#[test]
fn lazy_heap_stale_growth_is_bounded() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut queue: LazyHeapQueue<u32, u32> = LazyHeapQueue::new();
    queue.set_compaction_factor(Some(3));

    for _ in 0..50_000 {
        let key = rng.random_range(0..32);
        queue.insert_or_update(key, rng.random());
        assert!(queue.heap_len() <= 3 * queue.len().max(1));
    }
}

#[test]
fn bulk_construction_matches_incremental() {
    let mut rng = SmallRng::seed_from_u64(11);
    let pairs: Vec<(u32, u32)> = (0..500)
        .map(|_| (rng.random_range(0..100), rng.random_range(0..50)))
        .collect();

    let bulk_lazy = LazyHeapQueue::<u32, u32>::from_pairs(pairs.iter().copied());
    let bulk_eager = EagerTreeQueue::<u32, u32>::from_pairs(pairs.iter().copied());
    let mut incremental: EagerTreeQueue<u32, u32> = EagerTreeQueue::new();
    for &(k, v) in &pairs {
        incremental.insert_or_update(k, v);
    }

    let expected = incremental.into_sorted_vec();
    assert_eq!(bulk_lazy.into_sorted_vec(), expected);
    assert_eq!(bulk_eager.into_sorted_vec(), expected);
}
