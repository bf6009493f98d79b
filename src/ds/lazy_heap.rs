//! Lazy-invalidation binary heap with a key index.
//!
//! An addressable priority queue that never searches the heap for an
//! arbitrary element. Updates push a fresh entry and leave the old one in
//! place; erases only touch the index. Entries whose `(key, value)` no longer
//! matches the index are **stale** and are discarded when they surface at the
//! top of the heap.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                         LazyHeapQueue Layout (C = Greater)                  │
//! │                                                                             │
//! │   ┌───────────────────────────────────────────────────────────────────┐    │
//! │   │  index: FxHashMap<K, V>   (authoritative source of truth)         │    │
//! │   │                                                                   │    │
//! │   │    ┌─────────┬─────────┐                                         │    │
//! │   │    │  key    │  value  │                                         │    │
//! │   │    ├─────────┼─────────┤                                         │    │
//! │   │    │   1     │  "z"    │                                         │    │
//! │   │    │   2     │  "f"    │                                         │    │
//! │   │    │   0     │  "a"    │                                         │    │
//! │   │    └─────────┴─────────┘                                         │    │
//! │   │                                                                   │    │
//! │   │    len() = 3 (live keys)                                         │    │
//! │   └───────────────────────────────────────────────────────────────────┘    │
//! │                                                                             │
//! │   ┌───────────────────────────────────────────────────────────────────┐    │
//! │   │  heap: BinaryHeap<Reverse<Ranked<K, V, C>>>  (may be stale)      │    │
//! │   │                                                                   │    │
//! │   │    ┌────────────────────────────────────────────────────────┐   │    │
//! │   │    │ (1, "z")   ← top, always matches index["1"]            │   │    │
//! │   │    │ (2, "f")   ← valid                                      │   │    │
//! │   │    │ (0, "c")   ← STALE: index[0] = "a", not "c"             │   │    │
//! │   │    │ (5, "b")   ← STALE: key 5 was erased                    │   │    │
//! │   │    │ (0, "a")   ← valid                                      │   │    │
//! │   │    └────────────────────────────────────────────────────────┘   │    │
//! │   │                                                                   │    │
//! │   │    heap_len() = 5 (includes stale entries)                       │    │
//! │   └───────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────────┘
//!
//! Cleanup (after every mutation)
//! ──────────────────────────────
//!   while let Some(top) = heap.peek():
//!     if index[top.key] == top.value → stop (top is valid)
//!     else                           → heap.pop()   (stale, reaped once)
//!
//! Compaction
//! ──────────
//!   With a compaction factor f, a mutation that leaves
//!   heap_len > max(len, 1) * f rebuilds the heap from the index in O(n).
//! ```
//!
//! ## Operations
//!
//! | Operation          | Description                             | Complexity         |
//! |--------------------|-----------------------------------------|--------------------|
//! | `top`              | Read heap top                           | O(1)               |
//! | `pop`              | Pop top, drop key, clean up             | Amortized O(log n) |
//! | `insert_or_update` | Set index, push entry, clean up         | Amortized O(log n) |
//! | `erase`            | Drop key from index, clean up           | Amortized O(log n) |
//! | `contains`/`peek`  | Index lookup                            | O(1)               |
//! | `rebuild`          | Rebuild heap from index                 | O(n)               |
//!
//! Each update creates at most one stale entry and each stale entry is
//! discarded at most once, which is where the amortized bounds come from.
//!
//! ## Example Usage
//!
//! ```
//! use keyqueue::ds::LazyHeapQueue;
//! use keyqueue::traits::AddressableQueue;
//!
//! let mut queue: LazyHeapQueue<&str, u32> = LazyHeapQueue::new();
//!
//! queue.insert_or_update("task_a", 5);
//! queue.insert_or_update("task_b", 2);
//! queue.insert_or_update("task_c", 8);
//!
//! // Raise task_b above everything; its old entry is left behind as stale.
//! assert!(queue.insert_or_update("task_b", 9));
//! assert_eq!(queue.len(), 3);
//!
//! assert_eq!(queue.pop(), Ok(("task_b", 9)));
//! assert_eq!(queue.pop(), Ok(("task_c", 8)));
//! assert_eq!(queue.pop(), Ok(("task_a", 5)));
//! assert!(queue.pop().is_err());
//! ```
//!
//! ## Thread Safety
//!
//! `LazyHeapQueue` is not thread-safe. Wrap in a mutex for concurrent access.
use std::cmp::Reverse;
use std::collections::hash_map;
use std::collections::BinaryHeap;
use std::fmt;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{InvariantError, QueueError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::QueueMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::QueueMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    MetricsSnapshotProvider, QueueMetricsReadRecorder, QueueMetricsRecorder,
};
use crate::order::{Compare, Greater, Ranked};
use crate::traits::AddressableQueue;

/// Heap-to-live ratio above which a lazy heap rebuilds itself by default.
pub const DEFAULT_COMPACTION_FACTOR: usize = 4;

/// Addressable priority queue over a binary heap with lazy invalidation.
///
/// Maintains an authoritative `index` map and a heap that may contain stale
/// entries. The heap top is reconciled after every mutation, so `top()` is
/// always a live entry.
///
/// # Type Parameters
///
/// - `K`: Key type (`Eq + Hash + Ord + Clone`); `Ord` breaks priority ties
/// - `V`: Value type (`Eq + Clone`); a heap entry is live exactly when its
///   value `==` the indexed one, so equality must be reflexive
/// - `C`: Priority relation, [`Greater`] (max-queue) by default
///
/// Values such as `f64`, where `NaN != NaN`, are rejected at compile time:
///
/// ```compile_fail
/// use keyqueue::ds::LazyHeapQueue;
///
/// let queue: LazyHeapQueue<u8, f64> = LazyHeapQueue::new();
/// ```
///
/// # Example
///
/// ```
/// use keyqueue::ds::LazyHeapQueue;
/// use keyqueue::order::Less;
/// use keyqueue::traits::AddressableQueue;
///
/// // Min-queue: smallest distance first.
/// let mut frontier: LazyHeapQueue<char, u32, Less> = LazyHeapQueue::new();
/// frontier.insert_or_update('a', 7);
/// frontier.insert_or_update('b', 3);
/// frontier.insert_or_update('a', 1); // relaxed edge
///
/// assert_eq!(frontier.top(), Ok((&'a', &1)));
/// assert_eq!(frontier.peek(&'b'), Ok(&3));
/// ```
pub struct LazyHeapQueue<K, V, C = Greater> {
    index: FxHashMap<K, V>,
    heap: BinaryHeap<Reverse<Ranked<K, V, C>>>,
    compaction: Option<usize>,
    #[cfg(feature = "metrics")]
    metrics: QueueMetrics,
}

impl<K, V, C> LazyHeapQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    /// Creates an empty queue with the default compaction factor.
    ///
    /// # Example
    ///
    /// ```
    /// use keyqueue::ds::LazyHeapQueue;
    /// use keyqueue::traits::AddressableQueue;
    ///
    /// let queue: LazyHeapQueue<String, u32> = LazyHeapQueue::new();
    /// assert!(queue.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty queue with pre-allocated capacity.
    ///
    /// The capacity is only an allocation hint; the queue grows past it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            heap: BinaryHeap::with_capacity(capacity),
            compaction: Some(DEFAULT_COMPACTION_FACTOR),
            #[cfg(feature = "metrics")]
            metrics: QueueMetrics::default(),
        }
    }

    /// Builds a queue from `(key, value)` pairs in O(n log n).
    ///
    /// When a key appears more than once the last occurrence wins, exactly as
    /// if the pairs had been applied with `insert_or_update` in order.
    ///
    /// # Example
    ///
    /// ```
    /// use keyqueue::ds::LazyHeapQueue;
    /// use keyqueue::traits::AddressableQueue;
    ///
    /// let queue: LazyHeapQueue<u32, &str> =
    ///     LazyHeapQueue::from_pairs([(1, "b"), (2, "c"), (1, "a")]);
    /// assert_eq!(queue.len(), 2);
    /// assert_eq!(queue.peek(&1), Ok(&"a"));
    /// assert_eq!(queue.heap_len(), 2);
    /// ```
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut queue = Self::new();
        queue.bulk_load(pairs);
        queue
    }

    /// Applies `pairs` in order with last-occurrence-wins, then rebuilds the
    /// heap once from the index.
    ///
    /// Observably equivalent to calling `insert_or_update` for each pair, but
    /// costs O(n + m) instead of O(m log n) and leaves no stale entries.
    pub fn bulk_load<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.index.insert(key, value);
        }
        self.rebuild_heap();
    }

    /// Sets the automatic compaction factor; `None` disables compaction.
    ///
    /// A factor of `0` is treated as `1`.
    pub fn set_compaction_factor(&mut self, factor: Option<usize>) {
        self.compaction = factor.map(|f| f.max(1));
        self.maybe_compact();
    }

    /// Returns the automatic compaction factor, if enabled.
    pub fn compaction_factor(&self) -> Option<usize> {
        self.compaction
    }

    /// Reserves capacity for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.index.reserve(additional);
        self.heap.reserve(additional);
    }

    /// Shrinks internal storage to fit current contents.
    pub fn shrink_to_fit(&mut self) {
        self.index.shrink_to_fit();
        self.heap.shrink_to_fit();
    }

    /// Returns the underlying heap length (may exceed `len()` due to stale entries).
    ///
    /// # Example
    ///
    /// ```
    /// use keyqueue::ds::LazyHeapQueue;
    /// use keyqueue::traits::AddressableQueue;
    ///
    /// let mut queue: LazyHeapQueue<&str, i32> = LazyHeapQueue::new();
    /// queue.insert_or_update("a", 1);
    /// queue.insert_or_update("a", 3); // (a, 1) is buried and stale
    /// queue.insert_or_update("a", 5); // (a, 3) is buried and stale
    ///
    /// assert_eq!(queue.len(), 1);       // 1 live key
    /// assert_eq!(queue.heap_len(), 3);  // 3 heap entries (2 stale)
    /// ```
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    /// Iterates over live `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.index.iter()
    }

    /// Drains the queue into a vector in priority order.
    pub fn into_sorted_vec(mut self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.index.len());
        while let Ok(pair) = self.pop() {
            out.push(pair);
        }
        out
    }

    /// Rebuilds the heap from the authoritative index, discarding every
    /// stale entry.
    ///
    /// # Example
    ///
    /// ```
    /// use keyqueue::ds::LazyHeapQueue;
    /// use keyqueue::traits::AddressableQueue;
    ///
    /// let mut queue: LazyHeapQueue<&str, i32> = LazyHeapQueue::new();
    /// queue.set_compaction_factor(None);
    /// for i in 0..10 {
    ///     queue.insert_or_update("key", i);
    /// }
    /// assert_eq!(queue.heap_len(), 10);
    ///
    /// queue.rebuild();
    /// assert_eq!(queue.heap_len(), 1);
    /// assert_eq!(queue.peek(&"key"), Ok(&9));
    /// ```
    pub fn rebuild(&mut self) {
        self.rebuild_heap();
        #[cfg(feature = "metrics")]
        self.metrics.record_compaction();
    }

    /// Rebuilds if the heap has grown too stale relative to the live count.
    ///
    /// Triggers when `heap_len() > max(len(), 1) * factor`; returns whether a
    /// rebuild happened.
    pub fn maybe_rebuild(&mut self, factor: usize) -> bool {
        let factor = factor.max(1);
        if self.heap.len() > self.index.len().max(1).saturating_mul(factor) {
            self.rebuild();
            true
        } else {
            false
        }
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.index.capacity() * std::mem::size_of::<(K, V)>()
            + self.heap.capacity() * std::mem::size_of::<Reverse<Ranked<K, V, C>>>()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> QueueMetricsSnapshot {
        self.metrics.snapshot(self.index.len(), self.heap.len())
    }

    /// Refills the heap from the index, reusing its allocation.
    fn rebuild_heap(&mut self) {
        let mut entries = std::mem::take(&mut self.heap).into_vec();
        entries.clear();
        entries.extend(
            self.index
                .iter()
                .map(|(key, value)| Reverse(Ranked::new(key.clone(), value.clone()))),
        );
        self.heap = BinaryHeap::from(entries);
    }

    /// Discards stale entries until the heap top matches the index.
    fn pop_till_valid(&mut self) {
        while let Some(Reverse(top)) = self.heap.peek() {
            if self.index.get(top.key()) == Some(top.value()) {
                break;
            }
            self.heap.pop();
            #[cfg(feature = "metrics")]
            self.metrics.record_stale_reaped();
        }
    }

    fn maybe_compact(&mut self) {
        if let Some(factor) = self.compaction {
            self.maybe_rebuild(factor);
        }
    }
}

impl<K, V, C> AddressableQueue<K, V> for LazyHeapQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn top(&self) -> Result<(&K, &V), QueueError> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_top_call();

        self.heap
            .peek()
            .map(|Reverse(entry)| entry.as_pair())
            .ok_or(QueueError::EmptyQueue)
    }

    fn pop(&mut self) -> Result<(K, V), QueueError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_call();

        let Reverse(entry) = self.heap.pop().ok_or(QueueError::EmptyQueue)?;
        let (key, value) = entry.into_pair();
        let removed = self.index.remove(&key);
        debug_assert!(removed.as_ref() == Some(&value), "heap top was stale");
        self.pop_till_valid();
        self.maybe_compact();

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_found();
        Ok((key, value))
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn insert_or_update(&mut self, key: K, value: V) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        let was_present = match self.index.get_mut(&key) {
            // The heap already holds a live entry for exactly this pair.
            Some(current) if *current == value => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_update();
                return true;
            },
            Some(current) => {
                *current = value.clone();
                true
            },
            None => {
                self.index.insert(key.clone(), value.clone());
                false
            },
        };

        #[cfg(feature = "metrics")]
        {
            if was_present {
                self.metrics.record_insert_update();
            } else {
                self.metrics.record_insert_new();
            }
        }

        self.heap.push(Reverse(Ranked::new(key, value)));
        self.pop_till_valid();
        self.maybe_compact();
        was_present
    }

    fn erase(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_erase_call();

        if self.index.remove(key).is_none() {
            return false;
        }
        self.pop_till_valid();
        self.maybe_compact();

        #[cfg(feature = "metrics")]
        self.metrics.record_erase_found();
        true
    }

    fn contains(&self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_contains_call();

        self.index.contains_key(key)
    }

    fn peek(&self, key: &K) -> Result<&V, QueueError> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        let value = self.index.get(key).ok_or(QueueError::KeyNotFound)?;

        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_found();
        Ok(value)
    }

    fn clear(&mut self) {
        self.index.clear();
        self.heap.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.heap.len() < self.index.len() {
            return Err(InvariantError::new(format!(
                "heap holds {} entries for {} live keys",
                self.heap.len(),
                self.index.len()
            )));
        }

        match self.heap.peek() {
            None if !self.index.is_empty() => {
                return Err(InvariantError::new("heap is empty but index is not"));
            },
            Some(Reverse(top)) if self.index.get(top.key()) != Some(top.value()) => {
                return Err(InvariantError::new("heap top is stale"));
            },
            _ => {},
        }

        let mut live: FxHashSet<&K> = FxHashSet::default();
        for Reverse(entry) in self.heap.iter() {
            if self.index.get(entry.key()) == Some(entry.value()) {
                live.insert(entry.key());
            }
        }
        if live.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "{} live keys have no matching heap entry",
                self.index.len() - live.len()
            )));
        }

        Ok(())
    }
}

impl<K, V, C> Default for LazyHeapQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy of the live contents. The copy starts with compacted storage
/// and fresh counters.
impl<K, V, C> Clone for LazyHeapQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.index.len());
        copy.compaction = self.compaction;
        copy.index = self.index.clone();
        copy.rebuild_heap();
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        self.index.clone_from(&source.index);
        self.compaction = source.compaction;
        self.rebuild_heap();
        #[cfg(feature = "metrics")]
        {
            self.metrics = QueueMetrics::default();
        }
    }
}

impl<K, V, C> fmt::Debug for LazyHeapQueue<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyHeapQueue")
            .field("index", &self.index)
            .field("heap_len", &self.heap.len())
            .field("compaction", &self.compaction)
            .finish()
    }
}

impl<K, V, C> FromIterator<(K, V)> for LazyHeapQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K, V, C> Extend<(K, V)> for LazyHeapQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert_or_update(key, value);
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, C> MetricsSnapshotProvider<QueueMetricsSnapshot> for LazyHeapQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn snapshot(&self) -> QueueMetricsSnapshot {
        self.metrics_snapshot()
    }
}


#[cfg(test)]
mod property_tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone)]
    enum Op {
        Upsert(u8, u16),
        Erase(u8),
        Pop,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..32, 0u16..64).prop_map(|(k, v)| Op::Upsert(k, v)),
            2 => (0u8..32).prop_map(Op::Erase),
            1 => Just(Op::Pop),
        ]
    }

    /// Highest value first, ties by ascending key.
    fn expected_top(model: &BTreeMap<u8, u16>) -> Option<(u8, u16)> {
        model
            .iter()
            .map(|(&k, &v)| (k, v))
            .min_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
    }

    proptest! {
        /// Every operation agrees with a BTreeMap model.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_model(
            compaction in prop::option::of(1usize..5),
            ops in prop::collection::vec(op_strategy(), 0..200)
        ) {
            let mut queue: LazyHeapQueue<u8, u16> = LazyHeapQueue::new();
            queue.set_compaction_factor(compaction);
            let mut model: BTreeMap<u8, u16> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Upsert(k, v) => {
                        prop_assert_eq!(queue.insert_or_update(k, v), model.insert(k, v).is_some());
                    },
                    Op::Erase(k) => {
                        prop_assert_eq!(queue.erase(&k), model.remove(&k).is_some());
                    },
                    Op::Pop => {
                        let expected = expected_top(&model);
                        if let Some((k, _)) = expected {
                            model.remove(&k);
                        }
                        prop_assert_eq!(queue.pop().ok(), expected);
                    },
                }
                prop_assert_eq!(queue.len(), model.len());
                prop_assert_eq!(queue.top().ok().map(|(k, v)| (*k, *v)), expected_top(&model));
                prop_assert!(queue.check_invariants().is_ok());
            }
        }

        /// Draining yields non-increasing values with ascending keys on ties.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_drain_is_ordered(
            ops in prop::collection::vec(op_strategy(), 0..200)
        ) {
            let mut queue: LazyHeapQueue<u8, u16> = LazyHeapQueue::new();
            for op in ops {
                match op {
                    Op::Upsert(k, v) => { queue.insert_or_update(k, v); },
                    Op::Erase(k) => { queue.erase(&k); },
                    Op::Pop => { let _ = queue.pop(); },
                }
            }

            let len = queue.len();
            let drained = queue.into_sorted_vec();
            prop_assert_eq!(drained.len(), len);
            for pair in drained.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(a.1 > b.1 || (a.1 == b.1 && a.0 < b.0));
            }
        }

        /// Identical update is idempotent.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_update_idempotent(
            pairs in prop::collection::vec((0u8..16, 0u16..16), 1..50),
            key in 0u8..16,
            value in 0u16..16
        ) {
            let mut queue: LazyHeapQueue<u8, u16> = LazyHeapQueue::from_pairs(pairs);
            queue.insert_or_update(key, value);
            let len = queue.len();
            let heap_len = queue.heap_len();

            prop_assert!(queue.insert_or_update(key, value));
            prop_assert_eq!(queue.peek(&key), Ok(&value));
            prop_assert_eq!(queue.len(), len);
            prop_assert_eq!(queue.heap_len(), heap_len);
        }
    }
}
