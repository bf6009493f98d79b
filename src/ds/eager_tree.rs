//! Ordered-tree priority queue with a key index.
//!
//! Keeps a `BTreeSet` holding exactly the live `(key, value)` pairs, ranked
//! by the [ordering rule](crate::order), next to a key index. Every mutation
//! updates both structures before returning, so there are never stale
//! entries and `len()` always equals the tree size.
//!
//! ```text
//!   index: FxHashMap<K, V>              tree: BTreeSet<Ranked<K, V, C>>
//!   ┌─────┬───────┐                     ┌──────────────────────────────┐
//!   │  1  │  "z"  │ ◄─────────────────► │ (1, "z")   ← first() = top   │
//!   │  2  │  "f"  │ ◄─────────────────► │ (2, "f")                     │
//!   │  0  │  "a"  │ ◄─────────────────► │ (0, "a")                     │
//!   └─────┴───────┘                     └──────────────────────────────┘
//!
//!   insert_or_update(2, "zz"):
//!     1. old = index.insert(2, "zz")     → Some("f")
//!     2. tree.remove((2, "f"))           (position depends on old value)
//!     3. tree.insert((2, "zz"))
//! ```
//!
//! Compared with [`LazyHeapQueue`](crate::ds::LazyHeapQueue), every update
//! pays for an extra O(log n) tree removal but the backing structure never
//! grows beyond the live set.
use std::collections::hash_map;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

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

/// Addressable priority queue over a balanced ordered set.
///
/// # Example
///
/// ```
/// use keyqueue::ds::EagerTreeQueue;
/// use keyqueue::traits::AddressableQueue;
///
/// let mut queue: EagerTreeQueue<u32, &str> = EagerTreeQueue::new();
/// queue.insert_or_update(1, "low");
/// queue.insert_or_update(2, "mid");
/// assert!(queue.insert_or_update(1, "top"));
///
/// assert_eq!(queue.tree_len(), queue.len());
/// assert_eq!(queue.pop(), Ok((1, "top")));
/// assert_eq!(queue.pop(), Ok((2, "mid")));
/// ```
pub struct EagerTreeQueue<K, V, C = Greater> {
    index: FxHashMap<K, V>,
    tree: BTreeSet<Ranked<K, V, C>>,
    #[cfg(feature = "metrics")]
    metrics: QueueMetrics,
}

impl<K, V, C> EagerTreeQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty queue whose index is pre-allocated for `capacity`
    /// keys. The tree allocates per node and ignores the hint.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            tree: BTreeSet::new(),
            #[cfg(feature = "metrics")]
            metrics: QueueMetrics::default(),
        }
    }

    /// Builds a queue from `(key, value)` pairs in O(n log n); the last
    /// occurrence of a duplicate key wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut queue = Self::new();
        queue.bulk_load(pairs);
        queue
    }

    /// Applies `pairs` in order with last-occurrence-wins, then rebuilds the
    /// tree from the index in one pass.
    pub fn bulk_load<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.index.insert(key, value);
        }
        self.tree = self
            .index
            .iter()
            .map(|(key, value)| Ranked::new(key.clone(), value.clone()))
            .collect();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.index.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.index.shrink_to_fit();
    }

    /// Number of entries in the ordered tree; always equal to `len()`.
    pub fn tree_len(&self) -> usize {
        self.tree.len()
    }

    /// Iterates over live `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.index.iter()
    }

    /// Iterates over live pairs in priority order without removing them.
    ///
    /// ```
    /// use keyqueue::ds::EagerTreeQueue;
    ///
    /// let queue: EagerTreeQueue<char, u8> = EagerTreeQueue::from_pairs([('x', 1), ('y', 3)]);
    /// let order: Vec<char> = queue.iter_ordered().map(|(k, _)| *k).collect();
    /// assert_eq!(order, vec!['y', 'x']);
    /// ```
    pub fn iter_ordered(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + '_ {
        self.tree.iter().map(Ranked::as_pair)
    }

    /// Consumes the queue into a vector in priority order.
    pub fn into_sorted_vec(self) -> Vec<(K, V)> {
        self.tree.into_iter().map(Ranked::into_pair).collect()
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.index.capacity() * std::mem::size_of::<(K, V)>()
            + self.tree.len() * std::mem::size_of::<Ranked<K, V, C>>()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> QueueMetricsSnapshot {
        self.metrics.snapshot(self.index.len(), self.tree.len())
    }
}

impl<K, V, C> AddressableQueue<K, V> for EagerTreeQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn top(&self) -> Result<(&K, &V), QueueError> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_top_call();

        self.tree
            .first()
            .map(Ranked::as_pair)
            .ok_or(QueueError::EmptyQueue)
    }

    fn pop(&mut self) -> Result<(K, V), QueueError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_call();

        let (key, value) = self
            .tree
            .pop_first()
            .map(Ranked::into_pair)
            .ok_or(QueueError::EmptyQueue)?;
        self.index.remove(&key);

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

        match self.index.get_mut(&key) {
            Some(current) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_update();

                if *current != value {
                    let old = std::mem::replace(current, value.clone());
                    self.tree.remove(&Ranked::new(key.clone(), old));
                    self.tree.insert(Ranked::new(key, value));
                }
                true
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_new();

                self.index.insert(key.clone(), value.clone());
                self.tree.insert(Ranked::new(key, value));
                false
            },
        }
    }

    fn erase(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_erase_call();

        let Some(old) = self.index.remove(key) else {
            return false;
        };
        self.tree.remove(&Ranked::new(key.clone(), old));

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
        self.tree.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.tree.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "tree holds {} entries for {} live keys",
                self.tree.len(),
                self.index.len()
            )));
        }
        for entry in &self.tree {
            if self.index.get(entry.key()) != Some(entry.value()) {
                return Err(InvariantError::new("tree entry does not match index"));
            }
        }
        Ok(())
    }
}

impl<K, V, C> Default for EagerTreeQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy with fresh counters.
impl<K, V, C> Clone for EagerTreeQueue<K, V, C>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            tree: self.tree.clone(),
            #[cfg(feature = "metrics")]
            metrics: QueueMetrics::default(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.index.clone_from(&source.index);
        self.tree.clone_from(&source.tree);
        #[cfg(feature = "metrics")]
        {
            self.metrics = QueueMetrics::default();
        }
    }
}

impl<K, V, C> fmt::Debug for EagerTreeQueue<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagerTreeQueue")
            .field("tree", &self.tree)
            .finish()
    }
}

impl<K, V, C> FromIterator<(K, V)> for EagerTreeQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K, V, C> Extend<(K, V)> for EagerTreeQueue<K, V, C>
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
impl<K, V, C> MetricsSnapshotProvider<QueueMetricsSnapshot> for EagerTreeQueue<K, V, C>
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
mod tests {
    use super::*;
    use crate::order::Less;

    fn scenario() -> EagerTreeQueue<i32, String> {
        EagerTreeQueue::from_pairs(
            [(0, "a"), (1, "z"), (2, "f"), (10, "axx"), (-2, "exh")]
                .into_iter()
                .map(|(k, v)| (k, v.to_string())),
        )
    }

    #[test]
    fn drains_string_scenario_in_priority_order() {
        let drained: Vec<(i32, String)> = scenario().into_sorted_vec();
        let keys: Vec<i32> = drained.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 2, -2, 10, 0]);
    }

    #[test]
    fn update_repositions_entry() {
        let mut queue = scenario();
        assert!(queue.insert_or_update(2, "zz".to_string()));
        assert_eq!(queue.peek(&2), Ok(&"zz".to_string()));
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.tree_len(), 5);
        assert_eq!(queue.top(), Ok((&2, &"zz".to_string())));
        queue.check_invariants().unwrap();
    }

    #[test]
    fn update_lowering_priority_moves_entry_down() {
        let mut queue = scenario();
        queue.insert_or_update(1, "0".to_string());
        let keys: Vec<i32> = queue.iter_ordered().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![2, -2, 10, 0, 1]);
    }

    #[test]
    fn erase_removes_from_both_structures() {
        let mut queue = scenario();
        assert!(queue.erase(&1));
        assert!(!queue.erase(&1));
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.tree_len(), 4);
        assert!(!queue.contains(&1));
        assert_eq!(queue.top(), Ok((&2, &"f".to_string())));
    }

    #[test]
    fn pop_removes_key_from_index() {
        let mut queue = scenario();
        assert_eq!(queue.pop(), Ok((1, "z".to_string())));
        assert_eq!(queue.peek(&1), Err(QueueError::KeyNotFound));
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn identical_update_reports_presence_and_keeps_size() {
        let mut queue: EagerTreeQueue<u8, u8> = EagerTreeQueue::new();
        assert!(!queue.insert_or_update(3, 3));
        assert!(queue.insert_or_update(3, 3));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.tree_len(), 1);
    }

    #[test]
    fn min_queue_with_less_relation() {
        let mut queue: EagerTreeQueue<u32, u32, Less> =
            EagerTreeQueue::from_pairs([(1, 30), (2, 10), (3, 20)]);
        assert_eq!(queue.pop(), Ok((2, 10)));
        assert_eq!(queue.pop(), Ok((3, 20)));
        assert_eq!(queue.pop(), Ok((1, 30)));
        assert_eq!(queue.pop(), Err(QueueError::EmptyQueue));
    }

    #[test]
    fn ties_pop_in_ascending_key_order() {
        let queue: EagerTreeQueue<u32, u32> = [(9, 1), (4, 1), (6, 1)].into_iter().collect();
        assert_eq!(queue.into_sorted_vec(), vec![(4, 1), (6, 1), (9, 1)]);
    }

    #[test]
    fn bulk_load_last_occurrence_wins() {
        let queue: EagerTreeQueue<u32, u32> =
            EagerTreeQueue::from_pairs([(1, 10), (2, 20), (1, 0)]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.tree_len(), 2);
        assert_eq!(queue.top(), Ok((&2, &20)));
        queue.check_invariants().unwrap();
    }

    #[test]
    fn empty_queue_errors() {
        let queue: EagerTreeQueue<u32, u32> = EagerTreeQueue::default();
        assert_eq!(queue.top(), Err(QueueError::EmptyQueue));
        assert_eq!(queue.peek(&0), Err(QueueError::KeyNotFound));
    }

    #[test]
    fn clone_is_independent() {
        let original = scenario();
        let mut copy = original.clone();
        copy.insert_or_update(0, "zzz".to_string());
        copy.erase(&1);

        assert_eq!(original.peek(&0), Ok(&"a".to_string()));
        assert!(original.contains(&1));
        assert_eq!(copy.top(), Ok((&0, &"zzz".to_string())));
    }

    #[test]
    fn mutating_original_leaves_clone_untouched() {
        let mut original = scenario();
        let copy = original.clone();

        original.insert_or_update(0, "zzz".to_string());
        original.erase(&2);
        original.insert_or_update(7, "q".to_string());
        assert_eq!(original.pop(), Ok((0, "zzz".to_string())));

        assert_eq!(copy.len(), 5);
        assert_eq!(copy.peek(&0), Ok(&"a".to_string()));
        assert!(copy.contains(&2));
        assert!(!copy.contains(&7));
        let keys: Vec<i32> = copy.into_sorted_vec().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![1, 2, -2, 10, 0]);
    }

    #[test]
    fn clone_from_replaces_contents() {
        let source = scenario();
        let mut target: EagerTreeQueue<i32, String> =
            EagerTreeQueue::from_pairs([(99, "old".to_string())]);

        target.clone_from(&source);
        assert_eq!(target.len(), 5);
        assert_eq!(target.tree_len(), 5);
        assert!(!target.contains(&99));
        assert_eq!(target.top(), Ok((&1, &"z".to_string())));
        target.check_invariants().unwrap();
    }

    #[test]
    fn reflexive_custom_value_type() {
        /// Deadline in whole milliseconds; equality is total.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
        struct DeadlineMs(u64);

        let mut queue: EagerTreeQueue<&str, DeadlineMs, Less> = EagerTreeQueue::new();
        queue.insert_or_update("flush", DeadlineMs(40));
        queue.insert_or_update("sync", DeadlineMs(15));
        assert!(queue.insert_or_update("flush", DeadlineMs(40)));
        assert_eq!(queue.tree_len(), 2);
        assert_eq!(queue.pop(), Ok(("sync", DeadlineMs(15))));
        assert_eq!(queue.pop(), Ok(("flush", DeadlineMs(40))));
    }

    #[test]
    fn clear_empties_queue() {
        let mut queue = scenario();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.tree_len(), 0);
    }

    #[test]
    fn check_invariants_detects_divergence() {
        let mut queue = scenario();
        queue.index.insert(1, "changed".to_string());
        assert!(queue.check_invariants().is_err());
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_never_report_stale_entries() {
        let mut queue: EagerTreeQueue<u32, u32> = EagerTreeQueue::new();
        queue.insert_or_update(1, 1);
        queue.insert_or_update(1, 5);
        queue.erase(&2);
        let _ = queue.pop();

        let snapshot = queue.metrics_snapshot();
        assert_eq!(snapshot.insert_new, 1);
        assert_eq!(snapshot.insert_updates, 1);
        assert_eq!(snapshot.erase_calls, 1);
        assert_eq!(snapshot.erase_found, 0);
        assert_eq!(snapshot.pop_found, 1);
        assert_eq!(snapshot.stale_reaped, 0);
        assert_eq!(snapshot.stale_entries(), 0);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn clone_from_resets_metrics_like_clone() {
        let source: EagerTreeQueue<u32, u32> = EagerTreeQueue::from_pairs([(1, 1)]);
        let mut target: EagerTreeQueue<u32, u32> = EagerTreeQueue::new();
        target.insert_or_update(5, 5);
        target.erase(&5);

        target.clone_from(&source);
        let snapshot = target.metrics_snapshot();
        assert_eq!(snapshot, source.clone().metrics_snapshot());
        assert_eq!(snapshot.clears, 0);
        assert_eq!(snapshot.insert_calls, 0);
        assert_eq!(snapshot.len, 1);
    }
}
