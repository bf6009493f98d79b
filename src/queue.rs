//! Owning priority queue handle.
//!
//! [`PriorityQueue`] owns one strategy instance and forwards every operation
//! to it through [`AddressableQueue`]. Ownership can be moved out explicitly
//! with [`take`](PriorityQueue::take); the source then reports
//! [`QueueError::InvalidHandle`] for every operation instead of aliasing the
//! moved contents.
//!
//! ```text
//!   PriorityQueue { inner }
//!        │
//!        ├── Inner::LazyHeap(LazyHeapQueue)   ──┐
//!        ├── Inner::EagerTree(EagerTreeQueue) ──┴─► &dyn AddressableQueue<K, V>
//!        └── Inner::Moved                     ───► Err(InvalidHandle)
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use keyqueue::builder::Strategy;
//! use keyqueue::PriorityQueue;
//!
//! let mut queue: PriorityQueue<i32, &str> =
//!     PriorityQueue::from_pairs_with(Strategy::EagerTree, [(0, "a"), (1, "z"), (2, "f")]);
//!
//! let copy = queue.clone();
//! queue.insert_or_update(2, "zz").unwrap();
//! assert_eq!(queue.top(), Ok((&2, &"zz")));
//! assert_eq!(copy.top(), Ok((&1, &"z")));
//!
//! let owner = queue.take().unwrap();
//! assert!(!queue.is_valid());
//! assert_eq!(owner.len(), Ok(3));
//! ```
use std::collections::hash_map;
use std::fmt;
use std::hash::Hash;

use crate::builder::Strategy;
use crate::ds::{EagerTreeQueue, LazyHeapQueue};
use crate::error::{InvariantError, QueueError};
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::QueueMetricsSnapshot;
use crate::order::{Compare, Greater};
use crate::traits::AddressableQueue;

enum Inner<K, V, C> {
    LazyHeap(LazyHeapQueue<K, V, C>),
    EagerTree(EagerTreeQueue<K, V, C>),
    Moved,
}

/// Addressable priority queue that owns its strategy.
///
/// Defaults to the lazy-heap strategy and the [`Greater`] relation
/// (largest value first, ties by ascending key).
pub struct PriorityQueue<K, V, C = Greater> {
    inner: Inner<K, V, C>,
}

impl<K, V, C> PriorityQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    /// Creates an empty lazy-heap queue.
    pub fn new() -> Self {
        Self::with_strategy(Strategy::default())
    }

    /// Creates an empty queue backed by `strategy`.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self::from_pairs_with(strategy, std::iter::empty())
    }

    /// Builds a lazy-heap queue from `pairs`; the last occurrence of a
    /// duplicate key wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs_with(Strategy::default(), pairs)
    }

    /// Builds a queue backed by `strategy` from `pairs`.
    pub fn from_pairs_with<I>(strategy: Strategy, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        match strategy {
            Strategy::LazyHeap => Self::from(LazyHeapQueue::from_pairs(pairs)),
            Strategy::EagerTree => Self::from(EagerTreeQueue::from_pairs(pairs)),
        }
    }

    /// Returns `false` once the contents have been moved out with `take`.
    pub fn is_valid(&self) -> bool {
        !matches!(self.inner, Inner::Moved)
    }

    /// Returns the strategy backing this handle.
    pub fn strategy(&self) -> Result<Strategy, QueueError> {
        match self.inner {
            Inner::LazyHeap(_) => Ok(Strategy::LazyHeap),
            Inner::EagerTree(_) => Ok(Strategy::EagerTree),
            Inner::Moved => Err(QueueError::InvalidHandle),
        }
    }

    /// Moves the contents into a new handle and leaves `self` invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use keyqueue::error::QueueError;
    /// use keyqueue::PriorityQueue;
    ///
    /// let mut source: PriorityQueue<u8, u8> = PriorityQueue::from_pairs([(1, 1)]);
    /// let target = source.take().unwrap();
    ///
    /// assert_eq!(target.top(), Ok((&1, &1)));
    /// assert_eq!(source.top(), Err(QueueError::InvalidHandle));
    /// assert_eq!(source.take().err(), Some(QueueError::InvalidHandle));
    /// ```
    pub fn take(&mut self) -> Result<Self, QueueError> {
        match std::mem::replace(&mut self.inner, Inner::Moved) {
            Inner::Moved => Err(QueueError::InvalidHandle),
            inner => Ok(Self { inner }),
        }
    }

    /// Deep copy that reports an invalid source instead of copying it.
    pub fn try_clone(&self) -> Result<Self, QueueError> {
        match &self.inner {
            Inner::LazyHeap(queue) => Ok(Self::from(queue.clone())),
            Inner::EagerTree(queue) => Ok(Self::from(queue.clone())),
            Inner::Moved => Err(QueueError::InvalidHandle),
        }
    }

    pub fn top(&self) -> Result<(&K, &V), QueueError> {
        self.backend()?.top()
    }

    pub fn pop(&mut self) -> Result<(K, V), QueueError> {
        self.backend_mut()?.pop()
    }

    pub fn len(&self) -> Result<usize, QueueError> {
        Ok(self.backend()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, QueueError> {
        Ok(self.backend()?.is_empty())
    }

    /// Sets `key`'s value, inserting it if absent. Returns whether the key
    /// was already present.
    pub fn insert_or_update(&mut self, key: K, value: V) -> Result<bool, QueueError> {
        Ok(self.backend_mut()?.insert_or_update(key, value))
    }

    /// Removes `key`; returns whether it was present.
    pub fn erase(&mut self, key: &K) -> Result<bool, QueueError> {
        Ok(self.backend_mut()?.erase(key))
    }

    pub fn contains(&self, key: &K) -> Result<bool, QueueError> {
        Ok(self.backend()?.contains(key))
    }

    pub fn peek(&self, key: &K) -> Result<&V, QueueError> {
        self.backend()?.peek(key)
    }

    pub fn clear(&mut self) -> Result<(), QueueError> {
        self.backend_mut()?.clear();
        Ok(())
    }

    /// Iterates over live `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> Result<hash_map::Iter<'_, K, V>, QueueError> {
        match &self.inner {
            Inner::LazyHeap(queue) => Ok(queue.iter()),
            Inner::EagerTree(queue) => Ok(queue.iter()),
            Inner::Moved => Err(QueueError::InvalidHandle),
        }
    }

    /// Drains the queue into a vector in priority order.
    pub fn into_sorted_vec(self) -> Result<Vec<(K, V)>, QueueError> {
        match self.inner {
            Inner::LazyHeap(queue) => Ok(queue.into_sorted_vec()),
            Inner::EagerTree(queue) => Ok(queue.into_sorted_vec()),
            Inner::Moved => Err(QueueError::InvalidHandle),
        }
    }

    pub fn approx_bytes(&self) -> Result<usize, QueueError> {
        match &self.inner {
            Inner::LazyHeap(queue) => Ok(queue.approx_bytes()),
            Inner::EagerTree(queue) => Ok(queue.approx_bytes()),
            Inner::Moved => Err(QueueError::InvalidHandle),
        }
    }

    /// Checks the backing strategy. A moved-from handle holds nothing and
    /// passes trivially.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match self.backend() {
            Ok(queue) => queue.check_invariants(),
            Err(_) => Ok(()),
        }
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> Result<QueueMetricsSnapshot, QueueError> {
        match &self.inner {
            Inner::LazyHeap(queue) => Ok(queue.metrics_snapshot()),
            Inner::EagerTree(queue) => Ok(queue.metrics_snapshot()),
            Inner::Moved => Err(QueueError::InvalidHandle),
        }
    }

    fn backend(&self) -> Result<&dyn AddressableQueue<K, V>, QueueError> {
        match &self.inner {
            Inner::LazyHeap(queue) => Ok(queue as &dyn AddressableQueue<K, V>),
            Inner::EagerTree(queue) => Ok(queue as &dyn AddressableQueue<K, V>),
            Inner::Moved => Err(QueueError::InvalidHandle),
        }
    }

    fn backend_mut(&mut self) -> Result<&mut dyn AddressableQueue<K, V>, QueueError> {
        match &mut self.inner {
            Inner::LazyHeap(queue) => Ok(queue as &mut dyn AddressableQueue<K, V>),
            Inner::EagerTree(queue) => Ok(queue as &mut dyn AddressableQueue<K, V>),
            Inner::Moved => Err(QueueError::InvalidHandle),
        }
    }
}

impl<K, V, C> Default for PriorityQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy; copying a moved-from handle yields another moved-from handle.
impl<K, V, C> Clone for PriorityQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or(Self { inner: Inner::Moved })
    }

    fn clone_from(&mut self, source: &Self) {
        match (&mut self.inner, &source.inner) {
            (Inner::LazyHeap(target), Inner::LazyHeap(from)) => target.clone_from(from),
            (Inner::EagerTree(target), Inner::EagerTree(from)) => target.clone_from(from),
            _ => *self = source.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for PriorityQueue<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::LazyHeap(queue) => f.debug_tuple("PriorityQueue").field(queue).finish(),
            Inner::EagerTree(queue) => f.debug_tuple("PriorityQueue").field(queue).finish(),
            Inner::Moved => f.write_str("PriorityQueue(<moved>)"),
        }
    }
}

impl<K, V, C> From<LazyHeapQueue<K, V, C>> for PriorityQueue<K, V, C> {
    fn from(queue: LazyHeapQueue<K, V, C>) -> Self {
        Self {
            inner: Inner::LazyHeap(queue),
        }
    }
}

impl<K, V, C> From<EagerTreeQueue<K, V, C>> for PriorityQueue<K, V, C> {
    fn from(queue: EagerTreeQueue<K, V, C>) -> Self {
        Self {
            inner: Inner::EagerTree(queue),
        }
    }
}

impl<K, V, C> FromIterator<(K, V)> for PriorityQueue<K, V, C>
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
