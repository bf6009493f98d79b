//! # Queue Trait
//!
//! The contract shared by every addressable priority queue strategy. The
//! owning [`PriorityQueue`](crate::queue::PriorityQueue) handle forwards to a
//! `dyn AddressableQueue`, so any strategy that honours this trait can sit
//! behind it.
//!
//! ## Architecture
//!
//! ```text
//!                   ┌─────────────────────────────────────────┐
//!                   │        AddressableQueue<K, V>           │
//!                   │                                         │
//!                   │  top(&)              → (&K, &V)         │
//!                   │  pop(&mut)           → (K, V)           │
//!                   │  len(&) / is_empty(&)                   │
//!                   │  insert_or_update(&mut, K, V) → bool    │
//!                   │  erase(&mut, &K)     → bool             │
//!                   │  contains(&, &K)     → bool             │
//!                   │  peek(&, &K)         → &V               │
//!                   │  clear(&mut)                            │
//!                   │  check_invariants(&)                    │
//!                   └──────────────────┬──────────────────────┘
//!                                      │
//!                ┌─────────────────────┴─────────────────────┐
//!                ▼                                           ▼
//!   ┌────────────────────────────┐            ┌────────────────────────────┐
//!   │  LazyHeapQueue<K, V, C>    │            │  EagerTreeQueue<K, V, C>   │
//!   │  BinaryHeap + index        │            │  BTreeSet + index          │
//!   │  stale entries reaped      │            │  always exact              │
//!   │  lazily                    │            │                            │
//!   └────────────────────────────┘            └────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! After every call returns, for every implementation:
//!
//! - each key in the queue is extractable exactly once via `top`/`pop`, with
//!   its current value;
//! - `len()` equals the number of distinct keys;
//! - `top()` is the first entry under the [ordering rule](crate::order), and
//!   draining with `pop()` yields entries in that order.
//!
//! Failing calls return a [`QueueError`] and leave the queue untouched.

use crate::error::{InvariantError, QueueError};

/// Keyed priority queue operations.
///
/// # Example
///
/// ```
/// use keyqueue::ds::{EagerTreeQueue, LazyHeapQueue};
/// use keyqueue::traits::AddressableQueue;
///
/// fn schedule<Q: AddressableQueue<&'static str, u32>>(queue: &mut Q) -> Vec<&'static str> {
///     queue.insert_or_update("build", 3);
///     queue.insert_or_update("test", 5);
///     queue.insert_or_update("deploy", 1);
///     queue.insert_or_update("build", 9);
///     queue.erase(&"deploy");
///
///     let mut order = Vec::new();
///     while let Ok((task, _)) = queue.pop() {
///         order.push(task);
///     }
///     order
/// }
///
/// let mut lazy: LazyHeapQueue<&str, u32> = LazyHeapQueue::new();
/// let mut eager: EagerTreeQueue<&str, u32> = EagerTreeQueue::new();
/// assert_eq!(schedule(&mut lazy), vec!["build", "test"]);
/// assert_eq!(schedule(&mut eager), vec!["build", "test"]);
/// ```
pub trait AddressableQueue<K, V> {
    /// Returns the highest-priority entry.
    ///
    /// Fails with [`QueueError::EmptyQueue`] when the queue has no entries.
    fn top(&self) -> Result<(&K, &V), QueueError>;

    /// Removes and returns the highest-priority entry.
    ///
    /// Fails with [`QueueError::EmptyQueue`] when the queue has no entries.
    fn pop(&mut self) -> Result<(K, V), QueueError>;

    /// Returns the number of distinct keys.
    fn len(&self) -> usize;

    /// Returns `true` if the queue holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sets `key`'s value, inserting the key if it is absent.
    ///
    /// Returns `true` if the key was already present.
    fn insert_or_update(&mut self, key: K, value: V) -> bool;

    /// Removes `key` and returns `true` if it was present.
    fn erase(&mut self, key: &K) -> bool;

    /// Returns `true` if `key` is in the queue.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current value of `key`.
    ///
    /// Fails with [`QueueError::KeyNotFound`] when the key is absent.
    fn peek(&self, key: &K) -> Result<&V, QueueError>;

    /// Removes every entry.
    fn clear(&mut self);

    /// Verifies that the index and the ordered view agree.
    fn check_invariants(&self) -> Result<(), InvariantError>;
}
