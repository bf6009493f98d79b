//! Queue builder and strategy selection.
//!
//! Picks one of the two strategies at construction time and hands back a
//! [`PriorityQueue`] handle that hides which one it holds.
//!
//! ## Example
//!
//! ```rust
//! use keyqueue::builder::{QueueBuilder, Strategy};
//! use keyqueue::PriorityQueue;
//!
//! let mut queue: PriorityQueue<u64, String> = QueueBuilder::new()
//!     .strategy(Strategy::EagerTree)
//!     .capacity(100)
//!     .build();
//! queue.insert_or_update(1, "hello".to_string()).unwrap();
//! assert_eq!(queue.peek(&1), Ok(&"hello".to_string()));
//! assert_eq!(queue.strategy(), Ok(Strategy::EagerTree));
//! ```

use std::hash::Hash;

use crate::ds::{DEFAULT_COMPACTION_FACTOR, EagerTreeQueue, LazyHeapQueue};
use crate::error::ConfigError;
use crate::order::Compare;
use crate::queue::PriorityQueue;

/// Available queue strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Binary heap with lazily reaped stale entries (cheaper updates).
    #[default]
    LazyHeap,
    /// Balanced ordered set kept exactly in sync (no stale entries).
    EagerTree,
}

/// Builder for creating queue instances.
#[derive(Debug, Clone, Default)]
pub struct QueueBuilder {
    strategy: Strategy,
    capacity: usize,
    compaction: Option<usize>,
    compaction_disabled: bool,
}

impl QueueBuilder {
    /// Create a builder for the default lazy-heap strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the backing strategy.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Pre-allocate room for `capacity` keys. The queue still grows past it.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Rebuild the lazy heap once it holds more than `factor` entries per
    /// live key. Defaults to [`DEFAULT_COMPACTION_FACTOR`].
    pub fn compaction_factor(mut self, factor: usize) -> Self {
        self.compaction = Some(factor);
        self.compaction_disabled = false;
        self
    }

    /// Never rebuild the lazy heap automatically.
    pub fn without_compaction(mut self) -> Self {
        self.compaction = None;
        self.compaction_disabled = true;
        self
    }

    /// Checks the configuration without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.strategy, self.compaction) {
            (_, Some(0)) => Err(ConfigError::new("compaction factor must be > 0")),
            (Strategy::EagerTree, Some(_)) => Err(ConfigError::new(
                "compaction factor only applies to the lazy-heap strategy",
            )),
            _ => Ok(()),
        }
    }

    /// Build an empty queue, rejecting invalid configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyqueue::builder::{QueueBuilder, Strategy};
    /// use keyqueue::order::Less;
    /// use keyqueue::PriorityQueue;
    ///
    /// let queue: Result<PriorityQueue<u32, u32, Less>, _> =
    ///     QueueBuilder::new().compaction_factor(8).try_build();
    /// assert!(queue.is_ok());
    ///
    /// let bad: Result<PriorityQueue<u32, u32>, _> = QueueBuilder::new()
    ///     .strategy(Strategy::EagerTree)
    ///     .compaction_factor(8)
    ///     .try_build();
    /// assert!(bad.is_err());
    /// ```
    pub fn try_build<K, V, C>(self) -> Result<PriorityQueue<K, V, C>, ConfigError>
    where
        K: Eq + Hash + Ord + Clone,
        V: Eq + Clone,
        C: Compare<V>,
    {
        self.try_build_from(std::iter::empty())
    }

    /// Bulk-load `pairs`, rejecting invalid configuration.
    pub fn try_build_from<K, V, C, I>(self, pairs: I) -> Result<PriorityQueue<K, V, C>, ConfigError>
    where
        K: Eq + Hash + Ord + Clone,
        V: Eq + Clone,
        C: Compare<V>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.validate()?;
        Ok(self.build_from(pairs))
    }

    /// Build an empty queue.
    ///
    /// Invalid settings are normalised instead of rejected: a zero
    /// compaction factor becomes `1`, and compaction is ignored for the
    /// eager-tree strategy.
    pub fn build<K, V, C>(self) -> PriorityQueue<K, V, C>
    where
        K: Eq + Hash + Ord + Clone,
        V: Eq + Clone,
        C: Compare<V>,
    {
        self.build_from(std::iter::empty())
    }

    /// Build a queue bulk-loaded from `pairs` (last occurrence of a key wins).
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyqueue::builder::QueueBuilder;
    /// use keyqueue::PriorityQueue;
    ///
    /// let queue: PriorityQueue<i32, &str> =
    ///     QueueBuilder::new().build_from([(0, "a"), (1, "z"), (0, "q")]);
    /// assert_eq!(queue.len(), Ok(2));
    /// assert_eq!(queue.peek(&0), Ok(&"q"));
    /// assert_eq!(queue.top(), Ok((&1, &"z")));
    /// ```
    pub fn build_from<K, V, C, I>(self, pairs: I) -> PriorityQueue<K, V, C>
    where
        K: Eq + Hash + Ord + Clone,
        V: Eq + Clone,
        C: Compare<V>,
        I: IntoIterator<Item = (K, V)>,
    {
        match self.strategy {
            Strategy::LazyHeap => {
                let mut queue = LazyHeapQueue::with_capacity(self.capacity);
                queue.set_compaction_factor(self.lazy_compaction());
                queue.bulk_load(pairs);
                PriorityQueue::from(queue)
            },
            Strategy::EagerTree => {
                let mut queue = EagerTreeQueue::with_capacity(self.capacity);
                queue.bulk_load(pairs);
                PriorityQueue::from(queue)
            },
        }
    }

    fn lazy_compaction(&self) -> Option<usize> {
        if self.compaction_disabled {
            None
        } else {
            Some(self.compaction.unwrap_or(DEFAULT_COMPACTION_FACTOR).max(1))
        }
    }
}
