//! Error types for the keyqueue library.
//!
//! ## Key Components
//!
//! - [`QueueError`]: Returned when an operation's precondition does not hold
//!   (empty queue, absent key, moved-from handle). The queue is never
//!   modified by a failing call.
//! - [`InvariantError`]: Returned by `check_invariants` when the index and the
//!   ordered view disagree.
//! - [`ConfigError`]: Returned when builder parameters are invalid.
//!
//! ## Example Usage
//!
//! ```
//! use keyqueue::error::QueueError;
//! use keyqueue::PriorityQueue;
//!
//! let mut queue: PriorityQueue<u32, u32> = PriorityQueue::new();
//! assert_eq!(queue.pop(), Err(QueueError::EmptyQueue));
//! assert_eq!(queue.peek(&7), Err(QueueError::KeyNotFound));
//!
//! let moved = queue.take().unwrap();
//! assert_eq!(queue.len(), Err(QueueError::InvalidHandle));
//! assert_eq!(moved.len(), Ok(0));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// QueueError
// ---------------------------------------------------------------------------

/// Precondition violations reported by queue operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueError {
    /// `top` or `pop` on a queue with no entries.
    EmptyQueue,
    /// `peek` with a key that is not in the queue.
    KeyNotFound,
    /// Any operation on a handle whose contents were moved out with `take`.
    InvalidHandle,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::EmptyQueue => f.write_str("queue is empty"),
            QueueError::KeyNotFound => f.write_str("key not found in queue"),
            QueueError::InvalidHandle => f.write_str("queue handle has been moved from"),
        }
    }
}

impl std::error::Error for QueueError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// A queue's key index and its ordered structure have drifted apart.
///
/// Returned by `check_invariants`. The message names the broken relation,
/// e.g. `"heap top is stale"` when a lazy heap exposes an entry that no
/// longer matches the index, or `"tree holds 4 entries for 3 live keys"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue invariant violated: {}", self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Builder settings that [`QueueBuilder::validate`](crate::builder::QueueBuilder::validate)
/// rejects: a zero compaction factor, or a compaction factor on the
/// eager-tree strategy.
///
/// ```
/// use keyqueue::builder::{QueueBuilder, Strategy};
///
/// let err = QueueBuilder::new()
///     .strategy(Strategy::EagerTree)
///     .compaction_factor(2)
///     .validate()
///     .unwrap_err();
/// assert_eq!(err.message(), "compaction factor only applies to the lazy-heap strategy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid queue configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}
