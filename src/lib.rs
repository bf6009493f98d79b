//! keyqueue: addressable priority queues with in-place priority updates.
//!
//! Two interchangeable strategies sit behind one [`PriorityQueue`] handle:
//! a binary heap with lazily reaped stale entries and an exact ordered tree.
//! See `DESIGN.md` for internal architecture and invariants.

pub mod builder;
pub mod ds;
pub mod error;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod order;
pub mod prelude;
pub mod queue;
pub mod traits;

pub use crate::builder::{QueueBuilder, Strategy};
pub use crate::error::QueueError;
pub use crate::queue::PriorityQueue;
