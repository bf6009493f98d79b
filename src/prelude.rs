pub use crate::builder::{QueueBuilder, Strategy};
pub use crate::ds::{DEFAULT_COMPACTION_FACTOR, EagerTreeQueue, LazyHeapQueue};
pub use crate::error::{ConfigError, InvariantError, QueueError};
pub use crate::order::{Compare, Greater, Less};
pub use crate::queue::PriorityQueue;
pub use crate::traits::AddressableQueue;

#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::QueueMetricsSnapshot;
