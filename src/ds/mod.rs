pub mod eager_tree;
pub mod lazy_heap;

pub use eager_tree::EagerTreeQueue;
pub use lazy_heap::{DEFAULT_COMPACTION_FACTOR, LazyHeapQueue};
