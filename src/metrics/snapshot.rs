/// Point-in-time copy of a queue's counters and size gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueMetricsSnapshot {
    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,

    pub erase_calls: u64,
    pub erase_found: u64,

    pub pop_calls: u64,
    pub pop_found: u64,

    pub stale_reaped: u64, // heap entries discarded because the index moved on
    pub compactions: u64,
    pub clears: u64,

    pub top_calls: u64,
    pub peek_calls: u64,
    pub peek_found: u64,
    pub contains_calls: u64,

    // gauges captured at snapshot time
    pub len: usize,
    pub backing_len: usize,
}

impl QueueMetricsSnapshot {
    /// Backing entries that no longer correspond to a live key.
    ///
    /// Always zero for the eager-tree strategy.
    pub fn stale_entries(&self) -> usize {
        self.backing_len.saturating_sub(self.len)
    }
}
