use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::QueueMetricsSnapshot;
use crate::metrics::traits::{QueueMetricsReadRecorder, QueueMetricsRecorder};

#[derive(Debug, Default, Clone)]
pub struct QueueMetrics {
    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub erase_calls: u64,
    pub erase_found: u64,
    pub pop_calls: u64,
    pub pop_found: u64,
    pub stale_reaped: u64,
    pub compactions: u64,
    pub clears: u64,
    pub top_calls: MetricsCell,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
    pub contains_calls: MetricsCell,
}

impl QueueMetrics {
    pub fn new() -> QueueMetrics {
        QueueMetrics::default()
    }

    /// Copies the counters and attaches the given size gauges.
    pub fn snapshot(&self, len: usize, backing_len: usize) -> QueueMetricsSnapshot {
        QueueMetricsSnapshot {
            insert_calls: self.insert_calls,
            insert_new: self.insert_new,
            insert_updates: self.insert_updates,
            erase_calls: self.erase_calls,
            erase_found: self.erase_found,
            pop_calls: self.pop_calls,
            pop_found: self.pop_found,
            stale_reaped: self.stale_reaped,
            compactions: self.compactions,
            clears: self.clears,
            top_calls: self.top_calls.get(),
            peek_calls: self.peek_calls.get(),
            peek_found: self.peek_found.get(),
            contains_calls: self.contains_calls.get(),
            len,
            backing_len,
        }
    }
}

impl QueueMetricsRecorder for QueueMetrics {
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_erase_call(&mut self) {
        self.erase_calls += 1;
    }

    fn record_erase_found(&mut self) {
        self.erase_found += 1;
    }

    fn record_pop_call(&mut self) {
        self.pop_calls += 1;
    }

    fn record_pop_found(&mut self) {
        self.pop_found += 1;
    }

    fn record_stale_reaped(&mut self) {
        self.stale_reaped += 1;
    }

    fn record_compaction(&mut self) {
        self.compactions += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl QueueMetricsReadRecorder for &QueueMetrics {
    fn record_top_call(&self) {
        self.top_calls.incr();
    }

    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }

    fn record_contains_call(&self) {
        self.contains_calls.incr();
    }
}
