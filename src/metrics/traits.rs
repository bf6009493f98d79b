//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are separate concerns:
//!
//! ```text
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │   QueueMetricsRecorder       │    │   QueueMetricsReadRecorder   │
//!   │   (&mut self, mutations)     │    │   (&self, read path)         │
//!   │   insert/erase/pop/reap      │    │   top/peek/contains          │
//!   └──────────────┬───────────────┘    └──────────────┬───────────────┘
//!                  │                                   │
//!                  └─────────────┬─────────────────────┘
//!                                ▼
//!                  ┌──────────────────────────────┐
//!                  │        QueueMetrics          │
//!                  └──────────────┬───────────────┘
//!                                 │
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters written by mutating queue operations.
pub trait QueueMetricsRecorder {
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_erase_call(&mut self);
    fn record_erase_found(&mut self);
    fn record_pop_call(&mut self);
    fn record_pop_found(&mut self);
    /// A stale backing entry was discarded during lazy cleanup.
    fn record_stale_reaped(&mut self);
    /// The backing heap was rebuilt from the index.
    fn record_compaction(&mut self);
    fn record_clear(&mut self);
}

/// Read-only counters for `&self` methods (uses interior mutability).
pub trait QueueMetricsReadRecorder {
    fn record_top_call(&self);
    fn record_peek_call(&self);
    fn record_peek_found(&self);
    fn record_contains_call(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
