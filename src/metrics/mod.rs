//! Optional operation counters for queue strategies.
//!
//! Enabled with the `metrics` cargo feature. Recording, snapshotting and
//! exporting are split into separate traits (see [`traits`]) so strategies
//! only ever write counters.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::QueueMetrics;
pub use snapshot::QueueMetricsSnapshot;
pub use traits::{
    MetricsExporter, MetricsSnapshotProvider, QueueMetricsReadRecorder, QueueMetricsRecorder,
};
