//! Observation points of the remote storage engine
//!
//! Components receive a `StorageMetrics` reference instead of reaching for
//! process-wide collectors. Implementations must tolerate concurrent calls
//! from parallel write invocations.

use std::time::Duration;

pub trait StorageMetrics: Send + Sync {
    /// A sample was dropped because its value is not finite
    fn sample_ignored(&self);

    /// Samples seen for one series before filtering
    fn records_fetched(&self, count: u64);

    /// Duration of one warehouse insertion call
    fn observe_batch_write(&self, elapsed: Duration);

    /// One query was sent to the warehouse
    fn query_executed(&self);

    /// Duration of one warehouse query call
    fn observe_query(&self, elapsed: Duration);
}

/// Sink that drops every observation
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl StorageMetrics for NoopMetrics {
    fn sample_ignored(&self) {}
    fn records_fetched(&self, _count: u64) {}
    fn observe_batch_write(&self, _elapsed: Duration) {}
    fn query_executed(&self) {}
    fn observe_query(&self, _elapsed: Duration) {}
}

#[cfg(test)]
pub(crate) use recording::RecordingMetrics;
