//! Process metrics registry
//!
//! Owns every Prometheus collector the bridge exports. The storage half is
//! handed to the remote-storage engine as a `StorageMetrics` sink, the
//! transport half is driven by the HTTP handlers.

use std::time::Duration;

use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

use super::constants::METRICS_NAMESPACE;
use crate::domain::remote::StorageMetrics;

const REMOTE_LABEL: &str = "remote";

/// Prometheus collectors for storage and transport
pub struct Telemetry {
    registry: Registry,

    // Storage
    ignored_samples: IntCounter,
    records_fetched: IntCounter,
    batch_write_duration: Histogram,
    sql_query_count: IntCounter,
    sql_query_duration: Histogram,

    // Transport
    received_samples: IntCounter,
    sent_samples: IntCounterVec,
    failed_samples: IntCounterVec,
    sent_batch_duration: HistogramVec,
    write_errors: IntCounter,
    read_errors: IntCounter,
    write_api_seconds: HistogramVec,
    read_api_seconds: HistogramVec,
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let counter = IntCounter::with_opts(Opts::new(name, help).namespace(METRICS_NAMESPACE))?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

fn counter_vec(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounterVec> {
    let counter = IntCounterVec::new(
        Opts::new(name, help).namespace(METRICS_NAMESPACE),
        &[REMOTE_LABEL],
    )?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

fn histogram(registry: &Registry, name: &str, help: &str) -> prometheus::Result<Histogram> {
    let histogram =
        Histogram::with_opts(HistogramOpts::new(name, help).namespace(METRICS_NAMESPACE))?;
    registry.register(Box::new(histogram.clone()))?;
    Ok(histogram)
}

fn histogram_vec(registry: &Registry, name: &str, help: &str) -> prometheus::Result<HistogramVec> {
    let histogram = HistogramVec::new(
        HistogramOpts::new(name, help).namespace(METRICS_NAMESPACE),
        &[REMOTE_LABEL],
    )?;
    registry.register(Box::new(histogram.clone()))?;
    Ok(histogram)
}

impl Telemetry {
    /// Build a fresh registry with every collector registered
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        Ok(Self {
            ignored_samples: counter(
                &registry,
                "ignored_samples_total",
                "The total number of samples not sent to the warehouse due to unsupported float values (Inf, -Inf, NaN).",
            )?,
            records_fetched: counter(
                &registry,
                "records_fetched_total",
                "Total number of samples handed to the batch writer before filtering.",
            )?,
            batch_write_duration: histogram(
                &registry,
                "batch_write_duration_seconds",
                "Duration of warehouse insertion calls.",
            )?,
            sql_query_count: counter(
                &registry,
                "sql_query_count_total",
                "Total number of SQL queries executed against the warehouse.",
            )?,
            sql_query_duration: histogram(
                &registry,
                "sql_query_duration_seconds",
                "Duration of SQL queries executed against the warehouse.",
            )?,
            received_samples: counter(
                &registry,
                "received_samples_total",
                "Total number of received samples.",
            )?,
            sent_samples: counter_vec(
                &registry,
                "sent_samples_total",
                "Total number of processed samples sent to remote storage.",
            )?,
            failed_samples: counter_vec(
                &registry,
                "failed_samples_total",
                "Total number of processed samples which failed on send to remote storage.",
            )?,
            sent_batch_duration: histogram_vec(
                &registry,
                "sent_batch_duration_seconds",
                "Duration of sample batch send calls to the remote storage.",
            )?,
            write_errors: counter(
                &registry,
                "write_errors_total",
                "Total number of write errors to the warehouse.",
            )?,
            read_errors: counter(
                &registry,
                "read_errors_total",
                "Total number of read errors from the warehouse.",
            )?,
            write_api_seconds: histogram_vec(
                &registry,
                "write_api_seconds",
                "Duration of the write api processing.",
            )?,
            read_api_seconds: histogram_vec(
                &registry,
                "read_api_seconds",
                "Duration of the read api processing.",
            )?,
            registry,
        })
    }

    /// Text exposition of every registered collector
    pub fn render(&self) -> prometheus::Result<String> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }

    pub fn samples_received(&self, count: u64) {
        self.received_samples.inc_by(count);
    }

    /// One writer accepted a batch
    pub fn batch_sent(&self, remote: &str, samples: u64, elapsed: Duration) {
        self.sent_samples
            .with_label_values(&[remote])
            .inc_by(samples);
        self.sent_batch_duration
            .with_label_values(&[remote])
            .observe(elapsed.as_secs_f64());
    }

    /// One writer rejected a batch
    pub fn batch_failed(&self, remote: &str, samples: u64) {
        self.failed_samples
            .with_label_values(&[remote])
            .inc_by(samples);
        self.write_failed();
    }

    pub fn write_failed(&self) {
        self.write_errors.inc();
    }

    pub fn read_failed(&self) {
        self.read_errors.inc();
    }

    pub fn observe_write_api(&self, remote: &str, elapsed: Duration) {
        self.write_api_seconds
            .with_label_values(&[remote])
            .observe(elapsed.as_secs_f64());
    }

    pub fn observe_read_api(&self, remote: &str, elapsed: Duration) {
        self.read_api_seconds
            .with_label_values(&[remote])
            .observe(elapsed.as_secs_f64());
    }
}

impl StorageMetrics for Telemetry {
    fn sample_ignored(&self) {
        self.ignored_samples.inc();
    }

    fn records_fetched(&self, count: u64) {
        self.records_fetched.inc_by(count);
    }

    fn observe_batch_write(&self, elapsed: Duration) {
        self.batch_write_duration.observe(elapsed.as_secs_f64());
    }

    fn query_executed(&self) {
        self.sql_query_count.inc();
    }

    fn observe_query(&self, elapsed: Duration) {
        self.sql_query_duration.observe(elapsed.as_secs_f64());
    }
}
