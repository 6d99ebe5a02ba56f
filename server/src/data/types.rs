//! Shared data types across warehouse backends

/// One persisted observation in the fixed warehouse schema
///
/// Columns: `metricname`, `tags` (JSON object of the remaining labels),
/// `value` and `timestamp` (stored as an instant, carried here as epoch millis).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub metric_name: String,
    pub tags: String,
    pub value: f64,
    pub timestamp_ms: i64,
}
