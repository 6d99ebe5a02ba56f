//! Row codec
//!
//! Splits a label set into the `metricname` column and the `tags` JSON
//! object, and filters values the warehouse schema cannot hold.

use std::collections::BTreeMap;

use super::error::RemoteStorageError;
use super::metrics::StorageMetrics;
use super::prompb::{Label, METRIC_NAME_LABEL};
use crate::data::StoredRecord;

/// Label name to value, keys unique and sorted
pub type LabelSet = BTreeMap<String, String>;

/// Build a label set from wire labels; a repeated name keeps its last value
pub fn label_set(labels: &[Label]) -> LabelSet {
    labels
        .iter()
        .map(|l| (l.name.clone(), l.value.clone()))
        .collect()
}

/// Column values shared by every sample of one series
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSeries {
    pub metric_name: String,
    pub tags: String,
}

/// Split the metric name off and serialize the remaining labels
pub fn encode_labels(labels: &LabelSet) -> Result<EncodedSeries, RemoteStorageError> {
    let metric_name = labels.get(METRIC_NAME_LABEL).cloned().unwrap_or_default();
    let tags: BTreeMap<&str, &str> = labels
        .iter()
        .filter(|(name, _)| name.as_str() != METRIC_NAME_LABEL)
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    let tags = serde_json::to_string(&tags).map_err(RemoteStorageError::TagEncoding)?;
    Ok(EncodedSeries { metric_name, tags })
}

/// Decode a stored `tags` column into a label set
///
/// Anything other than a JSON object of string values is rejected.
pub fn decode_tags(tags: &str) -> Result<LabelSet, RemoteStorageError> {
    serde_json::from_str(tags).map_err(|source| RemoteStorageError::MalformedTags {
        tags: tags.to_string(),
        source,
    })
}

/// Per-observation encoder reporting discarded samples to a metrics sink
pub struct RowCodec<'a> {
    metrics: &'a dyn StorageMetrics,
}

impl<'a> RowCodec<'a> {
    pub fn new(metrics: &'a dyn StorageMetrics) -> Self {
        Self { metrics }
    }

    /// Encode one sample of an already encoded series
    ///
    /// Returns `None` (and counts the discard) for NaN and infinite values.
    pub fn encode(
        &self,
        series: &EncodedSeries,
        value: f64,
        timestamp_ms: i64,
    ) -> Option<StoredRecord> {
        if !value.is_finite() {
            self.metrics.sample_ignored();
            return None;
        }
        Some(StoredRecord {
            metric_name: series.metric_name.clone(),
            tags: series.tags.clone(),
            value,
            timestamp_ms,
        })
    }

    /// Encode a single observation from its full label set
    pub fn encode_observation(
        &self,
        labels: &LabelSet,
        value: f64,
        timestamp_ms: i64,
    ) -> Result<Option<StoredRecord>, RemoteStorageError> {
        let series = encode_labels(labels)?;
        Ok(self.encode(&series, value, timestamp_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::remote::metrics::RecordingMetrics;

    fn labels(pairs: &[(&str, &str)]) -> LabelSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_encode_splits_metric_name() {
        let metrics = RecordingMetrics::default();
        let codec = RowCodec::new(&metrics);
        let record = codec
            .encode_observation(
                &labels(&[("__name__", "first_metric"), ("label", "first")]),
                1.5,
                1_000,
            )
            .unwrap()
            .unwrap();

        assert_eq!(record.metric_name, "first_metric");
        assert_eq!(record.tags, "{\"label\":\"first\"}");
        assert_eq!(record.value, 1.5);
        assert_eq!(record.timestamp_ms, 1_000);
        assert_eq!(metrics.ignored(), 0);
    }

    #[test]
    fn test_encode_no_extra_labels_yields_empty_object() {
        let encoded = encode_labels(&labels(&[("__name__", "up")])).unwrap();
        assert_eq!(encoded.tags, "{}");

        let encoded = encode_labels(&LabelSet::new()).unwrap();
        assert_eq!(encoded.metric_name, "");
        assert_eq!(encoded.tags, "{}");
    }

    #[test]
    fn test_encode_skips_non_finite_values() {
        let metrics = RecordingMetrics::default();
        let codec = RowCodec::new(&metrics);
        let series = encode_labels(&labels(&[("__name__", "up")])).unwrap();

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(codec.encode(&series, value, 1).is_none());
        }
        assert_eq!(metrics.ignored(), 3);

        for value in [0.0, -0.0, f64::MAX, f64::MIN_POSITIVE, -42.5] {
            assert!(codec.encode(&series, value, 1).is_some());
        }
        assert_eq!(metrics.ignored(), 3);
    }

    #[test]
    fn test_tags_never_contain_metric_name() {
        let encoded = encode_labels(&labels(&[
            ("__name__", "http_requests_total"),
            ("job", "api"),
            ("instance", "10.0.0.1:9090"),
        ]))
        .unwrap();
        let decoded = decode_tags(&encoded.tags).unwrap();
        assert!(!decoded.contains_key(METRIC_NAME_LABEL));
        assert_eq!(
            decoded,
            labels(&[("job", "api"), ("instance", "10.0.0.1:9090")])
        );
    }

    #[test]
    fn test_tags_decode_then_encode_reproduces_labels() {
        let original = labels(&[
            ("__name__", "m"),
            ("path", "/api/\"v1\""),
            ("emoji", "\u{1F680}"),
            ("empty", ""),
        ]);
        let encoded = encode_labels(&original).unwrap();
        let decoded = decode_tags(&encoded.tags).unwrap();

        let mut expected = original.clone();
        expected.remove(METRIC_NAME_LABEL);
        assert_eq!(decoded, expected);

        let mut with_name = decoded;
        with_name.insert(METRIC_NAME_LABEL.to_string(), "m".to_string());
        assert_eq!(encode_labels(&with_name).unwrap(), encoded);
    }

    #[test]
    fn test_decode_tags_rejects_wrong_shapes() {
        for bad in ["", "[]", "{\"a\":1}", "{\"a\":null}", "not json", "{\"a\":{\"b\":\"c\"}}"] {
            assert!(
                matches!(
                    decode_tags(bad),
                    Err(RemoteStorageError::MalformedTags { .. })
                ),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_label_set_last_duplicate_wins() {
        let set = label_set(&[
            Label::new("__name__", "up"),
            Label::new("job", "a"),
            Label::new("job", "b"),
        ]);
        assert_eq!(set.get("job").map(String::as_str), Some("b"));
        assert_eq!(set.len(), 2);
    }
}
