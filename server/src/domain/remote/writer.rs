//! Batch writer
//!
//! Flattens every sample of a write request into one batch and inserts it
//! with a single deadline-bound warehouse call. No retries happen here.

use std::time::{Duration, Instant};

use super::codec::{RowCodec, encode_labels, label_set};
use super::error::RemoteStorageError;
use super::metrics::StorageMetrics;
use super::prompb::TimeSeries;
use crate::data::{DataError, StoredRecord, WarehouseRepository};

pub struct BatchWriter<'a> {
    repository: &'a dyn WarehouseRepository,
    metrics: &'a dyn StorageMetrics,
    timeout: Duration,
}

impl<'a> BatchWriter<'a> {
    pub fn new(
        repository: &'a dyn WarehouseRepository,
        metrics: &'a dyn StorageMetrics,
        timeout: Duration,
    ) -> Self {
        Self {
            repository,
            metrics,
            timeout,
        }
    }

    /// Encode all series into records, dropping non-finite samples
    pub fn build_batch(
        &self,
        series: &[TimeSeries],
    ) -> Result<Vec<StoredRecord>, RemoteStorageError> {
        let codec = RowCodec::new(self.metrics);
        let mut batch = Vec::with_capacity(series.iter().map(|ts| ts.samples.len()).sum());

        for ts in series {
            self.metrics.records_fetched(ts.samples.len() as u64);
            let encoded = encode_labels(&label_set(&ts.labels))?;
            batch.extend(
                ts.samples
                    .iter()
                    .filter_map(|s| codec.encode(&encoded, s.value, s.timestamp)),
            );
        }
        Ok(batch)
    }

    /// Write all series with one insertion call; returns the rows sent
    pub async fn write(&self, series: &[TimeSeries]) -> Result<usize, RemoteStorageError> {
        let batch = self.build_batch(series)?;
        if batch.is_empty() {
            tracing::debug!(series = series.len(), "Nothing to insert after filtering");
            return Ok(0);
        }

        let backend = self.repository.name();
        let start = Instant::now();
        tokio::time::timeout(self.timeout, self.repository.insert_records(&batch))
            .await
            .map_err(|_| DataError::timeout(backend, self.timeout))??;
        let elapsed = start.elapsed();
        self.metrics.observe_batch_write(elapsed);

        tracing::debug!(
            backend,
            rows = batch.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Inserted batch"
        );
        Ok(batch.len())
    }
}
