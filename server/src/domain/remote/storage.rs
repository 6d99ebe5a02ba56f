//! Remote storage facade
//!
//! Binds a warehouse repository, a metrics sink and the per-call timeout
//! into the writer/reader pair the HTTP layer fans out to.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::error::RemoteStorageError;
use super::merge::SeriesMerger;
use super::metrics::StorageMetrics;
use super::prompb::{QueryResult, ReadRequest, ReadResponse, TimeSeries};
use super::translate::QueryTranslator;
use super::writer::BatchWriter;
use super::{RemoteReader, RemoteWriter};
use crate::data::{DataError, WarehouseRepository};

pub struct RemoteStorage {
    repository: Arc<dyn WarehouseRepository>,
    metrics: Arc<dyn StorageMetrics>,
    timeout: Duration,
}

impl RemoteStorage {
    pub fn new(
        repository: Arc<dyn WarehouseRepository>,
        metrics: Arc<dyn StorageMetrics>,
        timeout: Duration,
    ) -> Self {
        Self {
            repository,
            metrics,
            timeout,
        }
    }
}

#[async_trait]
impl RemoteWriter for RemoteStorage {
    fn name(&self) -> &'static str {
        self.repository.name()
    }

    async fn write(&self, series: &[TimeSeries]) -> Result<usize, RemoteStorageError> {
        BatchWriter::new(self.repository.as_ref(), self.metrics.as_ref(), self.timeout)
            .write(series)
            .await
    }
}

#[async_trait]
impl RemoteReader for RemoteStorage {
    fn name(&self) -> &'static str {
        self.repository.name()
    }

    async fn read(&self, request: &ReadRequest) -> Result<ReadResponse, RemoteStorageError> {
        let translator =
            QueryTranslator::new(self.repository.dialect(), self.repository.table_ref());
        // Translate everything first so a bad matcher costs no warehouse call
        let statements = request
            .queries
            .iter()
            .map(|q| translator.translate(q))
            .collect::<Result<Vec<_>, _>>()?;

        let backend = self.repository.name();
        let mut merger = SeriesMerger::new();
        for sql in &statements {
            tracing::debug!(backend, sql = %sql, "Running remote read query");
            self.metrics.query_executed();
            let start = Instant::now();
            let rows = tokio::time::timeout(self.timeout, self.repository.query_records(sql))
                .await
                .map_err(|_| DataError::timeout(backend, self.timeout))??;
            self.metrics.observe_query(start.elapsed());
            tracing::debug!(backend, rows = rows.len(), "Remote read query returned");
            merger.push_rows(rows)?;
        }

        Ok(ReadResponse {
            results: vec![QueryResult {
                timeseries: merger.finish(),
            }],
        })
    }
}
