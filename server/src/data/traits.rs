//! Repository trait for warehouse backends
//!
//! Each backend (BigQuery, DuckDB) implements this trait with its own
//! transport, while the remote-storage engine only builds SQL text through
//! the backend's dialect and moves `StoredRecord`s.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::sql::SqlDialect;
use crate::data::types::StoredRecord;

#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    /// Identity used for per-backend metric labels
    fn name(&self) -> &'static str;

    /// SQL dialect for generated query text
    fn dialect(&self) -> &'static dyn SqlDialect;

    /// Fully qualified, already quoted table reference
    fn table_ref(&self) -> String;

    /// Insert a batch with a single call
    async fn insert_records(&self, records: &[StoredRecord]) -> Result<(), DataError>;

    /// Run a query returning `(metricname, tags, timestamp_ms, value)` rows
    async fn query_records(&self, sql: &str) -> Result<Vec<StoredRecord>, DataError>;
}
