//! WarehouseRepository trait implementation for DuckDB
//!
//! Implemented for Arc<DuckdbService> rather than DuckdbService directly
//! because the mutex guard protecting the connection is not Send, so the Arc
//! is cloned and the connection taken inside the spawn_blocking closure.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::sql::{DuckdbDialect, SqlDialect};
use crate::data::traits::WarehouseRepository;
use crate::data::types::StoredRecord;

use super::DuckdbService;
use super::repositories::samples;

#[async_trait]
impl WarehouseRepository for Arc<DuckdbService> {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn dialect(&self) -> &'static dyn SqlDialect {
        &DuckdbDialect
    }

    fn table_ref(&self) -> String {
        DuckdbDialect.quote_identifier(self.table())
    }

    async fn insert_records(&self, records: &[StoredRecord]) -> Result<(), DataError> {
        let db = Arc::clone(self);
        let records = records.to_vec();
        DuckdbService::run_query(move || {
            let conn = db.conn()?;
            samples::insert_batch(&conn, db.table(), &records)
        })
        .await
        .map_err(DataError::from)?
        .map_err(Into::into)
    }

    async fn query_records(&self, sql: &str) -> Result<Vec<StoredRecord>, DataError> {
        let db = Arc::clone(self);
        let sql = sql.to_string();
        DuckdbService::run_query(move || {
            let conn = db.conn()?;
            samples::query(&conn, &sql)
        })
        .await
        .map_err(DataError::from)?
        .map_err(Into::into)
    }
}
