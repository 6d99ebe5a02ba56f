//! WarehouseRepository trait implementation for BigQuery

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::sql::{BigqueryDialect, SqlDialect};
use crate::data::traits::WarehouseRepository;
use crate::data::types::StoredRecord;

use super::BigqueryService;

#[async_trait]
impl WarehouseRepository for Arc<BigqueryService> {
    fn name(&self) -> &'static str {
        "bigquerydb"
    }

    fn dialect(&self) -> &'static dyn SqlDialect {
        &BigqueryDialect
    }

    fn table_ref(&self) -> String {
        BigqueryDialect.quote_identifier(&self.table_path())
    }

    async fn insert_records(&self, records: &[StoredRecord]) -> Result<(), DataError> {
        self.insert_all(records).await.map_err(Into::into)
    }

    async fn query_records(&self, sql: &str) -> Result<Vec<StoredRecord>, DataError> {
        self.query(sql).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_and_table_ref() {
        let svc = Arc::new(
            BigqueryService::with_endpoint(
                "http://localhost:9050",
                None,
                "proj",
                "metrics",
                "samples",
            )
            .unwrap(),
        );
        assert_eq!(svc.name(), "bigquerydb");
        assert_eq!(svc.dialect().name(), "bigquery");
        assert_eq!(svc.table_ref(), "`proj.metrics.samples`");
    }
}
