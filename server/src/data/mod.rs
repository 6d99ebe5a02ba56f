//! Data storage layer
//!
//! Provides the warehouse backends for remote storage:
//! - `bigquery` - BigQuery over the REST API (streaming insert + SQL jobs)
//! - `duckdb` - Embedded DuckDB on the same schema (local runs, tests)
//! - `types` - Shared record type across backends
//! - `traits` - Repository trait the remote-storage engine talks to
//! - `sql` - SQL dialects for generated query text
//! - `error` - Unified error type for all backends

pub mod bigquery;
pub mod duckdb;
pub mod error;
pub mod sql;
pub mod traits;
pub mod types;

pub use bigquery::BigqueryService;
pub use duckdb::DuckdbService;
pub use error::DataError;
pub use traits::WarehouseRepository;
pub use types::StoredRecord;

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::{AppConfig, WarehouseBackend};

/// Warehouse service enum
///
/// Wraps the underlying backend-specific service. Services are stored as Arc
/// so the repository handle can be shared with request handlers.
pub enum WarehouseService {
    /// BigQuery backend (default)
    Bigquery(Arc<BigqueryService>),
    /// DuckDB backend (embedded)
    Duckdb(Arc<DuckdbService>),
}

impl WarehouseService {
    /// Initialize the configured warehouse backend
    pub async fn init(config: &AppConfig) -> Result<Self, DataError> {
        match config.backend {
            WarehouseBackend::Bigquery => {
                let service = BigqueryService::init(&config.bigquery).await?;
                Ok(Self::Bigquery(Arc::new(service)))
            }
            WarehouseBackend::Duckdb => {
                let service =
                    DuckdbService::init(config.duckdb.path.as_deref(), &config.duckdb.table)
                        .await?;
                Ok(Self::Duckdb(Arc::new(service)))
            }
        }
    }

    /// Repository handle for the remote-storage engine
    pub fn repository(&self) -> Arc<dyn WarehouseRepository> {
        match self {
            Self::Bigquery(b) => Arc::new(Arc::clone(b)),
            Self::Duckdb(d) => Arc::new(Arc::clone(d)),
        }
    }

    /// Get the backend name
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Bigquery(_) => "bigquery",
            Self::Duckdb(_) => "duckdb",
        }
    }

    /// Start the periodic checkpoint task (file-backed DuckDB only)
    pub fn start_checkpoint_task(
        &self,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Option<JoinHandle<()>> {
        match self {
            Self::Duckdb(d) if d.is_file_backed() => Some(d.start_checkpoint_task(shutdown_rx)),
            _ => None,
        }
    }

    /// Close the backend gracefully
    pub async fn close(&self) -> Result<(), DataError> {
        match self {
            Self::Duckdb(d) => Arc::clone(d).close().await.map_err(Into::into),
            Self::Bigquery(_) => {
                // Stateless HTTP client, nothing to flush
                Ok(())
            }
        }
    }
}
