//! Prometheus remote storage engine
//!
//! Write path: series -> row codec -> one batched insert.
//! Read path: queries -> SQL per query -> rows -> merged series.

pub mod codec;
pub mod error;
pub mod fingerprint;
pub mod merge;
pub mod metrics;
pub mod prompb;
pub mod storage;
pub mod translate;
pub mod writer;


pub use error::RemoteStorageError;
pub use metrics::{NoopMetrics, StorageMetrics};
pub use storage::RemoteStorage;

use async_trait::async_trait;

use prompb::{ReadRequest, ReadResponse, TimeSeries};

/// Destination for remote-write batches
#[async_trait]
pub trait RemoteWriter: Send + Sync {
    /// Identity used for per-backend metric labels
    fn name(&self) -> &'static str;

    /// Store the series, returning how many samples were sent
    async fn write(&self, series: &[TimeSeries]) -> Result<usize, RemoteStorageError>;
}

/// Source for remote-read requests
#[async_trait]
pub trait RemoteReader: Send + Sync {
    /// Identity used for per-backend metric labels
    fn name(&self) -> &'static str;

    /// Answer a read request with a single result set
    async fn read(&self, request: &ReadRequest) -> Result<ReadResponse, RemoteStorageError>;
}
