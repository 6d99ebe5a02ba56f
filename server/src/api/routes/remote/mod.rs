//! Prometheus remote write and remote read endpoints

mod encoding;
mod read;
mod write;

use std::sync::Arc;

use axum::Router;
use axum::routing::post;

use crate::core::telemetry::Telemetry;
use crate::domain::remote::{RemoteReader, RemoteWriter};

#[derive(Clone)]
pub struct RemoteState {
    /// Every writer receives each write request
    pub writers: Vec<Arc<dyn RemoteWriter>>,
    /// Reads are served only with exactly one reader
    pub readers: Vec<Arc<dyn RemoteReader>>,
    pub telemetry: Arc<Telemetry>,
}

pub fn routes(state: RemoteState) -> Router {
    Router::new()
        .route("/write", post(write::write))
        .route("/read", post(read::read))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::RemoteState;
    use crate::core::telemetry::Telemetry;
    use crate::data::DuckdbService;
    use crate::domain::remote::prompb::{ReadRequest, ReadResponse, TimeSeries};
    use crate::domain::remote::{
        RemoteReader, RemoteStorage, RemoteStorageError, RemoteWriter,
    };

    /// Writer and reader that always fail
    pub struct FailingRemote;

    #[async_trait]
    impl RemoteWriter for FailingRemote {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn write(&self, _series: &[TimeSeries]) -> Result<usize, RemoteStorageError> {
            Err(RemoteStorageError::UnsupportedMatcher(99))
        }
    }

    #[async_trait]
    impl RemoteReader for FailingRemote {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn read(&self, _request: &ReadRequest) -> Result<ReadResponse, RemoteStorageError> {
            Err(RemoteStorageError::UnsupportedMatcher(99))
        }
    }

    /// In-memory DuckDB storage wired as the single writer and reader
    pub async fn duckdb_state() -> RemoteState {
        let telemetry = Arc::new(Telemetry::new().unwrap());
        let db = Arc::new(DuckdbService::init(None, "samples").await.unwrap());
        let storage = Arc::new(RemoteStorage::new(
            Arc::new(db),
            telemetry.clone(),
            Duration::from_secs(10),
        ));
        RemoteState {
            writers: vec![storage.clone()],
            readers: vec![storage],
            telemetry,
        }
    }
}
