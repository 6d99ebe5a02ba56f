//! BigQuery warehouse service
//!
//! Talks to the BigQuery REST API (v2) with reqwest. Streaming inserts go
//! through `tabledata.insertAll`, reads through `jobs.query` followed by
//! `jobs.getQueryResults` paging.

mod api;
pub mod error;
mod repository_impl;

pub use error::BigqueryError;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gcp_auth::TokenProvider;
use serde::de::DeserializeOwned;

use api::{
    ApiErrorResponse, InsertAllRequest, InsertAllResponse, InsertRow, QueryRequest,
    QueryResponse, RowJson, TableRow,
};

use crate::core::config::BigqueryConfig;
use crate::core::constants::{
    BIGQUERY_HTTP_TIMEOUT_SECS, BIGQUERY_PAGE_SIZE, BIGQUERY_QUERY_WAIT_MS, BIGQUERY_SCOPE,
};
use crate::data::types::StoredRecord;
use crate::utils::time::millis_to_sql_timestamp;

/// BigQuery warehouse service
pub struct BigqueryService {
    http: reqwest::Client,
    auth: Option<Arc<dyn TokenProvider>>,
    endpoint: String,
    project_id: String,
    dataset_id: String,
    table_id: String,
}

impl BigqueryService {
    /// Resolve credentials and project, then build the REST client
    pub async fn init(config: &BigqueryConfig) -> Result<Self, BigqueryError> {
        let key_project = match config.credentials_path {
            Some(ref path) => read_key_project_id(path)?,
            None => None,
        };

        let auth: Option<Arc<dyn TokenProvider>> = if config.anonymous {
            tracing::debug!(endpoint = %config.endpoint, "BigQuery auth disabled");
            None
        } else if let Some(ref path) = config.credentials_path {
            let account = gcp_auth::CustomServiceAccount::from_file(path)?;
            tracing::debug!(path = %path.display(), "Using service account key file");
            Some(Arc::new(account))
        } else {
            tracing::debug!("Using application default credentials");
            Some(gcp_auth::provider().await?)
        };

        let project_id = config
            .project_id
            .clone()
            .or(key_project)
            .ok_or_else(|| {
                BigqueryError::Config(
                    "project id must be set when the key file does not provide one".to_string(),
                )
            })?;

        Self::with_endpoint(
            &config.endpoint,
            auth,
            &project_id,
            &config.dataset_id,
            &config.table_id,
        )
    }

    /// Build a service against an explicit endpoint (emulators, tests)
    pub fn with_endpoint(
        endpoint: &str,
        auth: Option<Arc<dyn TokenProvider>>,
        project_id: &str,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<Self, BigqueryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(BIGQUERY_HTTP_TIMEOUT_SECS))
            .user_agent(concat!("prombq/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(
            endpoint,
            project = project_id,
            dataset = dataset_id,
            table = table_id,
            "BigqueryService initialized"
        );

        Ok(Self {
            http,
            auth,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            dataset_id: dataset_id.to_string(),
            table_id: table_id.to_string(),
        })
    }

    /// `project.dataset.table` path used in generated SQL
    pub fn table_path(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }

    /// Stream a batch into the table with a single `insertAll` call
    ///
    /// Invalid rows are skipped by the service; any reported row error is
    /// logged and the call as a whole fails.
    pub async fn insert_all(&self, records: &[StoredRecord]) -> Result<(), BigqueryError> {
        if records.is_empty() {
            return Ok(());
        }

        let rows = records
            .iter()
            .map(|r| {
                let timestamp = millis_to_sql_timestamp(r.timestamp_ms)
                    .ok_or(BigqueryError::InvalidTimestamp(r.timestamp_ms))?;
                Ok(InsertRow {
                    json: RowJson {
                        metricname: &r.metric_name,
                        tags: &r.tags,
                        value: r.value,
                        timestamp,
                    },
                })
            })
            .collect::<Result<Vec<_>, BigqueryError>>()?;

        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}/insertAll",
            self.endpoint, self.project_id, self.dataset_id, self.table_id
        );
        let body = InsertAllRequest {
            skip_invalid_rows: true,
            rows,
        };

        let response: InsertAllResponse = self.send_json(self.http.post(url).json(&body)).await?;
        if response.insert_errors.is_empty() {
            tracing::debug!(rows = records.len(), "BigQuery insertAll completed");
            return Ok(());
        }

        for row_error in &response.insert_errors {
            for e in &row_error.errors {
                tracing::warn!(
                    row = row_error.index,
                    reason = %e.reason,
                    location = %e.location,
                    message = %e.message,
                    "BigQuery rejected row"
                );
            }
        }

        Err(BigqueryError::InsertRejected {
            failed_rows: response.insert_errors.len(),
            total_rows: records.len(),
        })
    }

    /// Run a standard SQL query and collect every result page
    pub async fn query(&self, sql: &str) -> Result<Vec<StoredRecord>, BigqueryError> {
        let url = format!("{}/projects/{}/queries", self.endpoint, self.project_id);
        let body = QueryRequest {
            query: sql,
            use_legacy_sql: false,
            timeout_ms: BIGQUERY_QUERY_WAIT_MS,
            max_results: BIGQUERY_PAGE_SIZE,
        };

        let mut page: QueryResponse = self.send_json(self.http.post(url).json(&body)).await?;
        let mut records = Vec::new();
        let mut pages = 1usize;

        loop {
            if page.job_complete {
                for row in page.rows.drain(..) {
                    records.push(decode_row(row)?);
                }
                if page.page_token.is_none() {
                    break;
                }
            }

            let job = page.job_reference.take().ok_or_else(|| {
                BigqueryError::MalformedResponse("missing jobReference".to_string())
            })?;

            let mut params = vec![
                ("timeoutMs", BIGQUERY_QUERY_WAIT_MS.to_string()),
                ("maxResults", BIGQUERY_PAGE_SIZE.to_string()),
            ];
            if let Some(ref location) = job.location {
                params.push(("location", location.clone()));
            }
            if page.job_complete
                && let Some(token) = page.page_token.take()
            {
                params.push(("pageToken", token));
            }

            let url = reqwest::Url::parse_with_params(
                &format!(
                    "{}/projects/{}/queries/{}",
                    self.endpoint, job.project_id, job.job_id
                ),
                &params,
            )
            .map_err(|e| BigqueryError::Config(format!("invalid endpoint URL: {}", e)))?;

            let mut next: QueryResponse = self.send_json(self.http.get(url)).await?;
            if next.job_reference.is_none() {
                next.job_reference = Some(job);
            }
            page = next;
            pages += 1;
        }

        tracing::debug!(rows = records.len(), pages, "BigQuery query completed");
        Ok(records)
    }

    async fn send_json<T: DeserializeOwned + Default>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BigqueryError> {
        let request = match self.auth {
            Some(ref provider) => {
                let token = provider.token(&[BIGQUERY_SCOPE]).await?;
                request.bearer_auth(token.as_str())
            }
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(BigqueryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&text).map_err(|e| BigqueryError::MalformedResponse(e.to_string()))
    }
}

/// Read `project_id` from a service account key file
fn read_key_project_id(path: &Path) -> Result<Option<String>, BigqueryError> {
    #[derive(serde::Deserialize)]
    struct KeyFile {
        project_id: Option<String>,
    }

    let content = std::fs::read_to_string(path)?;
    let key: KeyFile = serde_json::from_str(&content).map_err(|e| {
        BigqueryError::Config(format!("invalid key file {}: {}", path.display(), e))
    })?;
    Ok(key.project_id)
}

/// Decode a `(metricname, tags, timestamp_ms, value)` result row
fn decode_row(row: TableRow) -> Result<StoredRecord, BigqueryError> {
    fn cell<'a>(row: &'a TableRow, idx: usize, column: &str) -> Result<&'a str, BigqueryError> {
        row.f
            .get(idx)
            .and_then(|c| c.v.as_str())
            .ok_or_else(|| {
                BigqueryError::MalformedResponse(format!("missing or null column {}", column))
            })
    }

    let timestamp = cell(&row, 2, "timestamp_ms")?;
    let value = cell(&row, 3, "value")?;

    Ok(StoredRecord {
        metric_name: cell(&row, 0, "metricname")?.to_string(),
        tags: cell(&row, 1, "tags")?.to_string(),
        timestamp_ms: timestamp.parse().map_err(|_| {
            BigqueryError::MalformedResponse(format!("invalid timestamp_ms {:?}", timestamp))
        })?,
        value: value.parse().map_err(|_| {
            BigqueryError::MalformedResponse(format!("invalid value {:?}", value))
        })?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn service(server: &MockServer) -> BigqueryService {
        BigqueryService::with_endpoint(&server.base_url(), None, "proj", "metrics", "samples")
            .unwrap()
    }

    fn record(name: &str, ts: i64, value: f64) -> StoredRecord {
        StoredRecord {
            metric_name: name.to_string(),
            tags: "{\"job\":\"api\"}".to_string(),
            value,
            timestamp_ms: ts,
        }
    }

    fn row(name: &str, tags: &str, ts: &str, value: &str) -> serde_json::Value {
        json!({"f": [{"v": name}, {"v": tags}, {"v": ts}, {"v": value}]})
    }

    #[test]
    fn test_table_path() {
        let svc =
            BigqueryService::with_endpoint("http://localhost:9050/", None, "p", "d", "t").unwrap();
        assert_eq!(svc.table_path(), "p.d.t");
        assert_eq!(svc.endpoint, "http://localhost:9050");
    }

    #[test]
    fn test_read_key_project_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        std::fs::write(&path, r#"{"type":"service_account","project_id":"from-key"}"#).unwrap();
        assert_eq!(
            read_key_project_id(&path).unwrap().as_deref(),
            Some("from-key")
        );
    }

    #[test]
    fn test_decode_row_rejects_null_cell() {
        let row: TableRow =
            serde_json::from_value(json!({"f": [{"v": "up"}, {"v": null}, {"v": "1"}, {"v": "1"}]}))
                .unwrap();
        assert!(matches!(
            decode_row(row),
            Err(BigqueryError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_all_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/projects/proj/datasets/metrics/tables/samples/insertAll");
                then.status(200)
                    .json_body(json!({"kind": "bigquery#tableDataInsertAllResponse"}));
            })
            .await;

        let svc = service(&server);
        svc.insert_all(&[record("up", 1_700_000_000_123, 1.0)])
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_insert_all_empty_batch_skips_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({}));
            })
            .await;

        service(&server).insert_all(&[]).await.unwrap();
        mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_insert_all_partial_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/projects/proj/datasets/metrics/tables/samples/insertAll");
                then.status(200).json_body(json!({
                    "insertErrors": [
                        {"index": 1, "errors": [{"reason": "invalid", "message": "no such field"}]}
                    ]
                }));
            })
            .await;

        let err = service(&server)
            .insert_all(&[record("up", 1_000, 1.0), record("up", 2_000, 2.0)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BigqueryError::InsertRejected {
                failed_rows: 1,
                total_rows: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_insert_all_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(404).json_body(json!({
                    "error": {"code": 404, "message": "Not found: Table proj:metrics.samples"}
                }));
            })
            .await;

        let err = service(&server)
            .insert_all(&[record("up", 1_000, 1.0)])
            .await
            .unwrap_err();
        match err {
            BigqueryError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not found: Table proj:metrics.samples");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_insert_all_rejects_out_of_range_timestamp() {
        let server = MockServer::start_async().await;
        let err = service(&server)
            .insert_all(&[record("up", i64::MAX, 1.0)])
            .await
            .unwrap_err();
        assert!(matches!(err, BigqueryError::InvalidTimestamp(i64::MAX)));
    }

    #[tokio::test]
    async fn test_query_single_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/projects/proj/queries");
                then.status(200).json_body(json!({
                    "jobComplete": true,
                    "jobReference": {"projectId": "proj", "jobId": "job-1", "location": "US"},
                    "rows": [
                        row("up", "{\"job\":\"api\"}", "1000", "1"),
                        row("up", "{\"job\":\"api\"}", "2000", "0.5")
                    ]
                }));
            })
            .await;

        let rows = service(&server).query("SELECT 1").await.unwrap();
        mock.assert_async().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].metric_name, "up");
        assert_eq!(rows[0].timestamp_ms, 1000);
        assert_eq!(rows[1].value, 0.5);
    }

    #[tokio::test]
    async fn test_query_follows_page_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/projects/proj/queries");
                then.status(200).json_body(json!({
                    "jobComplete": true,
                    "jobReference": {"projectId": "proj", "jobId": "job-1", "location": "US"},
                    "rows": [row("up", "{}", "1000", "1")],
                    "pageToken": "page-2"
                }));
            })
            .await;
        let next = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/projects/proj/queries/job-1")
                    .query_param("pageToken", "page-2")
                    .query_param("location", "US");
                then.status(200).json_body(json!({
                    "jobComplete": true,
                    "rows": [row("up", "{}", "2000", "2")]
                }));
            })
            .await;

        let rows = service(&server).query("SELECT 1").await.unwrap();
        next.assert_async().await;
        let timestamps: Vec<i64> = rows.iter().map(|r| r.timestamp_ms).collect();
        assert_eq!(timestamps, vec![1000, 2000]);
    }

    #[tokio::test]
    async fn test_query_polls_incomplete_job() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/projects/proj/queries");
                then.status(200).json_body(json!({
                    "jobComplete": false,
                    "jobReference": {"projectId": "proj", "jobId": "job-7"}
                }));
            })
            .await;
        let poll = server
            .mock_async(|when, then| {
                when.method(GET).path("/projects/proj/queries/job-7");
                then.status(200).json_body(json!({
                    "jobComplete": true,
                    "rows": [row("up", "{}", "3000", "3")]
                }));
            })
            .await;

        let rows = service(&server).query("SELECT 1").await.unwrap();
        poll.assert_async().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 3.0);
    }

    #[tokio::test]
    async fn test_query_empty_result() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/projects/proj/queries");
                then.status(200).json_body(json!({
                    "jobComplete": true,
                    "jobReference": {"projectId": "proj", "jobId": "job-2"},
                    "totalRows": "0"
                }));
            })
            .await;

        let rows = service(&server).query("SELECT 1").await.unwrap();
        assert!(rows.is_empty());
    }
}
