//! BigQuery REST v2 payloads
//!
//! Only the fields used by `tabledata.insertAll`, `jobs.query` and
//! `jobs.getQueryResults` are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllRequest<'a> {
    pub skip_invalid_rows: bool,
    pub rows: Vec<InsertRow<'a>>,
}

#[derive(Debug, Serialize)]
pub struct InsertRow<'a> {
    pub json: RowJson<'a>,
}

/// One row in the fixed sample schema
#[derive(Debug, Serialize)]
pub struct RowJson<'a> {
    pub metricname: &'a str,
    pub tags: &'a str,
    pub value: f64,
    pub timestamp: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllResponse {
    #[serde(default)]
    pub insert_errors: Vec<InsertErrors>,
}

#[derive(Debug, Deserialize)]
pub struct InsertErrors {
    #[serde(default)]
    pub index: u64,
    #[serde(default)]
    pub errors: Vec<ErrorProto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub use_legacy_sql: bool,
    pub timeout_ms: u64,
    pub max_results: u32,
}

/// Shared shape of `jobs.query` and `jobs.getQueryResults` responses
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub job_complete: bool,
    pub job_reference: Option<JobReference>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub v: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_request_shape() {
        let req = InsertAllRequest {
            skip_invalid_rows: true,
            rows: vec![InsertRow {
                json: RowJson {
                    metricname: "up",
                    tags: "{\"job\":\"api\"}",
                    value: 1.0,
                    timestamp: "2024-01-01 00:00:00.123".to_string(),
                },
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["skipInvalidRows"], true);
        assert_eq!(json["rows"][0]["json"]["metricname"], "up");
        assert_eq!(json["rows"][0]["json"]["tags"], "{\"job\":\"api\"}");
        assert_eq!(json["rows"][0]["json"]["timestamp"], "2024-01-01 00:00:00.123");
    }

    #[test]
    fn test_query_response_defaults() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"kind":"bigquery#queryResponse"}"#).unwrap();
        assert!(!resp.job_complete);
        assert!(resp.rows.is_empty());
        assert!(resp.page_token.is_none());
    }

    #[test]
    fn test_insert_errors_parse() {
        let resp: InsertAllResponse = serde_json::from_str(
            r#"{"insertErrors":[{"index":3,"errors":[{"reason":"invalid","message":"bad value"}]}]}"#,
        )
        .unwrap();
        assert_eq!(resp.insert_errors.len(), 1);
        assert_eq!(resp.insert_errors[0].index, 3);
        assert_eq!(resp.insert_errors[0].errors[0].reason, "invalid");
    }
}
