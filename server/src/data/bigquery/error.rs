//! BigQuery error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BigqueryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth error: {0}")]
    Auth(#[from] gcp_auth::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Insert rejected {failed_rows} of {total_rows} rows")]
    InsertRejected {
        failed_rows: usize,
        total_rows: usize,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timestamp {0}ms is out of range")]
    InvalidTimestamp(i64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = BigqueryError::Api {
            status: 404,
            message: "Not found: Table p:d.t".to_string(),
        };
        assert_eq!(err.to_string(), "API error (404): Not found: Table p:d.t");
    }

    #[test]
    fn test_insert_rejected_display() {
        let err = BigqueryError::InsertRejected {
            failed_rows: 1,
            total_rows: 4,
        };
        assert_eq!(err.to_string(), "Insert rejected 1 of 4 rows");
    }
}
