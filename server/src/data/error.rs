//! Unified error type for data layer
//!
//! Wraps errors from the warehouse backends (BigQuery, DuckDB) while keeping
//! track of which backend produced them.

use thiserror::Error;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// DuckDB database error (embedded backend)
    #[error("DuckDB error: {0}")]
    Duckdb(#[from] duckdb::Error),

    /// HTTP transport error talking to the BigQuery REST API
    #[error("BigQuery transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google credential or token error
    #[error("Google auth error: {0}")]
    Auth(#[from] gcp_auth::Error),

    /// Non-success response from a REST API
    #[error("{backend} API error ({status}): {message}")]
    Api {
        backend: &'static str,
        status: u16,
        message: String,
    },

    /// Some rows of an insertion were rejected by the warehouse
    #[error("{backend} rejected {failed_rows} of {total_rows} rows")]
    PartialInsert {
        backend: &'static str,
        failed_rows: usize,
        total_rows: usize,
    },

    /// A result row did not have the expected shape
    #[error("Malformed row from {backend}: {reason}")]
    MalformedRow {
        backend: &'static str,
        reason: String,
    },

    /// Timestamp cannot be represented by the warehouse
    #[error("Timestamp {millis}ms is out of range for {backend}")]
    InvalidTimestamp { backend: &'static str, millis: i64 },

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Call exceeded its deadline
    #[error("Deadline of {timeout_ms}ms exceeded on {backend}")]
    Timeout {
        backend: &'static str,
        timeout_ms: u64,
    },
}

impl DataError {
    /// Create a timeout error
    pub fn timeout(backend: &'static str, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            backend,
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Create a malformed row error
    pub fn malformed_row(backend: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            backend,
            reason: reason.into(),
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Duckdb(_) => "duckdb",
            Self::Http(_) | Self::Auth(_) => "bigquery",
            Self::Api { backend, .. }
            | Self::PartialInsert { backend, .. }
            | Self::MalformedRow { backend, .. }
            | Self::InvalidTimestamp { backend, .. }
            | Self::MigrationFailed { backend, .. }
            | Self::Timeout { backend, .. } => backend,
            Self::Config(_) | Self::Io(_) => "unknown",
        }
    }
}

/// Convert from the DuckDB backend error type
impl From<crate::data::duckdb::DuckdbError> for DataError {
    fn from(e: crate::data::duckdb::DuckdbError) -> Self {
        use crate::data::duckdb::DuckdbError;
        match e {
            DuckdbError::Database(e) => Self::Duckdb(e),
            DuckdbError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "duckdb",
                version,
                name,
                error,
            },
            DuckdbError::Io(e) => Self::Io(e),
            DuckdbError::Timeout { timeout_secs } => Self::Timeout {
                backend: "duckdb",
                timeout_ms: timeout_secs * 1000,
            },
            DuckdbError::Closed => Self::Config("DuckDB connection is closed".to_string()),
            DuckdbError::InvalidTimestamp(millis) => Self::InvalidTimestamp {
                backend: "duckdb",
                millis,
            },
        }
    }
}

/// Convert from the BigQuery backend error type
impl From<crate::data::bigquery::BigqueryError> for DataError {
    fn from(e: crate::data::bigquery::BigqueryError) -> Self {
        use crate::data::bigquery::BigqueryError;
        match e {
            BigqueryError::Http(e) => Self::Http(e),
            BigqueryError::Auth(e) => Self::Auth(e),
            BigqueryError::Api { status, message } => Self::Api {
                backend: "bigquery",
                status,
                message,
            },
            BigqueryError::InsertRejected {
                failed_rows,
                total_rows,
            } => Self::PartialInsert {
                backend: "bigquery",
                failed_rows,
                total_rows,
            },
            BigqueryError::MalformedResponse(reason) => Self::MalformedRow {
                backend: "bigquery",
                reason,
            },
            BigqueryError::InvalidTimestamp(millis) => Self::InvalidTimestamp {
                backend: "bigquery",
                millis,
            },
            BigqueryError::Config(msg) => Self::Config(msg),
            BigqueryError::Io(e) => Self::Io(e),
        }
    }
}
