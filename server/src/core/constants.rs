// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for identifiers and user agents)
pub const APP_NAME_LOWER: &str = "prombq";

/// Metric name prefix for every exported collector
pub const METRICS_NAMESPACE: &str = "prombq";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "PROMBQ_CONFIG";

/// Environment variable for the warehouse backend (bigquery or duckdb)
pub const ENV_BACKEND: &str = "PROMBQ_BACKEND";

/// Environment variable for the service account key file
pub const ENV_GCP_JSON: &str = "PROMBQ_GCP_JSON";

/// Environment variable for the GCP project id
pub const ENV_GCP_PROJECT_ID: &str = "PROMBQ_GCP_PROJECT_ID";

/// Environment variable for the BigQuery dataset
pub const ENV_DATASET: &str = "PROMBQ_DATASET";

/// Environment variable for the BigQuery table
pub const ENV_TABLE: &str = "PROMBQ_TABLE";

/// Environment variable for the BigQuery REST endpoint override
pub const ENV_BIGQUERY_ENDPOINT: &str = "PROMBQ_BIGQUERY_ENDPOINT";

/// Environment variable disabling BigQuery authentication (emulators)
pub const ENV_BIGQUERY_ANONYMOUS: &str = "PROMBQ_BIGQUERY_ANONYMOUS";

/// Environment variable for the DuckDB database file
pub const ENV_DUCKDB_PATH: &str = "PROMBQ_DUCKDB_PATH";

/// Environment variable for the DuckDB table name
pub const ENV_DUCKDB_TABLE: &str = "PROMBQ_DUCKDB_TABLE";

/// Environment variable for the per-call warehouse timeout
pub const ENV_TIMEOUT: &str = "PROMBQ_TIMEOUT";

/// Environment variable for the HTTP listen address
pub const ENV_LISTEN: &str = "PROMBQ_LISTEN";

/// Environment variable for the telemetry path
pub const ENV_TELEMETRY: &str = "PROMBQ_TELEMETRY";

/// Environment variable for the log level
pub const ENV_LOG_LEVEL: &str = "PROMBQ_LOG_LEVEL";

/// Environment variable for the log format (logfmt or json)
pub const ENV_LOG_FORMAT: &str = "PROMBQ_LOG_FORMAT";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default listen address (all interfaces)
pub const DEFAULT_LISTEN: &str = ":9201";

/// Default path for the Prometheus exposition endpoint
pub const DEFAULT_TELEMETRY_PATH: &str = "/metrics";

/// Default per-call warehouse timeout
pub const DEFAULT_TIMEOUT: &str = "30s";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values of the log level option
pub const LOG_LEVELS: &[&str] = &["debug", "info", "warn", "error"];

/// Maximum accepted request body (compressed), 32MB
pub const DEFAULT_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// Maximum size a request body may declare once decompressed, 128MB
pub const MAX_DECOMPRESSED_BODY: usize = 128 * 1024 * 1024;

/// Routes owned by the bridge; the telemetry path must not shadow them
pub const RESERVED_PATHS: &[&str] = &["/write", "/read", "/health"];

// =============================================================================
// Shutdown
// =============================================================================

/// Time allowed for background tasks to finish after shutdown is triggered
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// DuckDB Settings
// =============================================================================

/// Default DuckDB table for samples
pub const DEFAULT_DUCKDB_TABLE: &str = "samples";

/// Timeout for a single blocking DuckDB operation
pub const DUCKDB_QUERY_TIMEOUT_SECS: u64 = 30;

/// Interval between CHECKPOINTs of a file-backed database
pub const DUCKDB_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// BigQuery Settings
// =============================================================================

/// Default BigQuery REST endpoint
pub const BIGQUERY_DEFAULT_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// OAuth scope for BigQuery access
pub const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery";

/// HTTP client timeout for a single REST request
pub const BIGQUERY_HTTP_TIMEOUT_SECS: u64 = 60;

/// Server-side wait for a query job before it returns incomplete
pub const BIGQUERY_QUERY_WAIT_MS: u64 = 10_000;

/// Rows requested per result page
pub const BIGQUERY_PAGE_SIZE: u32 = 10_000;
