use clap::Parser;

use std::path::PathBuf;

use super::config::{LogFormat, WarehouseBackend};
use super::constants::{
    APP_NAME_LOWER, ENV_BACKEND, ENV_BIGQUERY_ANONYMOUS, ENV_BIGQUERY_ENDPOINT, ENV_CONFIG,
    ENV_DATASET, ENV_DUCKDB_PATH, ENV_DUCKDB_TABLE, ENV_GCP_JSON, ENV_GCP_PROJECT_ID,
    ENV_LISTEN, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_TABLE, ENV_TELEMETRY, ENV_TIMEOUT,
};

#[derive(Parser)]
#[command(name = APP_NAME_LOWER)]
#[command(
    version,
    about = "Prometheus remote storage adapter for BigQuery",
    long_about = None
)]
pub struct Cli {
    /// Warehouse backend
    #[arg(long, env = ENV_BACKEND, value_enum)]
    pub backend: Option<WarehouseBackend>,

    /// Path to a service account JSON key file
    #[arg(long, env = ENV_GCP_JSON)]
    pub gcp_json: Option<PathBuf>,

    /// GCP project id (defaults to the key file's project)
    #[arg(long, env = ENV_GCP_PROJECT_ID)]
    pub gcp_project_id: Option<String>,

    /// BigQuery dataset
    #[arg(long, env = ENV_DATASET)]
    pub dataset: Option<String>,

    /// BigQuery table
    #[arg(long, env = ENV_TABLE)]
    pub table: Option<String>,

    /// BigQuery REST endpoint (emulators)
    #[arg(long, env = ENV_BIGQUERY_ENDPOINT)]
    pub bigquery_endpoint: Option<String>,

    /// Disable BigQuery authentication
    #[arg(long, env = ENV_BIGQUERY_ANONYMOUS)]
    pub bigquery_anonymous: Option<bool>,

    /// DuckDB database file (in-memory when unset)
    #[arg(long, env = ENV_DUCKDB_PATH)]
    pub duckdb_path: Option<PathBuf>,

    /// DuckDB table
    #[arg(long, env = ENV_DUCKDB_TABLE)]
    pub duckdb_table: Option<String>,

    /// Timeout for a single warehouse call (e.g. 30s, 500ms)
    #[arg(long = "send-timeout", env = ENV_TIMEOUT)]
    pub timeout: Option<String>,

    /// Address to listen on for web endpoints
    #[arg(long, env = ENV_LISTEN)]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics
    #[arg(long, env = ENV_TELEMETRY)]
    pub telemetry_path: Option<String>,

    /// Only log messages with the given severity or above (debug, info, warn, error)
    #[arg(long, env = ENV_LOG_LEVEL)]
    pub log_level: Option<String>,

    /// Output format of log messages
    #[arg(long, env = ENV_LOG_FORMAT, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Path to config file
    #[arg(long, short = 'c', env = ENV_CONFIG)]
    pub config: Option<PathBuf>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub backend: Option<WarehouseBackend>,
    pub gcp_json: Option<PathBuf>,
    pub gcp_project_id: Option<String>,
    pub dataset: Option<String>,
    pub table: Option<String>,
    pub bigquery_endpoint: Option<String>,
    pub bigquery_anonymous: Option<bool>,
    pub duckdb_path: Option<PathBuf>,
    pub duckdb_table: Option<String>,
    pub timeout: Option<String>,
    pub listen_address: Option<String>,
    pub telemetry_path: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub config: Option<PathBuf>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            backend: cli.backend,
            gcp_json: cli.gcp_json,
            gcp_project_id: cli.gcp_project_id,
            dataset: cli.dataset,
            table: cli.table,
            bigquery_endpoint: cli.bigquery_endpoint,
            bigquery_anonymous: cli.bigquery_anonymous,
            duckdb_path: cli.duckdb_path,
            duckdb_table: cli.duckdb_table,
            timeout: cli.timeout,
            listen_address: cli.listen_address,
            telemetry_path: cli.telemetry_path,
            log_level: cli.log_level,
            log_format: cli.log_format,
            config: cli.config,
        }
    }
}

/// Parse CLI arguments into a config
pub fn parse() -> CliConfig {
    Cli::parse().into()
}
