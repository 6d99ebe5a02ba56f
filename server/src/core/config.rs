use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::time::parse_duration;

use super::cli::CliConfig;
use super::constants::{
    BIGQUERY_DEFAULT_ENDPOINT, DEFAULT_DUCKDB_TABLE, DEFAULT_LISTEN, DEFAULT_LOG_LEVEL,
    DEFAULT_TELEMETRY_PATH, DEFAULT_TIMEOUT, LOG_LEVELS, RESERVED_PATHS,
};

// =============================================================================
// Warehouse Backend Enum (BigQuery or DuckDB)
// =============================================================================

/// Warehouse that stores the samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseBackend {
    #[default]
    Bigquery,
    Duckdb,
}

impl fmt::Display for WarehouseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarehouseBackend::Bigquery => write!(f, "bigquery"),
            WarehouseBackend::Duckdb => write!(f, "duckdb"),
        }
    }
}

// =============================================================================
// Log Format Enum
// =============================================================================

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact key=value lines
    #[default]
    Logfmt,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Logfmt => write!(f, "logfmt"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub listen_address: Option<String>,
    pub telemetry_path: Option<String>,
}

/// BigQuery configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BigqueryFileConfig {
    pub credentials_path: Option<PathBuf>,
    pub project_id: Option<String>,
    pub dataset_id: Option<String>,
    pub table_id: Option<String>,
    pub endpoint: Option<String>,
    pub anonymous: Option<bool>,
}

/// DuckDB configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DuckdbFileConfig {
    pub path: Option<PathBuf>,
    pub table: Option<String>,
}

/// Logging configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LogFileConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub backend: Option<WarehouseBackend>,
    pub timeout: Option<String>,
    pub server: Option<ServerFileConfig>,
    pub bigquery: Option<BigqueryFileConfig>,
    pub duckdb: Option<DuckdbFileConfig>,
    pub log: Option<LogFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Normalized `host:port` to bind
    pub listen_address: String,
    pub telemetry_path: String,
}

/// BigQuery backend configuration
#[derive(Debug, Clone)]
pub struct BigqueryConfig {
    /// Taken from the key file when unset
    pub project_id: Option<String>,
    pub dataset_id: String,
    pub table_id: String,
    pub credentials_path: Option<PathBuf>,
    pub endpoint: String,
    /// Skip authentication (emulators)
    pub anonymous: bool,
}

impl Default for BigqueryConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset_id: String::new(),
            table_id: String::new(),
            credentials_path: None,
            endpoint: BIGQUERY_DEFAULT_ENDPOINT.to_string(),
            anonymous: false,
        }
    }
}

/// DuckDB backend configuration
#[derive(Debug, Clone)]
pub struct DuckdbConfig {
    /// In-memory database when unset
    pub path: Option<PathBuf>,
    pub table: String,
}

impl Default for DuckdbConfig {
    fn default() -> Self {
        Self {
            path: None,
            table: DEFAULT_DUCKDB_TABLE.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: WarehouseBackend,
    /// Per-call warehouse timeout
    pub timeout: Duration,
    pub server: ServerConfig,
    pub bigquery: BigqueryConfig,
    pub duckdb: DuckdbConfig,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: WarehouseBackend::default(),
            timeout: Duration::from_secs(30),
            server: ServerConfig {
                listen_address: normalize_listen_address(DEFAULT_LISTEN),
                telemetry_path: DEFAULT_TELEMETRY_PATH.to_string(),
            },
            bigquery: BigqueryConfig::default(),
            duckdb: DuckdbConfig::default(),
            log: LogConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
                format: LogFormat::default(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Config file given with `--config` / `PROMBQ_CONFIG`
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let file_config = match cli.config {
            Some(ref path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                let config = FileConfig::load_from_file(path)?;
                config.warn_unknown_fields();
                config
            }
            None => FileConfig::default(),
        };

        let file_server = file_config.server.unwrap_or_default();
        let file_bigquery = file_config.bigquery.unwrap_or_default();
        let file_duckdb = file_config.duckdb.unwrap_or_default();
        let file_log = file_config.log.unwrap_or_default();

        // Layer configs: defaults -> file config -> CLI/env overrides
        let backend = cli
            .backend
            .or(file_config.backend)
            .unwrap_or_default();

        let timeout_text = cli
            .timeout
            .clone()
            .or(file_config.timeout)
            .unwrap_or_else(|| DEFAULT_TIMEOUT.to_string());
        let timeout = parse_duration(&timeout_text)
            .map_err(|e| anyhow::anyhow!("Configuration error: timeout: {}", e))?;

        let listen_address = cli
            .listen_address
            .clone()
            .or(file_server.listen_address)
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());

        let telemetry_path = cli
            .telemetry_path
            .clone()
            .or(file_server.telemetry_path)
            .unwrap_or_else(|| DEFAULT_TELEMETRY_PATH.to_string());

        let bigquery_defaults = BigqueryConfig::default();
        let bigquery = BigqueryConfig {
            project_id: cli.gcp_project_id.clone().or(file_bigquery.project_id),
            dataset_id: cli
                .dataset
                .clone()
                .or(file_bigquery.dataset_id)
                .unwrap_or_default(),
            table_id: cli
                .table
                .clone()
                .or(file_bigquery.table_id)
                .unwrap_or_default(),
            credentials_path: cli.gcp_json.clone().or(file_bigquery.credentials_path),
            endpoint: cli
                .bigquery_endpoint
                .clone()
                .or(file_bigquery.endpoint)
                .unwrap_or(bigquery_defaults.endpoint),
            anonymous: cli
                .bigquery_anonymous
                .or(file_bigquery.anonymous)
                .unwrap_or(false),
        };

        let duckdb = DuckdbConfig {
            path: cli.duckdb_path.clone().or(file_duckdb.path),
            table: cli
                .duckdb_table
                .clone()
                .or(file_duckdb.table)
                .unwrap_or_else(|| DEFAULT_DUCKDB_TABLE.to_string()),
        };

        let log = LogConfig {
            level: cli
                .log_level
                .clone()
                .or(file_log.level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            format: cli.log_format.or(file_log.format).unwrap_or_default(),
        };

        let config = Self {
            backend,
            timeout,
            server: ServerConfig {
                listen_address: normalize_listen_address(&listen_address),
                telemetry_path,
            },
            bigquery,
            duckdb,
            log,
        };

        config.validate()?;
        tracing::debug!(
            backend = %config.backend,
            listen = %config.server.listen_address,
            timeout_ms = config.timeout.as_millis() as u64,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            anyhow::bail!("Configuration error: timeout must be greater than 0");
        }

        if !self.server.telemetry_path.starts_with('/') {
            anyhow::bail!(
                "Configuration error: telemetry path '{}' must start with '/'",
                self.server.telemetry_path
            );
        }
        if RESERVED_PATHS.contains(&self.server.telemetry_path.as_str()) {
            anyhow::bail!(
                "Configuration error: telemetry path '{}' collides with a built-in route",
                self.server.telemetry_path
            );
        }

        if !LOG_LEVELS.contains(&self.log.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Configuration error: log level '{}' must be one of {}",
                self.log.level,
                LOG_LEVELS.join(", ")
            );
        }

        if self.backend == WarehouseBackend::Bigquery {
            if self.bigquery.dataset_id.is_empty() {
                anyhow::bail!("Configuration error: dataset is required for the bigquery backend");
            }
            if self.bigquery.table_id.is_empty() {
                anyhow::bail!("Configuration error: table is required for the bigquery backend");
            }
            // Without a key file the project cannot be discovered later
            if self.bigquery.project_id.is_none() && self.bigquery.credentials_path.is_none() {
                anyhow::bail!(
                    "Configuration error: project id is required unless a key file provides one"
                );
            }
        }

        if self.backend == WarehouseBackend::Duckdb && self.duckdb.table.is_empty() {
            anyhow::bail!("Configuration error: duckdb table must not be empty");
        }

        Ok(())
    }
}

/// Expand a bare `:port` listen address to all interfaces
fn normalize_listen_address(address: &str) -> String {
    if address.starts_with(':') {
        format!("0.0.0.0{}", address)
    } else {
        address.to_string()
    }
}
