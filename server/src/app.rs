//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig};
use crate::core::config::{AppConfig, LogConfig, LogFormat};
use crate::core::shutdown::ShutdownService;
use crate::core::telemetry::Telemetry;
use crate::data::WarehouseService;
use crate::domain::remote::RemoteStorage;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub warehouse: Arc<WarehouseService>,
    pub telemetry: Arc<Telemetry>,
    pub storage: Arc<RemoteStorage>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let cli_config = cli::parse();
        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Self::init_logging(&config.log);
        tracing::debug!("Application starting");

        let telemetry =
            Arc::new(Telemetry::new().context("Failed to initialize metrics registry")?);
        let warehouse = Arc::new(
            WarehouseService::init(&config)
                .await
                .with_context(|| format!("Failed to initialize {} backend", config.backend))?,
        );
        let storage = Arc::new(RemoteStorage::new(
            warehouse.repository(),
            telemetry.clone(),
            config.timeout,
        ));
        let shutdown = ShutdownService::new(warehouse.clone());

        tracing::debug!(
            backend = warehouse.backend_name(),
            timeout_ms = config.timeout.as_millis() as u64,
            "Remote storage initialized"
        );

        Ok(Self {
            shutdown,
            config,
            warehouse,
            telemetry,
            storage,
        })
    }

    fn init_logging(log: &LogConfig) {
        // RUST_LOG wins over the configured level
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| log.level.to_lowercase());

        let builder = tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_env_filter(filter);

        match log.format {
            LogFormat::Logfmt => builder.with_ansi(true).compact().init(),
            LogFormat::Json => builder.with_ansi(false).json().init(),
        }
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        if let Some(h) = self
            .warehouse
            .start_checkpoint_task(self.shutdown.subscribe())
        {
            self.shutdown.register(h).await;
        }

        tracing::debug!("Background tasks started");
    }
}
