//! API server initialization

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::routes::remote::{self, RemoteState};
use super::routes::{health, telemetry};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::core::telemetry::Telemetry;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;
        let shutdown = app.shutdown.clone();

        let state = RemoteState {
            writers: vec![app.storage.clone()],
            readers: vec![app.storage.clone()],
            telemetry: app.telemetry.clone(),
        };
        let router = router(state, app.telemetry.clone(), &app.config.server.telemetry_path);

        let address = app.config.server.listen_address.as_str();
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("Failed to bind {}", address))?;
        tracing::info!(
            address = %listener.local_addr()?,
            backend = app.warehouse.backend_name(),
            telemetry_path = %app.config.server.telemetry_path,
            "Listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}

/// Assemble every route of the bridge
pub fn router(state: RemoteState, telemetry: Arc<Telemetry>, telemetry_path: &str) -> Router {
    let telemetry_routes = Router::new()
        .route(telemetry_path, get(telemetry::metrics))
        .with_state(telemetry);

    Router::new()
        .route("/health", get(health::health))
        .merge(remote::routes(state))
        .merge(telemetry_routes)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::api::routes::remote::test_support::duckdb_state;

    async fn test_router(path: &str) -> Router {
        let state = duckdb_state().await;
        let telemetry = state.telemetry.clone();
        router(state, telemetry, path)
    }

    #[tokio::test]
    async fn test_router_serves_custom_telemetry_path() {
        let router = test_router("/stats").await;

        let response = router
            .clone()
            .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_router_health() {
        let response = test_router("/metrics")
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_write_requires_post() {
        let response = test_router("/metrics")
            .await
            .oneshot(Request::get("/write").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_router_body_limit() {
        let body = vec![0u8; DEFAULT_BODY_LIMIT + 1];
        let response = test_router("/metrics")
            .await
            .oneshot(
                Request::post("/write")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
