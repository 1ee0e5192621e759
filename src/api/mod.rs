//! Dashboard View API
//!
//! Read-only HTTP view of the rendered dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/dashboard` - Every rendered field and chart
//! - `GET /api/v1/fields/:id` - One text slot
//! - `GET /api/v1/charts/:id` - One chart
//! - `GET /api/v1/poller` - Poll loop statistics
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/fields/:id", get(routes::dashboard::get_field))
        .route("/charts/:id", get(routes::dashboard::get_chart))
        .route("/poller", get(routes::dashboard::get_poller_stats));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server and run until a shutdown signal arrives
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Dashboard view listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Dashboard view shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardController;
    use crate::display::SharedView;
    use crate::fetch::{FetchError, SnapshotSource};
    use crate::poller::{Poller, PollerConfig};
    use crate::snapshot::{scenario, Snapshot};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    struct FixedSource(Option<Snapshot>);

    #[async_trait]
    impl SnapshotSource for FixedSource {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        async fn fetch(&self) -> Result<Snapshot, FetchError> {
            self.0.clone().ok_or(FetchError::Status(500))
        }
    }

    async fn create_test_app(snapshot: Option<Snapshot>, cycles: usize) -> Router {
        let view = SharedView::new();
        let controller = DashboardController::new(Arc::new(view.clone()));
        let poller = Arc::new(Poller::new(
            Arc::new(FixedSource(snapshot)),
            controller,
            PollerConfig::default(),
        ));
        for _ in 0..cycles {
            let _ = poller.run_cycle().await;
        }

        build_router(AppState::new(view, poller))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(None, 0).await;
        let (status, _) = get(app, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_only_after_first_render() {
        let app = create_test_app(None, 2).await;
        let (status, _) = get(app, "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let app = create_test_app(Some(scenario()), 1).await;
        let (status, _) = get(app, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app(Some(scenario()), 1).await;
        let (status, body) = get(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["charts_initialized"], true);
    }

    #[tokio::test]
    async fn test_dashboard_view() {
        let app = create_test_app(Some(scenario()), 1).await;
        let (status, body) = get(app, "/api/v1/dashboard").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fields"]["glucoseCurrent"], "5.20");
        assert_eq!(body["fields"]["dextReserve"], "15 g");
        assert_eq!(body["charts"]["hormoneChart"]["labels"], serde_json::json!([0, 1]));
    }

    #[tokio::test]
    async fn test_get_field() {
        let app = create_test_app(Some(scenario()), 1).await;
        let (status, body) = get(app.clone(), "/api/v1/fields/fertilityPct").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "20%");

        let (status, body) = get(app, "/api/v1/fields/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_nothing_rendered_after_failed_fetches() {
        let app = create_test_app(None, 3).await;

        let (status, body) = get(app.clone(), "/api/v1/charts/glucoseChart").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "NOT_RENDERED");

        let (_, body) = get(app, "/api/v1/poller").await;
        assert_eq!(body["cycles_started"], 3);
        assert_eq!(body["fetch_failures"], 3);
    }

    #[tokio::test]
    async fn test_get_chart() {
        let app = create_test_app(Some(scenario()), 2).await;
        let (status, body) = get(app, "/api/v1/charts/glucoseChart").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "glucoseChart");
        assert_eq!(body["chart"]["datasets"][0]["label"], "Measured (mmol/L)");
        assert_eq!(body["chart"]["revision"], 2);
    }
}
