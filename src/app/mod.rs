// HTTP surface: routes, error responses and the server loop.

pub mod response;
pub mod routes;

use crate::core::ExcuseEngine;
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ExcuseEngine>,
}

impl AppState {
    pub fn new(engine: ExcuseEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// API routes only. Used directly by tests and wrapped by [`build_router`].
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-excuse", post(routes::generate_excuse))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// API routes plus the static client as fallback.
pub fn build_router(state: AppState, static_dir: &str) -> Router {
    api_router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
    tracing::info!("Shutdown signal received");
}
