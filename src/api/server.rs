//! HTTP server exposing the port listing and process termination.

use crate::api::handlers::{kill_process, list_ports};
use crate::common::config::Config;
use crate::probe::{build_probe, ProcessProbe};
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Per-request handles shared by every route
#[derive(Clone)]
pub struct AppState {
    pub probe: Arc<dyn ProcessProbe>,
    pub home_dir: Option<PathBuf>,
}

/// API server bound to the configured address
pub struct ApiServer {
    config: Config,
    state: AppState,
}

impl ApiServer {
    /// Create a server using the probe named in the config
    pub fn new(config: Config) -> Self {
        let probe = build_probe(config.probe);
        Self::with_probe(config, probe)
    }

    pub fn with_probe(config: Config, probe: Arc<dyn ProcessProbe>) -> Self {
        let state = AppState {
            probe,
            home_dir: config.home_dir.clone(),
        };
        Self { config, state }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.config.static_dir.as_deref())
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn run(self) -> Result<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        info!(
            probe = ?self.config.probe,
            static_dir = ?self.config.static_dir,
            "Port manager running on http://{}",
            addr
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        info!("Port manager stopped");
        Ok(())
    }
}

/// Routes, CORS and request tracing, plus the optional static front end.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/api/ports", get(list_ports))
        .route("/api/kill/:pid", post(kill_process))
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
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
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
    info!("Shutdown requested");
}
