//! HTTP server setup and routing
//!
//! Sets up the Axum server with the volume control routes, the health
//! endpoint and the embedded control page.

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::worker::ControllerHandle;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub controller: ControllerHandle,
}

/// Build the application router.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        // Embedded control page
        .route("/", get(handlers::index))
        // Health endpoint
        .route("/health", get(handlers::health))
        // Volume control
        .route("/api/volume", get(handlers::get_volume))
        .route("/api/volume/up", post(handlers::volume_up))
        .route("/api/volume/down", post(handlers::volume_down))
        .route("/api/volume/mute", post(handlers::toggle_mute))
        .route("/api/volume/set", post(handlers::set_volume))
        .with_state(ctx)
        // The control page is meant to be opened from phones on the LAN
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn run(config: &Config, ctx: AppContext) -> Result<()> {
    let app = router(ctx);

    let addr = SocketAddr::from((config.bind, config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
