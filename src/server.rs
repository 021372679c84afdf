//! ==============================================================================
//! server.rs - http transport for the ingest service
//! ==============================================================================
//!
//! routes:
//!     GET  /api/data    -> every sensor with its history window
//!     POST /api/update  -> {"status":"success"} | 404 unknown sensor | 400 text
//!     GET  /health      -> backend and connection status
//!     anything else     -> 404
//!
//! cors is wide open so a dashboard opened from disk or another port can poll.
//!
//! ==============================================================================

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::domain::SensorState;
use crate::error::HubError;
use crate::service::{Health, IngestService};

/// acknowledgement returned for an accepted reading
#[derive(Debug, Serialize)]
pub struct UpdateAck {
    pub status: &'static str,
}

pub fn router(service: IngestService) -> Router {
    Router::new()
        .route("/api/data", get(data_handler))
        .route("/api/update", post(update_handler))
        .route("/health", get(health_handler))
        .fallback(not_found)
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// bind and serve until ctrl-c
pub async fn serve(config: &ServerConfig, service: IngestService) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("[SERVER] Dashboard API live at http://{}", addr);
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    info!("[SERVER] Stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("[SERVER] Ctrl-C received, shutting down");
    }
}

async fn data_handler(State(service): State<IngestService>) -> Json<Vec<SensorState>> {
    Json(service.snapshot_all().await)
}

/// takes raw bytes so malformed bodies get our own 400, not the extractor's
async fn update_handler(
    State(service): State<IngestService>,
    body: Bytes,
) -> Result<Json<UpdateAck>, HubError> {
    service.update(&body).await?;
    Ok(Json(UpdateAck { status: "success" }))
}

async fn health_handler(State(service): State<IngestService>) -> Json<Health> {
    Json(service.health().await)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
