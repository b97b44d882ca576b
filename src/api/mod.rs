//! HTTP API
//!
//! `GET /profit` computes the net profit for a scheme between two dates and
//! `GET /health` reports liveness.

pub mod error;
pub mod handlers;

use crate::core::ProfitCalculator;
use crate::core::config::ServerConfig;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<ProfitCalculator>,
    pub default_capital: f64,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/profit", get(handlers::profit))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API until Ctrl-C is received.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(%addr, "Server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
