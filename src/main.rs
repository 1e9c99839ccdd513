//! MediDeutsch · Adaptive Assessment Backend
//!
//! - Adaptive CEFR placement test for medical German (A1..C2)
//! - Axum HTTP + WebSocket API hosting in-memory assessment sessions
//! - Built-in question bank, extendable from a TOML config
//!
//! Important env variables:
//!   PORT                    : u16 (default 3000)
//!   ASSESSMENT_CONFIG_PATH  : path to TOML config (settings, topic weights, extra questions)
//!   LOG_LEVEL               : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT              : "pretty" (default) or "json"

mod bank;
mod config;
mod domain;
mod engine;
mod error;
mod logic;
mod protocol;
mod routes;
mod scoring;
mod seeds;
mod selector;
mod session;
mod state;
mod telemetry;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // A malformed config or question bank stops startup here.
  let state = match AppState::from_env() {
    Ok(state) => Arc::new(state),
    Err(e) => {
      error!(target: "medideutsch_backend", error = %e, "Refusing to start");
      return Err(e.into());
    }
  };

  state.clone().spawn_idle_sweep();
  let app = build_router(state);

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "medideutsch_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "medideutsch_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "medideutsch_backend", error = %e, "Failed to listen for shutdown signal");
  }
}
