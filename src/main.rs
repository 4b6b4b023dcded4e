//! Consultant · Training Game Backend
//!
//! - Deterministic client/situation generation per (seed, iteration)
//! - Frozen generations, hints and end-of-day scoring
//! - Axum HTTP + WebSocket API
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   CATALOG_PATH  : path to TOML reference data (built-in demo catalog if unset)
//!   LOG_LEVEL     : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT    : "pretty" (default) or "json"

mod telemetry;
mod error;
mod domain;
mod config;
mod catalog;
mod draws;
mod generation;
mod scoring;
mod store;
mod seeds;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Reference-data snapshot + in-memory generation store.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "consultant_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
