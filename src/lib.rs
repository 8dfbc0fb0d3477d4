//! Helpdesk Desk Library
//!
//! Authorization and ticket lifecycle core of the agent desk, plus the local
//! bridge the UI talks to. The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod rbac;
pub mod services;
/// Application state shared by the bridge handlers
pub mod state;
pub mod tickets;
pub mod websocket;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use state::SharedState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Crate version
    pub version: String,
    /// Number of mounted tickets
    pub tickets: usize,
}

/// GET /api/health
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<SharedState>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tickets: state.board().len(),
    })
}

/// Full desk bridge router, without middleware
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .merge(api::router())
        .route("/ws", get(websocket::websocket_handler))
        .with_state(state)
}
