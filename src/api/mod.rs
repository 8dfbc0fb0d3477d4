//! API module
//!
//! Contains HTTP request handlers for the desk bridge endpoints

pub mod permissions;
pub mod tickets;

use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Router,
};

/// Routes under `/api`
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/permissions/check", get(permissions::check_permission))
        .route("/api/permissions/:profile", get(permissions::list_permissions))
        .route(
            "/api/tickets",
            get(tickets::list_tickets).post(tickets::mount_ticket),
        )
        .route("/api/current-ticket", get(tickets::get_current_ticket))
        .route(
            "/api/tickets/:id",
            get(tickets::get_ticket).delete(tickets::unmount_ticket),
        )
        .route("/api/tickets/:id/accept", post(tickets::accept_ticket))
        .route("/api/tickets/:id/close", post(tickets::close_ticket))
        .route("/api/tickets/:id/reopen", post(tickets::reopen_ticket))
        .route("/api/tickets/:id/select", post(tickets::select_ticket))
}
