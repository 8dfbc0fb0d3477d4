//! Ticket API handlers
//!
//! Mount and tear down ticket views, list them, and run transitions as the
//! configured agent.

use crate::error::AppError;
use crate::state::SharedState;
use crate::tickets::{
    CurrentTicket, Ticket, TicketId, TicketListItem, Transition, TransitionOutcome,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Local;
use serde::Serialize;

/// Tickets list response
#[derive(Debug, Serialize)]
pub struct TicketsListResponse {
    /// List item views, most recently active first
    pub tickets: Vec<TicketListItem>,
    /// Total number of tickets
    pub count: usize,
}

/// Current ticket response
#[derive(Debug, Serialize)]
pub struct CurrentTicketResponse {
    /// Ticket open in the conversation view
    pub ticket: Option<CurrentTicket>,
}

/// GET /api/tickets - List mounted tickets
pub async fn list_tickets(State(state): State<SharedState>) -> Json<TicketsListResponse> {
    let now = Local::now();
    let tickets: Vec<TicketListItem> = state
        .board()
        .list()
        .iter()
        .map(|ticket| TicketListItem::build(ticket, &now))
        .collect();

    Json(TicketsListResponse {
        count: tickets.len(),
        tickets,
    })
}

/// GET /api/tickets/:id - Get one mounted ticket
pub async fn get_ticket(
    State(state): State<SharedState>,
    Path(id): Path<TicketId>,
) -> Result<Json<Ticket>, AppError> {
    state
        .board()
        .get(id)
        .map(Json)
        .ok_or(AppError::TicketNotFound(id))
}

/// POST /api/tickets - Mount or refresh a ticket view
pub async fn mount_ticket(
    State(state): State<SharedState>,
    Json(ticket): Json<Ticket>,
) -> Result<(StatusCode, Json<TicketListItem>), AppError> {
    if ticket.uuid.trim().is_empty() {
        return Err(AppError::BadRequest("Ticket uuid cannot be empty".to_string()));
    }
    let item = TicketListItem::build(&ticket, &Local::now());
    tracing::debug!(ticket_id = ticket.id, status = %ticket.status, "Mounting ticket");
    state.board().mount(ticket);
    Ok((StatusCode::CREATED, Json(item)))
}

/// DELETE /api/tickets/:id - Tear down a ticket view
pub async fn unmount_ticket(
    State(state): State<SharedState>,
    Path(id): Path<TicketId>,
) -> Result<StatusCode, AppError> {
    if state.board().unmount(id) {
        tracing::debug!(ticket_id = id, "Ticket view torn down");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::TicketNotFound(id))
    }
}

async fn transition(
    state: SharedState,
    id: TicketId,
    transition: Transition,
) -> Result<Json<TransitionOutcome>, AppError> {
    let actor = state.session_user()?.clone();
    let outcome = state.controller.run(id, transition, &actor).await?;
    Ok(Json(outcome))
}

/// POST /api/tickets/:id/accept - Accept a pending ticket
pub async fn accept_ticket(
    State(state): State<SharedState>,
    Path(id): Path<TicketId>,
) -> Result<Json<TransitionOutcome>, AppError> {
    transition(state, id, Transition::Accept).await
}

/// POST /api/tickets/:id/close - Close a ticket
pub async fn close_ticket(
    State(state): State<SharedState>,
    Path(id): Path<TicketId>,
) -> Result<Json<TransitionOutcome>, AppError> {
    transition(state, id, Transition::Close).await
}

/// POST /api/tickets/:id/reopen - Reopen a closed ticket
pub async fn reopen_ticket(
    State(state): State<SharedState>,
    Path(id): Path<TicketId>,
) -> Result<Json<TransitionOutcome>, AppError> {
    transition(state, id, Transition::Reopen).await
}

/// POST /api/tickets/:id/select - Open a ticket in the conversation view
pub async fn select_ticket(
    State(state): State<SharedState>,
    Path(id): Path<TicketId>,
) -> Result<Json<CurrentTicket>, AppError> {
    let current = state.select_ticket(id).await?;
    Ok(Json(current))
}

/// GET /api/current-ticket - Ticket open in the conversation view
pub async fn get_current_ticket(State(state): State<SharedState>) -> Json<CurrentTicketResponse> {
    Json(CurrentTicketResponse {
        ticket: state.current_ticket().await,
    })
}
