// Application state management
// Ticket projections, the lifecycle controller, the acting agent and the
// ticket currently open in the conversation view

use crate::error::AppError;
use crate::notify::{Notifier, UiEvent};
use crate::services::TicketService;
use crate::tickets::actions::{self, CurrentTicket};
use crate::tickets::{SessionUser, TicketBoard, TicketController, TicketId};
use std::sync::Arc;
use tokio::sync::RwLock;

/// State shared by all handlers
pub type SharedState = Arc<AppState>;

/// Main application state
#[derive(Debug)]
pub struct AppState {
    /// Runs ticket transitions; owns the ticket board
    pub controller: TicketController,
    /// UI event side channel
    pub notifier: Notifier,
    /// Acting agent, if configured
    pub session: Option<SessionUser>,
    /// Ticket open in the conversation view
    current_ticket: RwLock<Option<CurrentTicket>>,
}

impl AppState {
    /// Create state around a ticket service
    pub fn new(service: Arc<dyn TicketService>, session: Option<SessionUser>) -> Self {
        let notifier = Notifier::new();
        let controller = TicketController::new(service, TicketBoard::new(), notifier.clone());
        Self {
            controller,
            notifier,
            session,
            current_ticket: RwLock::new(None),
        }
    }

    /// Wrap into the shared handle used by the router
    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    /// Ticket projections
    pub fn board(&self) -> &TicketBoard {
        self.controller.board()
    }

    /// Acting agent, or an error when the desk runs without a session
    pub fn session_user(&self) -> Result<&SessionUser, AppError> {
        self.session.as_ref().ok_or(AppError::NoSession)
    }

    /// Open a mounted ticket in the conversation view
    ///
    /// Pending tickets are refused until accepted.
    pub async fn select_ticket(&self, ticket_id: TicketId) -> Result<CurrentTicket, AppError> {
        let ticket = self
            .board()
            .get(ticket_id)
            .ok_or(AppError::TicketNotFound(ticket_id))?;
        let current = actions::select(&ticket)?;

        *self.current_ticket.write().await = Some(current.clone());
        self.notifier.publish(UiEvent::CurrentTicket {
            ticket: current.clone(),
        });
        tracing::debug!(ticket_id, code = %current.code, "Ticket selected");
        Ok(current)
    }

    /// Ticket open in the conversation view
    pub async fn current_ticket(&self) -> Option<CurrentTicket> {
        self.current_ticket.read().await.clone()
    }
}
