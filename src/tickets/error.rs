//! Ticket transition error types

use crate::services::ServiceError;
use crate::tickets::actions::TicketAction;
use crate::tickets::model::{TicketId, TicketStatus};
use thiserror::Error;

/// Errors that stop a ticket transition
///
/// None of these change the ticket's status.
#[derive(Error, Debug)]
pub enum TransitionError {
    /// No view holds this ticket
    #[error("Ticket not found: {0}")]
    NotMounted(TicketId),

    /// Another transition for this ticket has not completed yet
    #[error("Ticket {0} already has a request in flight")]
    InFlight(TicketId),

    /// The action is not offered from the ticket's current status
    #[error("Cannot {action} ticket {ticket_id} while it is {status}")]
    InvalidStatus {
        /// Ticket ID
        ticket_id: TicketId,
        /// Requested action
        action: TicketAction,
        /// Status at the time of the request
        status: TicketStatus,
    },

    /// The ticket service rejected the update or could not be reached
    #[error("Ticket update failed: {0}")]
    Service(#[from] ServiceError),
}

impl TransitionError {
    /// Text to show in a toast
    pub fn user_message(&self) -> String {
        match self {
            TransitionError::Service(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
