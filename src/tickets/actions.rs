//! Per-status ticket actions and selection
//!
//! Decides which buttons a ticket offers and whether it may be opened in the
//! conversation view. Pending tickets must be accepted first.

use crate::tickets::model::{Ticket, TicketId, TicketStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User-triggered ticket action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketAction {
    /// pending → open, taking ownership
    Accept,
    /// Hand an open ticket to another user or queue (handled by the UI)
    Transfer,
    /// closed → open
    Reopen,
    /// open/pending → closed
    Close,
}

impl TicketAction {
    /// Action name
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketAction::Accept => "accept",
            TicketAction::Transfer => "transfer",
            TicketAction::Reopen => "reopen",
            TicketAction::Close => "close",
        }
    }

    /// Whether the action may be started from `status`
    pub fn allowed_from(&self, status: TicketStatus) -> bool {
        available_actions(status).contains(self)
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions offered for a ticket in `status`
pub fn available_actions(status: TicketStatus) -> &'static [TicketAction] {
    match status {
        TicketStatus::Pending => &[TicketAction::Accept, TicketAction::Close],
        TicketStatus::Open => &[TicketAction::Transfer, TicketAction::Close],
        TicketStatus::Closed => &[TicketAction::Reopen],
    }
}

/// Ticket shown in the conversation view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTicket {
    /// Ticket ID
    pub id: TicketId,
    /// Conversation route key
    pub uuid: String,
    /// Fresh per selection so re-selecting the same ticket still refreshes
    pub code: String,
}

/// Error returned when a ticket cannot be opened in the conversation view
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Ticket {0} is pending and must be accepted before it can be opened")]
pub struct NotSelectable(pub TicketId);

/// Select `ticket` for the conversation view
pub fn select(ticket: &Ticket) -> Result<CurrentTicket, NotSelectable> {
    if ticket.status == TicketStatus::Pending {
        return Err(NotSelectable(ticket.id));
    }
    Ok(CurrentTicket {
        id: ticket.id,
        uuid: ticket.uuid.clone(),
        code: Uuid::new_v4().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::model::fixtures;

    #[test]
    fn test_available_actions_by_status() {
        assert_eq!(
            available_actions(TicketStatus::Pending),
            &[TicketAction::Accept, TicketAction::Close]
        );
        assert_eq!(
            available_actions(TicketStatus::Open),
            &[TicketAction::Transfer, TicketAction::Close]
        );
        assert_eq!(
            available_actions(TicketStatus::Closed),
            &[TicketAction::Reopen]
        );
    }

    #[test]
    fn test_allowed_from() {
        assert!(TicketAction::Accept.allowed_from(TicketStatus::Pending));
        assert!(!TicketAction::Accept.allowed_from(TicketStatus::Open));
        assert!(!TicketAction::Accept.allowed_from(TicketStatus::Closed));
        assert!(TicketAction::Close.allowed_from(TicketStatus::Open));
        assert!(TicketAction::Close.allowed_from(TicketStatus::Pending));
        assert!(!TicketAction::Close.allowed_from(TicketStatus::Closed));
        assert!(TicketAction::Reopen.allowed_from(TicketStatus::Closed));
        assert!(!TicketAction::Reopen.allowed_from(TicketStatus::Open));
    }

    #[test]
    fn test_pending_ticket_cannot_be_selected() {
        let ticket = fixtures::ticket(3, TicketStatus::Pending);
        assert_eq!(select(&ticket), Err(NotSelectable(3)));
    }

    #[test]
    fn test_select_generates_fresh_code() {
        let ticket = fixtures::ticket(3, TicketStatus::Open);
        let first = select(&ticket).unwrap();
        let second = select(&ticket).unwrap();
        assert_eq!(first.id, 3);
        assert_eq!(first.uuid, "uuid-3");
        assert_ne!(first.code, second.code);
    }
}
