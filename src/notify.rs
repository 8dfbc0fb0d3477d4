//! UI event side channel
//!
//! Transient notifications (toasts), navigation requests and ticket updates
//! are published on a broadcast channel. The WebSocket handler forwards them
//! to connected UI clients; nothing waits on delivery.

use crate::tickets::actions::CurrentTicket;
use crate::tickets::model::{TicketId, TicketStatus, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// A user action failed
    Error,
    /// A secondary effect failed; the action itself went through
    Warning,
}

/// Event published to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiEvent {
    /// Transient notification
    #[serde(rename = "toast")]
    Toast {
        /// Severity
        level: ToastLevel,
        /// Text shown to the user
        message: String,
    },
    /// Route the UI should switch to
    #[serde(rename = "navigate")]
    Navigate {
        /// Route path
        path: String,
    },
    /// Confirmed status change of a mounted ticket
    #[serde(rename = "ticket_updated")]
    TicketUpdated {
        /// Ticket ID
        ticket_id: TicketId,
        /// New status
        status: TicketStatus,
        /// New owner
        user_id: Option<UserId>,
    },
    /// Ticket opened in the conversation view
    #[serde(rename = "current_ticket")]
    CurrentTicket {
        /// Selected ticket
        ticket: CurrentTicket,
    },
}

/// Publisher handle for [`UiEvent`]s
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<UiEvent>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Create a notifier with its own channel
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; dropped silently when no client is listening
    pub fn publish(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("No UI subscribers for event");
        }
    }

    /// Publish an error toast
    pub fn error(&self, message: impl Into<String>) {
        self.publish(UiEvent::Toast {
            level: ToastLevel::Error,
            message: message.into(),
        });
    }

    /// Publish a warning toast
    pub fn warning(&self, message: impl Into<String>) {
        self.publish(UiEvent::Toast {
            level: ToastLevel::Warning,
            message: message.into(),
        });
    }

    /// Ask the UI to switch route
    pub fn navigate(&self, path: impl Into<String>) {
        self.publish(UiEvent::Navigate { path: path.into() });
    }
}
