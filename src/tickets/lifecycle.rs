//! Ticket lifecycle controller
//!
//! Runs the accept, close and reopen transitions against the ticket service.
//! A transition:
//!
//! 1. takes the ticket's in-flight slot on the [`TicketBoard`] (duplicates are
//!    rejected, not queued);
//! 2. sends one update to the ticket service;
//! 3. on success writes the confirmed status locally, if the view is still
//!    live, then runs the accept greeting and asks the UI to navigate;
//! 4. on failure publishes an error toast and leaves the status alone.
//!
//! The in-flight slot is released on every path, including when the future
//! is dropped mid-request.
//!
//! The controller does not re-check permissions; callers decide which actions
//! to offer.

use crate::notify::{Notifier, UiEvent};
use crate::services::{TicketService, TicketUpdate};
use crate::tickets::actions::TicketAction;
use crate::tickets::board::{RequestToken, TicketBoard};
use crate::tickets::error::TransitionError;
use crate::tickets::greeting::{self, GreetingOutcome};
use crate::tickets::model::{SessionUser, Ticket, TicketId, TicketStatus, UserId};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Status-changing transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    /// pending → open
    Accept,
    /// open/pending → closed
    Close,
    /// closed → open
    Reopen,
}

impl Transition {
    /// Matching list action
    pub fn action(self) -> TicketAction {
        match self {
            Transition::Accept => TicketAction::Accept,
            Transition::Close => TicketAction::Close,
            Transition::Reopen => TicketAction::Reopen,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.action(), f)
    }
}

/// Where the UI goes after a confirmed transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "view", content = "uuid")]
pub enum Navigation {
    /// Conversation view of the ticket
    Conversation(String),
    /// Ticket list
    TicketList,
}

impl Navigation {
    fn after(transition: Transition, ticket: &Ticket) -> Self {
        match transition {
            Transition::Close => Navigation::TicketList,
            Transition::Accept | Transition::Reopen => {
                Navigation::Conversation(ticket.uuid.clone())
            }
        }
    }

    /// UI route
    pub fn path(&self) -> String {
        match self {
            Navigation::Conversation(uuid) => format!("/tickets/{}", uuid),
            Navigation::TicketList => "/tickets/".to_string(),
        }
    }
}

/// Result of a confirmed transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionOutcome {
    /// Ticket ID
    pub ticket_id: TicketId,
    /// Transition performed
    pub transition: Transition,
    /// Confirmed status
    pub status: TicketStatus,
    /// Owner sent with the update
    pub user_id: Option<UserId>,
    /// False when the view was torn down before the service answered
    pub applied: bool,
    /// Route the UI was sent to
    pub navigation: Navigation,
    /// Greeting side effect; only accept sends one
    pub greeting: GreetingOutcome,
}

/// Build the update sent for `transition`
///
/// Close and reopen keep the ticket's owner, falling back to the acting agent
/// for tickets nobody owns yet.
pub fn build_update(transition: Transition, ticket: &Ticket, actor: &SessionUser) -> TicketUpdate {
    let owner = ticket.user_id.or(Some(actor.id));
    match transition {
        Transition::Accept => TicketUpdate {
            user_id: Some(actor.id),
            ..TicketUpdate::status(TicketStatus::Open)
        },
        Transition::Close => TicketUpdate {
            user_id: owner,
            queue_id: ticket.queue_ref(),
            use_integration: Some(false),
            prompt_id: Some(None),
            integration_id: Some(None),
            ..TicketUpdate::status(TicketStatus::Closed)
        },
        Transition::Reopen => TicketUpdate {
            user_id: owner,
            queue_id: ticket.queue_ref(),
            ..TicketUpdate::status(TicketStatus::Open)
        },
    }
}

// Releases the in-flight slot when the transition ends, however it ends
struct InFlightGuard<'a> {
    board: &'a TicketBoard,
    token: RequestToken,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.board.is_live(&self.token) {
            debug!(
                ticket_id = self.token.ticket_id,
                "Ticket view gone before request completed"
            );
        }
        self.board.finish(&self.token);
    }
}

/// Drives ticket transitions through the ticket service
#[derive(Clone)]
pub struct TicketController {
    service: Arc<dyn TicketService>,
    board: TicketBoard,
    notifier: Notifier,
}

impl fmt::Debug for TicketController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketController")
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}

impl TicketController {
    /// Create a controller over `board`, reporting to `notifier`
    pub fn new(service: Arc<dyn TicketService>, board: TicketBoard, notifier: Notifier) -> Self {
        Self {
            service,
            board,
            notifier,
        }
    }

    /// Ticket projections this controller writes to
    pub fn board(&self) -> &TicketBoard {
        &self.board
    }

    /// Accept a pending ticket as `actor`
    pub async fn accept(
        &self,
        ticket_id: TicketId,
        actor: &SessionUser,
    ) -> Result<TransitionOutcome, TransitionError> {
        self.run(ticket_id, Transition::Accept, actor).await
    }

    /// Close an open or pending ticket
    pub async fn close(
        &self,
        ticket_id: TicketId,
        actor: &SessionUser,
    ) -> Result<TransitionOutcome, TransitionError> {
        self.run(ticket_id, Transition::Close, actor).await
    }

    /// Reopen a closed ticket
    pub async fn reopen(
        &self,
        ticket_id: TicketId,
        actor: &SessionUser,
    ) -> Result<TransitionOutcome, TransitionError> {
        self.run(ticket_id, Transition::Reopen, actor).await
    }

    /// Run `transition` on a ticket
    pub async fn run(
        &self,
        ticket_id: TicketId,
        transition: Transition,
        actor: &SessionUser,
    ) -> Result<TransitionOutcome, TransitionError> {
        let (token, ticket) = self
            .board
            .begin(ticket_id, transition.action())
            .map_err(|e| {
                warn!(ticket_id, transition = %transition, "Transition not started: {}", e);
                e
            })?;
        let _guard = InFlightGuard {
            board: &self.board,
            token,
        };

        let update = build_update(transition, &ticket, actor);
        info!(
            ticket_id,
            transition = %transition,
            from = %ticket.status,
            to = %update.status,
            actor_id = actor.id,
            "Starting ticket transition"
        );

        if let Err(e) = self.service.update_ticket(ticket_id, &update).await {
            tracing::error!(
                ticket_id,
                transition = %transition,
                status = ?e.status(),
                "Ticket update failed: {}",
                e
            );
            self.notifier.error(e.user_message());
            return Err(e.into());
        }

        let applied = self.board.commit(&token, update.status, update.user_id);
        if applied {
            self.notifier.publish(UiEvent::TicketUpdated {
                ticket_id,
                status: update.status,
                user_id: update.user_id,
            });
        } else {
            debug!(ticket_id, "Ticket view torn down, local status not updated");
        }

        let greeting = match transition {
            Transition::Accept => {
                let outcome = greeting::dispatch(self.service.as_ref(), &ticket, &actor.name).await;
                self.report_greeting(ticket_id, &outcome);
                outcome
            }
            Transition::Close | Transition::Reopen => GreetingOutcome::NotApplicable,
        };

        let navigation = Navigation::after(transition, &ticket);
        self.notifier.navigate(navigation.path());

        info!(ticket_id, transition = %transition, applied, "Ticket transition confirmed");
        Ok(TransitionOutcome {
            ticket_id,
            transition,
            status: update.status,
            user_id: update.user_id,
            applied,
            navigation,
            greeting,
        })
    }

    fn report_greeting(&self, ticket_id: TicketId, outcome: &GreetingOutcome) {
        match outcome {
            GreetingOutcome::Sent => info!(ticket_id, "Accept greeting sent"),
            GreetingOutcome::Disabled | GreetingOutcome::Group | GreetingOutcome::NotApplicable => {
                debug!(ticket_id, ?outcome, "Accept greeting not sent")
            }
            GreetingOutcome::SettingsUnavailable(message) => {
                warn!(ticket_id, "Could not read settings, greeting skipped: {}", message);
                self.notifier.warning(message.clone());
            }
            GreetingOutcome::SendFailed(message) => {
                warn!(ticket_id, "Accept greeting failed: {}", message);
                self.notifier.warning(message.clone());
            }
        }
    }
}
