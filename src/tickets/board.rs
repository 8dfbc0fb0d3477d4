//! Local ticket projection store
//!
//! Holds the tickets currently shown by the UI. A ticket is "mounted" while
//! some view displays it; tearing the view down removes the entry.
//!
//! Transitions take a [`RequestToken`] before awaiting the ticket service and
//! present it again afterwards. The in-flight slot belongs to the ticket, not
//! to the view: tearing the view down does not release it, only the request
//! that took it does. The token also names the mount generation, so a
//! completion arriving after teardown (or after the ticket was unmounted and
//! mounted again) writes nothing.
//!
//! The lock is never held across an await.

use crate::tickets::actions::TicketAction;
use crate::tickets::error::TransitionError;
use crate::tickets::model::{Ticket, TicketId, TicketStatus, UserId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Proof that a transition was started on a mounted ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    /// Ticket the request is for
    pub ticket_id: TicketId,
    /// Action being performed
    pub action: TicketAction,
    mount: u64,
    seq: u64,
}

#[derive(Debug)]
struct Entry {
    ticket: Ticket,
    mount: u64,
}

#[derive(Debug, Default)]
struct BoardInner {
    entries: HashMap<TicketId, Entry>,
    // Ticket ID -> sequence of the request holding the slot
    in_flight: HashMap<TicketId, u64>,
    next_seq: u64,
}

impl BoardInner {
    fn next(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn holds_slot(&self, token: &RequestToken) -> bool {
        self.in_flight.get(&token.ticket_id) == Some(&token.seq)
    }

    fn entry_for(&self, token: &RequestToken) -> Option<&Entry> {
        if !self.holds_slot(token) {
            return None;
        }
        self.entries
            .get(&token.ticket_id)
            .filter(|e| e.mount == token.mount)
    }
}

/// Shared handle to the ticket projections
#[derive(Debug, Clone, Default)]
pub struct TicketBoard {
    inner: Arc<RwLock<BoardInner>>,
}

impl TicketBoard {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BoardInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show a ticket, or refresh the projection of one already shown
    ///
    /// A refresh keeps the pending request, if any.
    pub fn mount(&self, ticket: Ticket) {
        let mut inner = self.write();
        if let Some(entry) = inner.entries.get_mut(&ticket.id) {
            entry.ticket = ticket;
            return;
        }
        let mount = inner.next();
        inner.entries.insert(ticket.id, Entry { ticket, mount });
    }

    /// Tear down the view of a ticket
    ///
    /// Returns false if it was not mounted.
    pub fn unmount(&self, ticket_id: TicketId) -> bool {
        self.write().entries.remove(&ticket_id).is_some()
    }

    /// Current projection of a ticket
    pub fn get(&self, ticket_id: TicketId) -> Option<Ticket> {
        self.read()
            .entries
            .get(&ticket_id)
            .map(|e| e.ticket.clone())
    }

    /// All mounted tickets, most recently active first
    pub fn list(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self
            .read()
            .entries
            .values()
            .map(|e| e.ticket.clone())
            .collect();
        tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        tickets
    }

    /// Number of mounted tickets
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    /// Whether no ticket is mounted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a transition is running for the ticket
    pub fn is_in_flight(&self, ticket_id: TicketId) -> bool {
        self.read().in_flight.contains_key(&ticket_id)
    }

    /// Start `action` on a ticket
    ///
    /// Fails if the ticket is not mounted, already has a request in flight,
    /// or its status does not offer `action`. On success returns the token
    /// and a snapshot of the ticket taken under the same lock.
    pub fn begin(
        &self,
        ticket_id: TicketId,
        action: TicketAction,
    ) -> Result<(RequestToken, Ticket), TransitionError> {
        let mut inner = self.write();
        let seq = inner.next();
        let entry = inner
            .entries
            .get(&ticket_id)
            .ok_or(TransitionError::NotMounted(ticket_id))?;

        if inner.in_flight.contains_key(&ticket_id) {
            return Err(TransitionError::InFlight(ticket_id));
        }
        if !action.allowed_from(entry.ticket.status) {
            return Err(TransitionError::InvalidStatus {
                ticket_id,
                action,
                status: entry.ticket.status,
            });
        }

        let token = RequestToken {
            ticket_id,
            action,
            mount: entry.mount,
            seq,
        };
        let snapshot = entry.ticket.clone();
        inner.in_flight.insert(ticket_id, seq);
        Ok((token, snapshot))
    }

    /// Whether the view that started `token` is still showing the ticket
    pub fn is_live(&self, token: &RequestToken) -> bool {
        self.read().entry_for(token).is_some()
    }

    /// Apply a confirmed status change
    ///
    /// Returns false and writes nothing when the token is stale.
    pub fn commit(&self, token: &RequestToken, status: TicketStatus, user_id: Option<UserId>) -> bool {
        let mut inner = self.write();
        if inner.entry_for(token).is_none() {
            return false;
        }
        let Some(entry) = inner.entries.get_mut(&token.ticket_id) else {
            return false;
        };
        entry.ticket.status = status;
        if user_id.is_some() {
            if entry.ticket.user_id != user_id {
                // The embedded owner record no longer matches
                entry.ticket.user = None;
            }
            entry.ticket.user_id = user_id;
        }
        true
    }

    /// Release the in-flight slot taken by `token`
    ///
    /// Released whether or not the view is still mounted. Returns false when
    /// the slot was already released.
    pub fn finish(&self, token: &RequestToken) -> bool {
        let mut inner = self.write();
        if !inner.holds_slot(token) {
            return false;
        }
        inner.in_flight.remove(&token.ticket_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::model::fixtures;
    use chrono::Duration;

    #[test]
    fn test_begin_requires_mounted_ticket() {
        let board = TicketBoard::new();
        let err = board.begin(1, TicketAction::Accept).unwrap_err();
        assert!(matches!(err, TransitionError::NotMounted(1)));
    }

    #[test]
    fn test_begin_checks_status() {
        let board = TicketBoard::new();
        board.mount(fixtures::ticket(1, TicketStatus::Open));
        let err = board.begin(1, TicketAction::Accept).unwrap_err();
        assert!(matches!(
            err,
            TransitionError::InvalidStatus {
                status: TicketStatus::Open,
                ..
            }
        ));
        assert!(!board.is_in_flight(1));
    }

    #[test]
    fn test_duplicate_begin_is_rejected() {
        let board = TicketBoard::new();
        board.mount(fixtures::ticket(1, TicketStatus::Pending));
        let (token, _) = board.begin(1, TicketAction::Accept).unwrap();
        assert!(board.is_in_flight(1));

        let err = board.begin(1, TicketAction::Close).unwrap_err();
        assert!(matches!(err, TransitionError::InFlight(1)));

        assert!(board.finish(&token));
        assert!(!board.is_in_flight(1));
        assert!(!board.finish(&token));
        assert!(board.begin(1, TicketAction::Close).is_ok());
    }

    #[test]
    fn test_tickets_are_independent() {
        let board = TicketBoard::new();
        board.mount(fixtures::ticket(1, TicketStatus::Pending));
        board.mount(fixtures::ticket(2, TicketStatus::Pending));
        assert!(board.begin(1, TicketAction::Accept).is_ok());
        assert!(board.begin(2, TicketAction::Accept).is_ok());
    }

    #[test]
    fn test_commit_applies_status_and_owner() {
        let board = TicketBoard::new();
        board.mount(fixtures::ticket(1, TicketStatus::Pending));
        let (token, _) = board.begin(1, TicketAction::Accept).unwrap();

        assert!(board.commit(&token, TicketStatus::Open, Some(7)));
        let ticket = board.get(1).unwrap();
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.user_id, Some(7));
    }

    #[test]
    fn test_stale_token_after_teardown_writes_nothing() {
        let board = TicketBoard::new();
        board.mount(fixtures::ticket(1, TicketStatus::Pending));
        let (token, _) = board.begin(1, TicketAction::Accept).unwrap();

        assert!(board.unmount(1));
        assert!(!board.is_live(&token));
        assert!(!board.commit(&token, TicketStatus::Open, Some(7)));
        assert!(board.is_in_flight(1));
        assert!(board.finish(&token));
        assert!(!board.is_in_flight(1));
    }

    #[test]
    fn test_stale_token_after_remount_writes_nothing() {
        let board = TicketBoard::new();
        board.mount(fixtures::ticket(1, TicketStatus::Pending));
        let (token, _) = board.begin(1, TicketAction::Accept).unwrap();

        board.unmount(1);
        board.mount(fixtures::ticket(1, TicketStatus::Pending));

        assert!(!board.commit(&token, TicketStatus::Open, Some(7)));
        assert_eq!(board.get(1).unwrap().status, TicketStatus::Pending);
        assert!(board.finish(&token));
        assert!(!board.is_in_flight(1));
    }

    #[test]
    fn test_remount_keeps_in_flight_slot() {
        let board = TicketBoard::new();
        board.mount(fixtures::ticket(1, TicketStatus::Pending));
        let (token, _) = board.begin(1, TicketAction::Accept).unwrap();

        board.unmount(1);
        board.mount(fixtures::ticket(1, TicketStatus::Pending));

        let err = board.begin(1, TicketAction::Accept).unwrap_err();
        assert!(matches!(err, TransitionError::InFlight(1)));

        assert!(board.finish(&token));
        assert!(board.begin(1, TicketAction::Accept).is_ok());
    }

    #[test]
    fn test_refresh_keeps_in_flight_request() {
        let board = TicketBoard::new();
        board.mount(fixtures::ticket(1, TicketStatus::Pending));
        let (token, _) = board.begin(1, TicketAction::Accept).unwrap();

        let mut refreshed = fixtures::ticket(1, TicketStatus::Pending);
        refreshed.unread_messages = 4;
        board.mount(refreshed);

        assert!(board.is_live(&token));
        assert_eq!(board.get(1).unwrap().unread_messages, 4);
        assert!(board.commit(&token, TicketStatus::Open, Some(7)));
    }

    #[test]
    fn test_list_most_recent_first() {
        let board = TicketBoard::new();
        let older = fixtures::ticket(1, TicketStatus::Open);
        let mut newer = fixtures::ticket(2, TicketStatus::Open);
        newer.updated_at = older.updated_at + Duration::minutes(5);
        board.mount(older);
        board.mount(newer);

        let ids: Vec<TicketId> = board.list().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(board.len(), 2);
        assert!(!board.is_empty());
    }
}
