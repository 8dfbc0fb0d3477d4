//! Ticket projection and lifecycle
//!
//! The UI holds a read-mostly copy of each ticket it shows. Status changes
//! go through [`TicketController`], which only writes a new status locally
//! after the ticket service confirms it.

pub mod actions;
pub mod board;
pub mod display;
pub mod error;
pub mod greeting;
pub mod lifecycle;
pub mod model;

pub use actions::{available_actions, CurrentTicket, TicketAction};
pub use board::{RequestToken, TicketBoard};
pub use display::TicketListItem;
pub use error::TransitionError;
pub use greeting::GreetingOutcome;
pub use lifecycle::{Navigation, TicketController, Transition, TransitionOutcome};
pub use model::{SessionUser, Ticket, TicketId, TicketStatus, UserId};
