//! External ticket service
//!
//! The lifecycle controller talks to the ticket service only through the
//! [`TicketService`] trait. [`HttpTicketService`] is the production
//! implementation over the service's REST API.

pub mod error;
pub mod http;
pub mod types;

pub use error::ServiceError;
pub use http::HttpTicketService;
pub use types::{OutboundMessage, Setting, TicketUpdate};

use crate::tickets::model::TicketId;
use async_trait::async_trait;

/// Requests the lifecycle controller issues against the ticket service
#[async_trait]
pub trait TicketService: Send + Sync {
    /// `PUT /tickets/{id}` with a partial update
    async fn update_ticket(
        &self,
        ticket_id: TicketId,
        update: &TicketUpdate,
    ) -> Result<(), ServiceError>;

    /// `POST /messages/{id}`
    async fn send_message(
        &self,
        ticket_id: TicketId,
        message: &OutboundMessage,
    ) -> Result<(), ServiceError>;

    /// `GET /settings/`
    async fn list_settings(&self) -> Result<Vec<Setting>, ServiceError>;
}
