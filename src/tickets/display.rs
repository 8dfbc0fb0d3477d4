// Ticket list item view
// Labels and preview text derived from a ticket projection

use crate::tickets::actions::{available_actions, TicketAction};
use crate::tickets::model::{Presence, Tag, Ticket, TicketId, TicketStatus};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt::Display;

/// Label for tickets without a queue
pub const NO_QUEUE_LABEL: &str = "SEM FILA";

/// Color for tickets without a queue color
pub const NO_QUEUE_COLOR: &str = "#7C7C7C";

/// Preview shown when the last message is an inline location snapshot
pub const LOCATION_PREVIEW: &str = "Localização";

const INLINE_IMAGE_MARKER: &str = "data:image/png;base64";

/// Everything the list renders for one ticket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketListItem {
    /// Ticket ID
    pub id: TicketId,
    /// Conversation route key
    pub uuid: String,
    /// Raw status
    pub status: TicketStatus,
    /// Contact name
    pub contact_name: String,
    /// Avatar fallback text
    pub initials: String,
    /// Avatar URL
    pub avatar_url: Option<String>,
    /// Queue label
    pub queue_label: String,
    /// Queue color
    pub queue_color: String,
    /// Connection label
    pub connection_label: Option<String>,
    /// Owner label
    pub owner_label: Option<String>,
    /// `HH:MM` today, `dd/MM/yyyy` otherwise
    pub timestamp_label: String,
    /// Presence text or last message preview
    pub preview: String,
    /// Unread message count
    pub unread_messages: u32,
    /// Tags
    pub tags: Vec<Tag>,
    /// Whether the conversation view is blocked until accept
    pub pending: bool,
    /// Buttons offered
    pub actions: Vec<TicketAction>,
}

impl TicketListItem {
    /// Build the list view of `ticket` relative to `now`
    pub fn build<Tz>(ticket: &Ticket, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            id: ticket.id,
            uuid: ticket.uuid.clone(),
            status: ticket.status,
            contact_name: ticket.contact.name.clone(),
            initials: initials(&ticket.contact.name),
            avatar_url: ticket.contact.profile_pic_url.clone(),
            queue_label: queue_label(ticket),
            queue_color: queue_color(ticket),
            connection_label: ticket.whatsapp.as_ref().map(|w| w.name.to_uppercase()),
            owner_label: owner_label(ticket),
            timestamp_label: timestamp_label(&ticket.updated_at, now),
            preview: preview(ticket),
            unread_messages: ticket.unread_messages,
            tags: ticket.tags.clone(),
            pending: ticket.status == TicketStatus::Pending,
            actions: available_actions(ticket.status).to_vec(),
        }
    }
}

/// Uppercased queue name, or [`NO_QUEUE_LABEL`]
pub fn queue_label(ticket: &Ticket) -> String {
    ticket
        .queue
        .as_ref()
        .map(|q| q.name.to_uppercase())
        .unwrap_or_else(|| NO_QUEUE_LABEL.to_string())
}

/// Queue color, or [`NO_QUEUE_COLOR`]
pub fn queue_color(ticket: &Ticket) -> String {
    ticket
        .queue
        .as_ref()
        .and_then(|q| q.color.clone())
        .unwrap_or_else(|| NO_QUEUE_COLOR.to_string())
}

/// Uppercased owner name when the ticket has both an owner ID and record
pub fn owner_label(ticket: &Ticket) -> Option<String> {
    ticket.user_id?;
    ticket.user.as_ref().map(|u| u.name.to_uppercase())
}

/// Presence text while the contact is typing or recording, else the last message
pub fn preview(ticket: &Ticket) -> String {
    match ticket.presence() {
        Some(Presence::Composing) => "Digitando...".to_string(),
        Some(Presence::Recording) => "Gravando...".to_string(),
        None if ticket.last_message.contains(INLINE_IMAGE_MARKER) => {
            LOCATION_PREVIEW.to_string()
        }
        None => ticket.last_message.clone(),
    }
}

/// Time of day when `updated_at` falls on the same calendar day as `now`,
/// otherwise the date. Both are compared in `now`'s time zone.
pub fn timestamp_label<Tz, Tz2>(updated_at: &DateTime<Tz2>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz2: TimeZone,
    Tz::Offset: Display,
{
    let local = updated_at.with_timezone(&now.timezone());
    if local.date_naive() == now.date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%d/%m/%Y").to_string()
    }
}

/// Up to two uppercase initials from a display name
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let picked = match words.as_slice() {
        [] => Vec::new(),
        [only] => vec![*only],
        [first, .., last] => vec![*first, *last],
    };
    picked
        .iter()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
