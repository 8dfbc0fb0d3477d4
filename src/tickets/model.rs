// Ticket projection types
// Read-mostly local copy of the ticket service's records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket identifier assigned by the ticket service
pub type TicketId = i64;

/// User identifier assigned by the ticket service
pub type UserId = i64;

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Waiting in a queue for an agent to accept it
    Pending,
    /// Being handled by an agent
    Open,
    /// Finished; still listed, can be reopened
    Closed,
}

impl TicketStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::Open => "open",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typing indicator reported for the contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Contact is typing
    Composing,
    /// Contact is recording audio
    Recording,
}

impl Presence {
    /// Parse a presence string; anything else means no indicator
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "composing" => Some(Presence::Composing),
            "recording" => Some(Presence::Recording),
            _ => None,
        }
    }
}

/// Owning user reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    /// User ID
    pub id: UserId,
    /// Display name
    pub name: String,
}

/// Queue (department) the ticket is routed through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Queue {
    /// Queue ID
    pub id: i64,
    /// Queue name
    pub name: String,
    /// Queue color as a CSS hex string
    #[serde(default)]
    pub color: Option<String>,
}

/// Messaging connection that carries the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Connection ID
    pub id: i64,
    /// Connection name
    pub name: String,
}

/// Customer on the other end of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Contact ID
    pub id: i64,
    /// Contact name
    pub name: String,
    /// Phone number or channel address
    #[serde(default)]
    pub number: String,
    /// Avatar URL
    #[serde(default)]
    pub profile_pic_url: Option<String>,
}

/// Tag attached to the ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag ID
    pub id: i64,
    /// Tag name
    pub name: String,
    /// Tag color as a CSS hex string
    #[serde(default)]
    pub color: Option<String>,
}

/// Local projection of a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Ticket ID
    pub id: TicketId,
    /// Conversation route key
    pub uuid: String,
    /// Current status
    pub status: TicketStatus,
    /// Owning user ID
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Owning user
    #[serde(default)]
    pub user: Option<UserRef>,
    /// Owning queue ID
    #[serde(default)]
    pub queue_id: Option<i64>,
    /// Owning queue
    #[serde(default)]
    pub queue: Option<Queue>,
    /// Connection ID
    #[serde(default)]
    pub whatsapp_id: Option<i64>,
    /// Connection
    #[serde(default)]
    pub whatsapp: Option<Connection>,
    /// Customer contact
    pub contact: Contact,
    /// Messages not yet read by an agent
    #[serde(default)]
    pub unread_messages: u32,
    /// Body of the last message
    #[serde(default)]
    pub last_message: String,
    /// Time of last activity
    pub updated_at: DateTime<Utc>,
    /// Raw presence indicator; see [`Ticket::presence`]
    #[serde(default)]
    pub presence: Option<String>,
    /// Whether the conversation is a group chat
    #[serde(default)]
    pub is_group: bool,
    /// Tags
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Ticket {
    /// Parsed presence indicator
    pub fn presence(&self) -> Option<Presence> {
        self.presence.as_deref().and_then(Presence::parse)
    }

    /// Queue ID, preferring the embedded queue record
    pub fn queue_ref(&self) -> Option<i64> {
        self.queue.as_ref().map(|q| q.id).or(self.queue_id)
    }
}

/// Acting agent for ticket actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User ID
    pub id: UserId,
    /// Display name, interpolated into the accept greeting
    pub name: String,
    /// Profile string, checked against the rule table
    pub profile: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Minimal ticket used across unit tests
    pub fn ticket(id: TicketId, status: TicketStatus) -> Ticket {
        Ticket {
            id,
            uuid: format!("uuid-{}", id),
            status,
            user_id: None,
            user: None,
            queue_id: None,
            queue: None,
            whatsapp_id: None,
            whatsapp: None,
            contact: Contact {
                id: 100 + id,
                name: "Maria Silva".to_string(),
                number: "5511999990000".to_string(),
                profile_pic_url: None,
            },
            unread_messages: 0,
            last_message: String::new(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 10, 14, 5, 0).unwrap(),
            presence: None,
            is_group: false,
            tags: Vec::new(),
        }
    }

    pub fn agent() -> SessionUser {
        SessionUser {
            id: 7,
            name: "Carla".to_string(),
            profile: "user".to_string(),
        }
    }
}
