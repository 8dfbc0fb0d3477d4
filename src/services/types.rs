//! Request and response payloads of the ticket service

use crate::tickets::model::{TicketStatus, UserId};
use serde::{Deserialize, Serialize};

/// Partial ticket update sent to `PUT /tickets/{id}`
///
/// `None` fields are left out of the body. `prompt_id` and
/// `integration_id` are doubly optional so a transition can send an explicit
/// `null` to clear the association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    /// New status
    pub status: TicketStatus,
    /// Owning user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Owning queue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_id: Option<i64>,
    /// Whether an integration keeps answering the ticket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_integration: Option<bool>,
    /// Prompt association; `Some(None)` clears it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_id: Option<Option<i64>>,
    /// Integration association; `Some(None)` clears it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<Option<i64>>,
}

impl TicketUpdate {
    /// Update that only sets the status
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status,
            user_id: None,
            queue_id: None,
            use_integration: None,
            prompt_id: None,
            integration_id: None,
        }
    }
}

/// Message sent to `POST /messages/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Already read on the agent side
    pub read: bool,
    /// Sent by the agent rather than the contact
    pub from_me: bool,
    /// Attached media; empty for text
    pub media_url: String,
    /// Message text
    pub body: String,
}

impl OutboundMessage {
    /// Plain text message sent by the agent
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            read: true,
            from_me: true,
            media_url: String::new(),
            body: body.into(),
        }
    }
}

/// One entry of `GET /settings/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// Setting key
    pub key: String,
    /// Setting value
    #[serde(default)]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_only_update_omits_everything_else() {
        let json = serde_json::to_value(TicketUpdate::status(TicketStatus::Open)).unwrap();
        assert_eq!(json, json!({"status": "open"}));
    }

    #[test]
    fn test_cleared_associations_serialize_as_null() {
        let update = TicketUpdate {
            status: TicketStatus::Closed,
            user_id: Some(7),
            queue_id: None,
            use_integration: Some(false),
            prompt_id: Some(None),
            integration_id: Some(None),
        };
        let json = serde_json::to_value(update).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "closed",
                "userId": 7,
                "useIntegration": false,
                "promptId": null,
                "integrationId": null
            })
        );
    }

    #[test]
    fn test_outbound_message_wire_format() {
        let json = serde_json::to_value(OutboundMessage::text("oi")).unwrap();
        assert_eq!(
            json,
            json!({"read": true, "fromMe": true, "mediaUrl": "", "body": "oi"})
        );
    }
}
