//! Greeting sent when an agent accepts a ticket
//!
//! Runs only after the accept transition is confirmed. Its outcome is
//! reported but never undoes the transition.

use crate::services::{OutboundMessage, ServiceError, Setting, TicketService};
use crate::tickets::model::Ticket;
use serde::Serialize;

/// Settings key that switches the greeting on
pub const SETTING_KEY: &str = "sendGreetingAccepted";

/// Settings value meaning "on"
pub const ENABLED: &str = "enabled";

/// Build the greeting body for `agent_name`
///
/// `{{ms}}` and `{{name}}` are left for the ticket service to substitute
/// (salutation and contact name).
pub fn body(agent_name: &str) -> String {
    let msg = format!(
        "{{{{ms}}}} *{{{{name}}}}*, meu nome é *{}* e agora vou prosseguir com seu atendimento!",
        agent_name
    );
    format!("*Mensagem Automática:*\n{}", msg.trim())
}

/// Whether the settings switch the greeting on
///
/// A missing entry counts as disabled.
pub fn is_enabled(settings: &[Setting]) -> bool {
    settings
        .iter()
        .find(|s| s.key == SETTING_KEY)
        .is_some_and(|s| s.value == ENABLED)
}

/// What happened to the greeting after an accept
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum GreetingOutcome {
    /// The transition was not an accept
    NotApplicable,
    /// One greeting message was sent
    Sent,
    /// The setting is off, absent or not readable as a list
    Disabled,
    /// Group conversations are never greeted
    Group,
    /// Settings could not be read; greeting skipped
    SettingsUnavailable(String),
    /// The message was rejected or could not be delivered
    SendFailed(String),
}

/// Send the accept greeting for `ticket` if the settings allow it
pub async fn dispatch(
    service: &dyn TicketService,
    ticket: &Ticket,
    agent_name: &str,
) -> GreetingOutcome {
    let settings = match service.list_settings().await {
        Ok(settings) => settings,
        Err(ServiceError::InvalidResponse(detail)) => {
            tracing::warn!(ticket_id = ticket.id, detail = %detail, "Unreadable settings, greeting skipped");
            return GreetingOutcome::Disabled;
        }
        Err(e) => return GreetingOutcome::SettingsUnavailable(e.user_message()),
    };

    if !is_enabled(&settings) {
        tracing::debug!(
            ticket_id = ticket.id,
            settings = settings.len(),
            "Accept greeting disabled"
        );
        return GreetingOutcome::Disabled;
    }
    if ticket.is_group {
        return GreetingOutcome::Group;
    }

    let message = OutboundMessage::text(body(agent_name));
    match service.send_message(ticket.id, &message).await {
        Ok(()) => GreetingOutcome::Sent,
        Err(e) => GreetingOutcome::SendFailed(e.user_message()),
    }
}
