//! HTTP client for the ticket service
//!
//! Thin wrapper over a shared `reqwest::Client`. Every call checks the HTTP
//! status and maps failures into [`ServiceError`]; nothing is retried.

use crate::services::error::ServiceError;
use crate::services::types::{OutboundMessage, Setting, TicketUpdate};
use crate::services::TicketService;
use crate::tickets::model::TicketId;
use async_trait::async_trait;

/// Ticket service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpTicketService {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTicketService {
    /// Create a client for the service at `base_url`
    ///
    /// `token` is sent as a bearer token when present.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token,
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // Map non-2xx answers into ServiceError::Status, keeping the body for the toast
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());
        tracing::error!(
            status_code = status.as_u16(),
            error_body = %body,
            "Ticket service returned error status"
        );
        Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl TicketService for HttpTicketService {
    async fn update_ticket(
        &self,
        ticket_id: TicketId,
        update: &TicketUpdate,
    ) -> Result<(), ServiceError> {
        let url = self.url(&format!("/tickets/{}", ticket_id));
        tracing::debug!(url = %url, ticket_id, status = %update.status, "Updating ticket");

        let response = self
            .authorize(self.client.put(&url))
            .json(update)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn send_message(
        &self,
        ticket_id: TicketId,
        message: &OutboundMessage,
    ) -> Result<(), ServiceError> {
        let url = self.url(&format!("/messages/{}", ticket_id));
        tracing::debug!(url = %url, ticket_id, body_len = message.body.len(), "Sending message");

        let response = self
            .authorize(self.client.post(&url))
            .json(message)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_settings(&self) -> Result<Vec<Setting>, ServiceError> {
        let url = self.url("/settings/");
        tracing::debug!(url = %url, "Reading settings");

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check(response).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            ServiceError::InvalidResponse(format!(
                "Failed to parse settings: {} - Response body: {}",
                e, body
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::model::TicketStatus;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_update_ticket_sends_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/tickets/42")
            .match_header("content-type", "application/json")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::Json(json!({"status": "open", "userId": 7})))
            .with_status(200)
            .with_body(r#"{"id": 42, "status": "open"}"#)
            .create_async()
            .await;

        let service = HttpTicketService::new(
            reqwest::Client::new(),
            server.url(),
            Some("secret".to_string()),
        );
        let mut update = TicketUpdate::status(TicketStatus::Open);
        update.user_id = Some(7);
        let result = service.update_ticket(42, &update).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_update_ticket_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/tickets/42")
            .with_status(400)
            .with_body(r#"{"error": "ERR_OTHER_OPEN_TICKET"}"#)
            .create_async()
            .await;

        let service = HttpTicketService::new(reqwest::Client::new(), server.url(), None);
        let result = service
            .update_ticket(42, &TicketUpdate::status(TicketStatus::Open))
            .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.user_message(), "ERR_OTHER_OPEN_TICKET");
    }

    #[tokio::test]
    #[serial]
    async fn test_list_settings() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/settings/")
            .with_status(200)
            .with_body(
                r#"[
                    {"key": "userRating", "value": "disabled"},
                    {"key": "sendGreetingAccepted", "value": "enabled"}
                ]"#,
            )
            .create_async()
            .await;

        let service = HttpTicketService::new(reqwest::Client::new(), server.url(), None);
        let settings = service.list_settings().await.unwrap();

        mock.assert_async().await;
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[1].key, "sendGreetingAccepted");
        assert_eq!(settings[1].value, "enabled");
    }

    #[tokio::test]
    #[serial]
    async fn test_list_settings_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/settings/")
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let service = HttpTicketService::new(reqwest::Client::new(), server.url(), None);
        let result = service.list_settings().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ServiceError::InvalidResponse(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_send_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/messages/5")
            .match_body(Matcher::PartialJson(json!({"fromMe": true, "body": "oi"})))
            .with_status(200)
            .create_async()
            .await;

        let service = HttpTicketService::new(reqwest::Client::new(), server.url(), None);
        let result = service.send_message(5, &OutboundMessage::text("oi")).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service =
            HttpTicketService::new(reqwest::Client::new(), "http://localhost:8081/", None);
        assert_eq!(service.base_url(), "http://localhost:8081");
        assert_eq!(service.url("/settings/"), "http://localhost:8081/settings/");
    }
}
