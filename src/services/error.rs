//! Ticket service error types

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by calls to the ticket service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Request could not be sent or the connection failed
    #[error("Failed to reach ticket service: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Ticket service returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response from ticket service: {0}")]
    InvalidResponse(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ServiceError {
    /// Text to show in a toast
    ///
    /// Uses the service's own `{"error": "..."}` message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Status { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .map(|b| b.error)
                .unwrap_or_else(|_| self.to_string()),
            _ => self.to_string(),
        }
    }

    /// HTTP status returned by the service, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            ServiceError::Transport(e) => e.status().map(|s| s.as_u16()),
            ServiceError::InvalidResponse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_service_error_text() {
        let err = ServiceError::Status {
            status: 400,
            body: r#"{"error": "ERR_OTHER_OPEN_TICKET"}"#.to_string(),
        };
        assert_eq!(err.user_message(), "ERR_OTHER_OPEN_TICKET");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_user_message_falls_back_to_display() {
        let err = ServiceError::Status {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert!(err.user_message().contains("502"));
        assert!(err.user_message().contains("Bad Gateway"));
    }
}
