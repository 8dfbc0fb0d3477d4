//! Error types and error handling for the desk bridge
//!
//! This module defines the error type returned by HTTP handlers.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::services::ServiceError;
use crate::tickets::actions::NotSelectable;
use crate::tickets::TransitionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Ticket with the given ID is not mounted
    #[error("Ticket not found: {0}")]
    TicketNotFound(i64),

    /// A ticket transition could not be carried out
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Pending tickets cannot be opened in the conversation view
    #[error(transparent)]
    NotSelectable(#[from] NotSelectable),

    /// No acting agent is configured
    #[error("No agent session configured")]
    NoSession,

    /// Request payload is invalid
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::TicketNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Transition(e) => match e {
                TransitionError::NotMounted(_) => StatusCode::NOT_FOUND,
                TransitionError::InFlight(_) => StatusCode::CONFLICT,
                TransitionError::InvalidStatus { .. } => StatusCode::CONFLICT,
                TransitionError::Service(ServiceError::Status { status, .. })
                    if (400..500).contains(status) =>
                {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                TransitionError::Service(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::NotSelectable(_) => StatusCode::CONFLICT,
            AppError::NoSession => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::Transition(e) => e.user_message(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
