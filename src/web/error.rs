//! API error handling for the staffmail HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::StaffmailError;

/// API error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message.
    pub message: String,
}

/// API error type.
///
/// Authentication failures are 401. Every other failure the API reports is
/// a 400 carrying a message.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message returned to the client.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create a bad request error from validator::ValidationErrors.
    ///
    /// Field messages are sorted by field name and joined into one message.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| {
                    let detail = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "invalid value".to_string());
                    format!("{field}: {detail}")
                })
            })
            .collect();
        messages.sort();

        Self::bad_request(messages.join("; "))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StaffmailError> for ApiError {
    fn from(err: StaffmailError) -> Self {
        match err {
            StaffmailError::Auth(msg) => ApiError::unauthorized(msg),
            StaffmailError::Permission(msg)
            | StaffmailError::Validation(msg)
            | StaffmailError::Transport(msg) => ApiError::bad_request(msg),
            err @ StaffmailError::NotFound(_) => ApiError::bad_request(err.to_string()),
            StaffmailError::Database(msg) | StaffmailError::DatabaseConnection(msg) => {
                tracing::error!("Store error: {}", msg);
                ApiError::bad_request(msg)
            }
            err => {
                tracing::error!("Internal error: {}", err);
                ApiError::bad_request(err.to_string())
            }
        }
    }
}
