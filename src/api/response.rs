//! Response types for the attendance API.
//!
//! This module defines the error response structures and the mapping from
//! [`ClockError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a not-found error response for the named entity.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::new("NOT_FOUND", format!("{} {} not found", entity, id))
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 404 response.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::not_found(entity, id),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ClockError> for ApiErrorResponse {
    fn from(error: ClockError) -> Self {
        let status = if error.is_state_violation() {
            StatusCode::CONFLICT
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let message = error.to_string();
        let error = match error {
            ClockError::AlreadyClockedIn { .. } => ApiError::with_details(
                "ALREADY_CLOCKED_IN",
                message,
                "Clock out of the open record before clocking in again",
            ),
            ClockError::OpenPauseExists { .. } => ApiError::with_details(
                "OPEN_PAUSE_EXISTS",
                message,
                "End the open pause before clocking out",
            ),
            ClockError::InvalidOrClosedRecord { .. } => {
                ApiError::new("INVALID_OR_CLOSED_RECORD", message)
            }
            ClockError::PauseAlreadyOpen { .. } => ApiError::with_details(
                "PAUSE_ALREADY_OPEN",
                message,
                "End the open pause before starting another",
            ),
            ClockError::Storage { .. } => {
                ApiError::with_details("STORAGE_ERROR", "Storage failure", message)
            }
            ClockError::ConfigNotFound { .. }
            | ClockError::ConfigParseError { .. }
            | ClockError::InvalidConfig { .. } => {
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message)
            }
        };
        ApiErrorResponse { status, error }
    }
}
