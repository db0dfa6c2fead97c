//! Response types for the Field Operations Engine API.
//!
//! This module defines the error response structures and the mapping from
//! core errors to HTTP statuses. Every error kind keeps a distinct code so
//! the presentation layer can show "you are already checked in" instead of
//! a generic failure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

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

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<CoreError> for ApiErrorResponse {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("VALIDATION_ERROR", error.to_string()),
            },
            CoreError::NotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", error.to_string()),
            },
            CoreError::InvalidState { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("INVALID_STATE", error.to_string()),
            },
            CoreError::Conflict { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "ALREADY_CHECKED_IN",
                    error.to_string(),
                    "The worker must check out before checking in again",
                ),
            },
            CoreError::LocationUnavailable { .. } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::new("LOCATION_UNAVAILABLE", error.to_string()),
            },
            CoreError::ConfigNotFound { .. } | CoreError::ConfigParse { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    error.to_string(),
                ),
            },
        }
    }
}
