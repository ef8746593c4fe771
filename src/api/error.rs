//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::AuthError;
use crate::db::repository::turn::TurnActionError;
use crate::db::DatabaseError;
use crate::media::MediaError;
use crate::models::TurnStateError;
use crate::validate::FieldError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    #[error("turn not yet accepted")]
    TurnNotAccepted,
    #[error("turn already accepted")]
    TurnAlreadyAccepted,
    #[error("turn already has an appointment")]
    TurnAlreadyVisited,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Authentication required".to_string(),
                None,
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
                None,
            ),
            ApiError::Forbidden(detail) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", detail.clone(), None)
            }
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone(), None)
            }
            ApiError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION",
                message.clone(),
                Some(field.clone()),
            ),
            ApiError::TurnNotAccepted => (
                StatusCode::CONFLICT,
                "TURN_NOT_ACCEPTED",
                "turn not yet accepted".to_string(),
                None,
            ),
            ApiError::TurnAlreadyAccepted => (
                StatusCode::CONFLICT,
                "TURN_ALREADY_ACCEPTED",
                "turn already accepted".to_string(),
                None,
            ),
            ApiError::TurnAlreadyVisited => (
                StatusCode::CONFLICT,
                "TURN_ALREADY_VISITED",
                "turn already has an appointment".to_string(),
                None,
            ),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone(), None)
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                field,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::Validation {
            field: err.field.to_string(),
            message: err.message.to_string(),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, .. } => {
                ApiError::NotFound(format!("{entity_type} not found"))
            }
            DatabaseError::Duplicate { field } => ApiError::Validation {
                message: format!("a record with that {field} already exists"),
                field,
            },
            DatabaseError::ConstraintViolation(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<TurnStateError> for ApiError {
    fn from(err: TurnStateError) -> Self {
        match err {
            TurnStateError::NotYetAccepted => ApiError::TurnNotAccepted,
            TurnStateError::AlreadyAccepted => ApiError::TurnAlreadyAccepted,
            TurnStateError::AlreadyVisited => ApiError::TurnAlreadyVisited,
        }
    }
}

impl From<TurnActionError> for ApiError {
    fn from(err: TurnActionError) -> Self {
        match err {
            TurnActionError::State(e) => e.into(),
            TurnActionError::Database(e) => e.into(),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::UnsupportedType | MediaError::TooLarge => {
                ApiError::BadRequest(err.to_string())
            }
            MediaError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Hash => ApiError::Internal("password hashing failed".into()),
        }
    }
}
