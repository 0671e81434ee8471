//! API error type with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::booking::{BookingError, WizardError};
use crate::core_state::CoreError;
use crate::dashboard::DashboardError;
use crate::db::DatabaseError;
use crate::self_service::LookupError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::Forbidden(detail) => (StatusCode::FORBIDDEN, "FORBIDDEN", detail),
            ApiError::ConfirmationRequired(prompt) => {
                (StatusCode::CONFLICT, "CONFIRMATION_REQUIRED", prompt)
            }
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "CONFLICT", detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SessionNotFound(_) => ApiError::NotFound(err.to_string()),
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::WrongStep { .. }
            | WizardError::NoPreviousStep
            | WizardError::AlreadyConfirmed => ApiError::Conflict(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Core(e) => e.into(),
            BookingError::Wizard(e) => e.into(),
            BookingError::SymptomsRequired => ApiError::BadRequest(err.to_string()),
            BookingError::NotConfirmed => ApiError::Conflict(err.to_string()),
            BookingError::Receipt(e) => ApiError::Internal(e.to_string()),
            BookingError::Database(e) => e.into(),
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::ConfirmationRequired(prompt) => {
                ApiError::ConfirmationRequired(prompt.to_string())
            }
            LookupError::EmptyQuery | LookupError::InvalidRating => {
                ApiError::BadRequest(err.to_string())
            }
            LookupError::NotFound(_) => ApiError::NotFound(err.to_string()),
            LookupError::InvalidTransition { .. } | LookupError::AlreadyRated => {
                ApiError::Conflict(err.to_string())
            }
            LookupError::Database(e) => e.into(),
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::InvalidScope(_)
            | DashboardError::MissingField(_)
            | DashboardError::UnknownSpecialty(_) => ApiError::BadRequest(err.to_string()),
            DashboardError::ScopeViolation(_) => ApiError::Forbidden(err.to_string()),
            DashboardError::ClinicNotFound(_) | DashboardError::DoctorNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            DashboardError::Database(e) => e.into(),
        }
    }
}
