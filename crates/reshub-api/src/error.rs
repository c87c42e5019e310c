//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use reshub_core::error::{AppError, ErrorKind};
use reshub_service::{ReleaseError, ReserveError};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An error on its way to becoming an HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Machine-readable code placed in the body.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Creates an error with the given status and body code.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 401 for a missing or unusable identity header.
    pub fn unknown_identity(header: &str) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNKNOWN_IDENTITY",
            format!("Missing caller identity header '{header}'"),
        )
    }

    /// 400 for an unreadable request body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = match err.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::Internal
            | ErrorKind::Storage
            | ErrorKind::Configuration
            | ErrorKind::Serialization => {
                tracing::error!(kind = %err.kind, error = %err.message, "Internal server error");
                return Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Reservation state is temporarily unavailable",
                );
            }
        };
        Self::new(status, code, err.message)
    }
}

impl From<ReserveError> for ApiError {
    fn from(err: ReserveError) -> Self {
        let status = match &err {
            ReserveError::AlreadyReserved { .. } => StatusCode::CONFLICT,
            ReserveError::InvalidDeadline(_) => StatusCode::BAD_REQUEST,
            ReserveError::UnknownResource(_) => StatusCode::NOT_FOUND,
            ReserveError::UnknownIdentity => StatusCode::UNAUTHORIZED,
            ReserveError::Storage(_) => return AppError::from(err).into(),
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<ReleaseError> for ApiError {
    fn from(err: ReleaseError) -> Self {
        let status = match &err {
            ReleaseError::NotReserved(_) => StatusCode::NOT_FOUND,
            ReleaseError::NotOwner { .. } => StatusCode::FORBIDDEN,
            ReleaseError::UnknownIdentity => StatusCode::UNAUTHORIZED,
            ReleaseError::Storage(_) => return AppError::from(err).into(),
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            error: self.code.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
