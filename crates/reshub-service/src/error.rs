//! Reservation rejections.
//!
//! Every variant except `Storage` is a recoverable rejection that leaves the
//! snapshot untouched. `Storage` wraps a fatal [`AppError`] from the store.

use thiserror::Error;

use reshub_core::error::AppError;

use crate::policy::InvalidTimeFormat;

/// Why a reservation request was refused.
#[derive(Debug, Error)]
pub enum ReserveError {
    /// Someone already holds a live reservation on the resource.
    #[error("resource '{resource_id}' is already reserved")]
    AlreadyReserved {
        /// Requested resource.
        resource_id: String,
    },
    /// The requested deadline is malformed or not in the future.
    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),
    /// The resource id is not in the catalog.
    #[error("unknown resource '{0}'")]
    UnknownResource(String),
    /// The caller identity is empty.
    #[error("caller identity is missing")]
    UnknownIdentity,
    /// Loading or saving the snapshot failed.
    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<InvalidTimeFormat> for ReserveError {
    fn from(err: InvalidTimeFormat) -> Self {
        Self::InvalidDeadline(err.to_string())
    }
}

/// Why a release request was refused.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Nothing live is held on the resource.
    #[error("resource '{0}' is not reserved")]
    NotReserved(String),
    /// The reservation belongs to someone else.
    #[error("resource '{resource_id}' is reserved by another user")]
    NotOwner {
        /// Requested resource.
        resource_id: String,
    },
    /// The caller identity is empty.
    #[error("caller identity is missing")]
    UnknownIdentity,
    /// Loading or saving the snapshot failed.
    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<ReserveError> for AppError {
    fn from(err: ReserveError) -> Self {
        match err {
            ReserveError::Storage(inner) => inner,
            ReserveError::AlreadyReserved { .. } => AppError::conflict(err.to_string()),
            ReserveError::InvalidDeadline(_) => AppError::validation(err.to_string()),
            ReserveError::UnknownResource(_) => AppError::not_found(err.to_string()),
            ReserveError::UnknownIdentity => AppError::authentication(err.to_string()),
        }
    }
}

impl From<ReleaseError> for AppError {
    fn from(err: ReleaseError) -> Self {
        match err {
            ReleaseError::Storage(inner) => inner,
            ReleaseError::NotReserved(_) => AppError::not_found(err.to_string()),
            ReleaseError::NotOwner { .. } => AppError::authorization(err.to_string()),
            ReleaseError::UnknownIdentity => AppError::authentication(err.to_string()),
        }
    }
}

impl ReserveError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyReserved { .. } => "ALREADY_RESERVED",
            Self::InvalidDeadline(_) => "INVALID_DEADLINE",
            Self::UnknownResource(_) => "UNKNOWN_RESOURCE",
            Self::UnknownIdentity => "UNKNOWN_IDENTITY",
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }
}

impl ReleaseError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotReserved(_) => "NOT_RESERVED",
            Self::NotOwner { .. } => "NOT_OWNER",
            Self::UnknownIdentity => "UNKNOWN_IDENTITY",
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }
}

