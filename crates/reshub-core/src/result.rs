//! Convenience result type alias for ResHub.

use crate::error::AppError;

/// A specialized `Result` type for ResHub operations.
pub type AppResult<T> = Result<T, AppError>;
