//! Convenience result type alias for MyESI.

use crate::error::AppError;

/// A specialized `Result` type for MyESI operations.
pub type AppResult<T> = Result<T, AppError>;
