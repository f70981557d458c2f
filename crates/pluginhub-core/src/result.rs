//! Convenience result type alias for PluginHub.

use crate::error::AppError;

/// A specialized `Result` type for PluginHub operations.
pub type AppResult<T> = Result<T, AppError>;
