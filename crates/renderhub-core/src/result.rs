//! Convenience result type alias for RenderHub.

use crate::error::AppError;

/// A specialized `Result` type for RenderHub operations.
///
/// Hooks, the renderer, and the CLI all return this so errors flow through
/// the `?` operator without per-crate conversions.
pub type AppResult<T> = Result<T, AppError>;
