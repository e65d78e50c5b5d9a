//! Unified application error types for RenderHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Hooks return it directly, and the
//! render pipeline wraps a failing hook's error into a stage-specific one.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource (usually a template) was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A file-system I/O error occurred.
    Io,
    /// The template engine failed to load, parse, or execute a template.
    Template,
    /// A pre-hook aborted the render.
    PreHook,
    /// A post-hook aborted the render.
    PostHook,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Io => write!(f, "IO"),
            Self::Template => write!(f, "TEMPLATE"),
            Self::PreHook => write!(f, "PRE_HOOK"),
            Self::PostHook => write!(f, "POST_HOOK"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout RenderHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a template engine error.
    pub fn template(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Template, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Wrap a pre-hook failure. The original error is kept as the source.
    pub fn pre_hook(cause: AppError) -> Self {
        let message = format!("pre-hook failed: {}", cause.message);
        Self::with_source(ErrorKind::PreHook, message, cause)
    }

    /// Wrap an engine failure. The original error is kept as the source.
    pub fn template_execution(cause: AppError) -> Self {
        let message = format!("template execution failed: {}", cause.message);
        Self::with_source(ErrorKind::Template, message, cause)
    }

    /// Wrap a post-hook failure. The original error is kept as the source.
    pub fn post_hook(cause: AppError) -> Self {
        let message = format!("post-hook failed: {}", cause.message);
        Self::with_source(ErrorKind::PostHook, message, cause)
    }

    /// Returns `true` if this error was raised by one of the hook stages.
    pub fn is_hook_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::PreHook | ErrorKind::PostHook)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Io, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
