//! # renderhub-core
//!
//! Core crate for RenderHub. Contains the unified error system, the
//! result alias, and the configuration schemas shared by the hook
//! pipeline, the renderer, and the CLI.
//!
//! This crate has **no** internal dependencies on other RenderHub crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
