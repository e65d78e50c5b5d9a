//! # renderhub-hooks
//!
//! Hook orchestration for RenderHub. Provides:
//!
//! - [`HookContext`], the per-render record every hook reads and mutates
//! - [`PriorityHookRegistry`], priority-bucketed pre/post hook storage
//! - [`HookChain`], ordered hook bundles that can be registered as one hook
//! - [`RenderPipeline`], the pre-hooks → engine → post-hooks protocol
//! - [`common`], ready-made hooks for headers, validation, and defaults

pub mod chain;
pub mod common;
pub mod context;
pub mod definitions;
pub mod pipeline;
pub mod registry;

pub use chain::HookChain;
pub use context::{DataMap, HookContext};
pub use definitions::{Hook, HookCondition, PostHook, PreHook, Priority};
pub use pipeline::{RenderPipeline, RenderStage};
pub use registry::PriorityHookRegistry;
