//! Render pipeline — pre-hooks, engine execution, post-hooks.
//!
//! One call to [`RenderPipeline::run`] drives a single render:
//!
//! 1. Snapshot the registry's pre- and post-hooks before any hook runs.
//! 2. Run the pre-hooks against the context.
//! 3. Invoke the engine with the (possibly mutated) context.
//! 4. Store the raw output and leave the pre stage.
//! 5. Run the post-hooks, threading the output through each.
//!
//! Hooks registered once a render has started only apply to later renders.
//!
//! The first failure at any stage aborts the render. Partial output is
//! never returned; the error names the failing stage and keeps the cause.

use std::fmt;

use tracing::{debug, debug_span, trace, warn};

use renderhub_core::error::AppError;
use renderhub_core::result::AppResult;

use crate::context::HookContext;
use crate::definitions::{PostHook, PreHook};
use crate::registry::PriorityHookRegistry;

/// Stages of a single render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStage {
    /// Pre-hooks are running.
    PreHooks,
    /// The template engine is executing.
    Engine,
    /// Post-hooks are running.
    PostHooks,
    /// The render finished with output.
    Completed,
}

impl RenderStage {
    /// Returns the string name of this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreHooks => "pre_hooks",
            Self::Engine => "engine",
            Self::PostHooks => "post_hooks",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Drives one render through the hooks of a registry.
#[derive(Debug, Clone, Copy)]
pub struct RenderPipeline<'a> {
    registry: &'a PriorityHookRegistry,
}

impl<'a> RenderPipeline<'a> {
    /// Creates a pipeline over `registry`.
    pub fn new(registry: &'a PriorityHookRegistry) -> Self {
        Self { registry }
    }

    /// Runs the full protocol for `ctx`, calling `execute` as the engine.
    ///
    /// Pre-hook, engine, and post-hook failures are wrapped into
    /// [`ErrorKind::PreHook`](renderhub_core::ErrorKind::PreHook),
    /// [`ErrorKind::Template`](renderhub_core::ErrorKind::Template) and
    /// [`ErrorKind::PostHook`](renderhub_core::ErrorKind::PostHook).
    pub fn run<F>(&self, mut ctx: HookContext, execute: F) -> AppResult<String>
    where
        F: FnOnce(&HookContext) -> AppResult<String>,
    {
        let _span = debug_span!(
            "render",
            render_id = %ctx.render_id,
            template = %ctx.template_name
        )
        .entered();

        ctx.is_pre_stage = true;
        ctx.output.clear();

        let pre_hooks = self.registry.pre_hooks();
        let post_hooks = self.registry.post_hooks();

        debug!(stage = %RenderStage::PreHooks, count = pre_hooks.len(), "Running pre-hooks");
        if let Err(err) = run_pre_hooks(&pre_hooks, &mut ctx) {
            warn!(stage = %RenderStage::PreHooks, error = %err, "Render aborted");
            return Err(AppError::pre_hook(err));
        }

        debug!(stage = %RenderStage::Engine, "Executing template");
        let raw = match execute(&ctx) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(stage = %RenderStage::Engine, error = %err, "Render aborted");
                return Err(AppError::template_execution(err));
            }
        };

        ctx.output = raw;
        ctx.is_pre_stage = false;

        debug!(stage = %RenderStage::PostHooks, count = post_hooks.len(), "Running post-hooks");
        let output = match run_post_hooks(&post_hooks, &mut ctx) {
            Ok(output) => output,
            Err(err) => {
                warn!(stage = %RenderStage::PostHooks, error = %err, "Render aborted");
                return Err(AppError::post_hook(err));
            }
        };

        debug!(stage = %RenderStage::Completed, bytes = output.len(), "Render completed");
        Ok(output)
    }
}

/// Runs `hooks` in order, stopping at the first failure.
///
/// The failing hook's error is returned unchanged.
pub fn run_pre_hooks(hooks: &[PreHook], ctx: &mut HookContext) -> AppResult<()> {
    for hook in hooks {
        trace!(hook = hook.name(), "Running pre-hook");
        hook.call(ctx).inspect_err(|err| {
            debug!(hook = hook.name(), error = %err, "Pre-hook failed");
        })?;
    }
    Ok(())
}

/// Runs `hooks` in order, threading the output through each one.
///
/// Every hook sees the output produced by the hook before it, both in
/// `ctx.output` and in the return value. On the first failure the error is
/// returned unchanged and no output is produced.
pub fn run_post_hooks(hooks: &[PostHook], ctx: &mut HookContext) -> AppResult<String> {
    for hook in hooks {
        trace!(hook = hook.name(), "Running post-hook");
        let output = hook.call(ctx).inspect_err(|err| {
            debug!(hook = hook.name(), error = %err, "Post-hook failed");
        })?;
        ctx.output = output;
    }
    Ok(ctx.output.clone())
}
