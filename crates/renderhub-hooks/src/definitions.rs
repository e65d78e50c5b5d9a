//! Hook shapes, priorities, and run conditions.
//!
//! A hook is one of exactly two capability shapes:
//!
//! - [`PreHook`] runs before the engine and may mutate `data`/`metadata`.
//! - [`PostHook`] runs after the engine and returns the full replacement
//!   output. There is no diff mechanism; a no-op returns `ctx.output`.
//!
//! Both are cheap `Arc` handles. State a hook needs is captured by the
//! closure, never owned by the registry.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use renderhub_core::result::AppResult;

use crate::context::HookContext;

type PreHookFn = dyn Fn(&mut HookContext) -> AppResult<()> + Send + Sync;
type PostHookFn = dyn Fn(&mut HookContext) -> AppResult<String> + Send + Sync;
type ConditionFn = dyn Fn(&HookContext) -> bool + Send + Sync;

const ANONYMOUS: &str = "anonymous";

/// Execution priority. Lower values run first; ties run in registration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// Priority used when the caller has no ordering preference.
    pub const DEFAULT: Priority = Priority(0);

    /// Returns the raw priority value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callable invoked before template execution.
#[derive(Clone)]
pub struct PreHook {
    name: Cow<'static, str>,
    func: Arc<PreHookFn>,
}

impl PreHook {
    /// Wraps a closure as an anonymous pre-hook.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut HookContext) -> AppResult<()> + Send + Sync + 'static,
    {
        Self::named(ANONYMOUS, func)
    }

    /// Wraps a closure as a pre-hook with a name used in log output.
    pub fn named<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&mut HookContext) -> AppResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Returns the hook name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the hook.
    pub fn call(&self, ctx: &mut HookContext) -> AppResult<()> {
        (self.func)(ctx)
    }

    /// Returns a hook that only runs when `condition` holds.
    pub fn when(self, condition: HookCondition) -> Self {
        let name = self.name.clone();
        Self::named(name, move |ctx| {
            if condition.matches(ctx) {
                self.call(ctx)
            } else {
                Ok(())
            }
        })
    }
}

impl fmt::Debug for PreHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreHook")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Callable invoked after template execution.
#[derive(Clone)]
pub struct PostHook {
    name: Cow<'static, str>,
    func: Arc<PostHookFn>,
}

impl PostHook {
    /// Wraps a closure as an anonymous post-hook.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut HookContext) -> AppResult<String> + Send + Sync + 'static,
    {
        Self::named(ANONYMOUS, func)
    }

    /// Wraps a closure as a post-hook with a name used in log output.
    pub fn named<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&mut HookContext) -> AppResult<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Returns the hook name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the hook, returning the replacement output.
    pub fn call(&self, ctx: &mut HookContext) -> AppResult<String> {
        (self.func)(ctx)
    }

    /// Returns a hook that passes the output through unchanged unless
    /// `condition` holds.
    pub fn when(self, condition: HookCondition) -> Self {
        let name = self.name.clone();
        Self::named(name, move |ctx| {
            if condition.matches(ctx) {
                self.call(ctx)
            } else {
                Ok(ctx.output.clone())
            }
        })
    }
}

impl fmt::Debug for PostHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostHook")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Either hook shape, for APIs that accept both.
#[derive(Debug, Clone)]
pub enum Hook {
    /// Runs before the engine.
    Pre(PreHook),
    /// Runs after the engine.
    Post(PostHook),
}

impl Hook {
    /// Returns the wrapped hook's name.
    pub fn name(&self) -> &str {
        match self {
            Self::Pre(hook) => hook.name(),
            Self::Post(hook) => hook.name(),
        }
    }
}

impl From<PreHook> for Hook {
    fn from(hook: PreHook) -> Self {
        Self::Pre(hook)
    }
}

impl From<PostHook> for Hook {
    fn from(hook: PostHook) -> Self {
        Self::Post(hook)
    }
}

/// Predicate deciding whether a hook applies to a given render.
#[derive(Clone)]
pub struct HookCondition(Arc<ConditionFn>);

impl HookCondition {
    /// Wraps a predicate.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&HookContext) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    /// A condition that always holds.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Evaluates the condition.
    pub fn matches(&self, ctx: &HookContext) -> bool {
        (self.0)(ctx)
    }
}

impl fmt::Debug for HookCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HookCondition").finish_non_exhaustive()
    }
}
