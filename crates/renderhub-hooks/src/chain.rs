//! Hook chains — ordered, reusable hook bundles.
//!
//! A chain runs its hooks in append order and can be turned into a single
//! [`PreHook`]/[`PostHook`]. The composite hook is indistinguishable from a
//! primitive one, so a chain can be registered at one priority level or
//! nested inside another chain.

use crate::context::HookContext;
use crate::definitions::{Hook, PostHook, PreHook};
use crate::pipeline::{run_post_hooks, run_pre_hooks};

use renderhub_core::result::AppResult;

/// Ordered bundle of pre- and post-hooks.
#[derive(Debug, Clone, Default)]
pub struct HookChain {
    /// Pre-hooks in append order.
    pre: Vec<PreHook>,
    /// Post-hooks in append order.
    post: Vec<PostHook>,
}

impl HookChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the chain with pre-hooks.
    pub fn with_pre_hooks(mut self, hooks: impl IntoIterator<Item = PreHook>) -> Self {
        self.pre.extend(hooks);
        self
    }

    /// Seeds the chain with post-hooks.
    pub fn with_post_hooks(mut self, hooks: impl IntoIterator<Item = PostHook>) -> Self {
        self.post.extend(hooks);
        self
    }

    /// Appends a pre-hook.
    pub fn add_pre_hook(&mut self, hook: PreHook) -> &mut Self {
        self.pre.push(hook);
        self
    }

    /// Appends a post-hook.
    pub fn add_post_hook(&mut self, hook: PostHook) -> &mut Self {
        self.post.push(hook);
        self
    }

    /// Returns the chain's pre-hooks.
    pub fn pre_hooks(&self) -> &[PreHook] {
        &self.pre
    }

    /// Returns the chain's post-hooks.
    pub fn post_hooks(&self) -> &[PostHook] {
        &self.post
    }

    /// Returns whether the chain holds no hooks.
    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }

    /// Runs every pre-hook in order, stopping at the first failure.
    pub fn execute_pre_hooks(&self, ctx: &mut HookContext) -> AppResult<()> {
        run_pre_hooks(&self.pre, ctx)
    }

    /// Runs every post-hook in order, threading the output through each.
    ///
    /// An empty chain returns `ctx.output` unchanged.
    pub fn execute_post_hooks(&self, ctx: &mut HookContext) -> AppResult<String> {
        run_post_hooks(&self.post, ctx)
    }

    /// Returns a pre-hook that runs this chain's pre-hooks.
    ///
    /// The hook captures the chain as it is now; later appends are not seen.
    pub fn as_pre_hook(&self) -> PreHook {
        let chain = self.clone();
        PreHook::named("chain", move |ctx| chain.execute_pre_hooks(ctx))
    }

    /// Returns a post-hook that runs this chain's post-hooks.
    ///
    /// The hook captures the chain as it is now; later appends are not seen.
    pub fn as_post_hook(&self) -> PostHook {
        let chain = self.clone();
        PostHook::named("chain", move |ctx| chain.execute_post_hooks(ctx))
    }
}

impl FromIterator<Hook> for HookChain {
    fn from_iter<I: IntoIterator<Item = Hook>>(iter: I) -> Self {
        let mut chain = Self::new();
        for hook in iter {
            match hook {
                Hook::Pre(hook) => chain.add_pre_hook(hook),
                Hook::Post(hook) => chain.add_post_hook(hook),
            };
        }
        chain
    }
}
