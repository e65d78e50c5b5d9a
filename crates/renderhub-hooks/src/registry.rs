//! Hook registry — pre/post hooks stored in priority buckets.
//!
//! Buckets are keyed by [`Priority`] and visited in ascending order, so
//! priorities may be registered in any order. Within a bucket hooks keep
//! their registration order. Buckets are never removed.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::definitions::{Hook, PostHook, PreHook, Priority};

#[derive(Debug, Default)]
struct Buckets {
    /// Priority → pre-hooks in registration order.
    pre: BTreeMap<Priority, Vec<PreHook>>,
    /// Priority → post-hooks in registration order.
    post: BTreeMap<Priority, Vec<PostHook>>,
}

/// Registry of pre- and post-hooks ordered by priority.
///
/// Registration and reads may happen from different threads. Reads share
/// the lock; a registration holds it exclusively only while it appends to
/// a bucket. Readers receive an owned snapshot, so a render in progress is
/// unaffected by hooks registered after its snapshot was taken.
#[derive(Debug, Default)]
pub struct PriorityHookRegistry {
    buckets: RwLock<Buckets>,
}

impl PriorityHookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pre-hook at `priority`.
    pub fn add_pre_hook(&self, hook: PreHook, priority: impl Into<Priority>) {
        let priority = priority.into();
        debug!(hook = hook.name(), %priority, "Pre-hook registered");
        self.write().pre.entry(priority).or_default().push(hook);
    }

    /// Registers a post-hook at `priority`.
    pub fn add_post_hook(&self, hook: PostHook, priority: impl Into<Priority>) {
        let priority = priority.into();
        debug!(hook = hook.name(), %priority, "Post-hook registered");
        self.write().post.entry(priority).or_default().push(hook);
    }

    /// Registers either hook shape at `priority`.
    pub fn add(&self, hook: impl Into<Hook>, priority: impl Into<Priority>) {
        match hook.into() {
            Hook::Pre(hook) => self.add_pre_hook(hook, priority),
            Hook::Post(hook) => self.add_post_hook(hook, priority),
        }
    }

    /// Returns all pre-hooks in execution order.
    pub fn pre_hooks(&self) -> Vec<PreHook> {
        self.read().pre.values().flatten().cloned().collect()
    }

    /// Returns all post-hooks in execution order.
    pub fn post_hooks(&self) -> Vec<PostHook> {
        self.read().post.values().flatten().cloned().collect()
    }

    /// Returns the number of registered pre-hooks.
    pub fn pre_hook_count(&self) -> usize {
        self.read().pre.values().map(Vec::len).sum()
    }

    /// Returns the number of registered post-hooks.
    pub fn post_hook_count(&self) -> usize {
        self.read().post.values().map(Vec::len).sum()
    }

    /// Returns whether no hooks of either shape are registered.
    pub fn is_empty(&self) -> bool {
        self.pre_hook_count() == 0 && self.post_hook_count() == 0
    }

    // Registration never fails, so a poisoned lock is recovered rather than
    // propagated. The bucket maps are valid after any interrupted push.
    fn read(&self) -> RwLockReadGuard<'_, Buckets> {
        self.buckets.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Buckets> {
        self.buckets.write().unwrap_or_else(|e| e.into_inner())
    }
}
