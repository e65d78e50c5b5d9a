//! Shared test helpers for integration tests.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use renderhub_engine::Renderer;
use renderhub_hooks::{PostHook, PreHook};

/// Execution log shared between hooks.
pub type Log = Arc<Mutex<Vec<String>>>;

/// Template directory backed by a temporary folder
pub struct TemplateDir {
    dir: TempDir,
}

impl TemplateDir {
    /// Create an empty template directory
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Write a template file, creating parent directories
    pub fn write(&self, name: &str, source: &str) -> &Self {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create template subdir");
        }
        fs::write(path, source).expect("Failed to write template");
        self
    }

    /// Path of the directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Build a renderer over this directory
    pub fn renderer(&self) -> Renderer {
        Renderer::builder()
            .base_dir(self.path())
            .build()
            .expect("Failed to build renderer")
    }
}

/// Build a renderer from embedded templates
pub fn embedded(templates: &[(&str, &str)]) -> Renderer {
    templates
        .iter()
        .fold(Renderer::builder(), |builder, (name, source)| {
            builder.template(*name, *source)
        })
        .build()
        .expect("Failed to build renderer")
}

/// Pre-hook that appends `marker` to `log`
pub fn marker_pre(log: &Log, marker: &str) -> PreHook {
    let log = Arc::clone(log);
    let marker = marker.to_string();
    PreHook::new(move |_| {
        log.lock().unwrap().push(marker.clone());
        Ok(())
    })
}

/// Post-hook that prepends `prefix` to the output
pub fn prefix_post(prefix: &'static str) -> PostHook {
    PostHook::new(move |ctx| Ok(format!("{prefix}{}", ctx.output)))
}

/// Snapshot of a log
pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}
