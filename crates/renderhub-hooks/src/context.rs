//! Per-render hook context.

use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

/// Mapping-like render input handed to the template engine.
pub type DataMap = serde_json::Map<String, Value>;

/// Mutable record shared by every hook of a single render call.
///
/// One context is created per render and discarded afterwards. Hooks run
/// sequentially against it, so each hook observes the mutations of the
/// hooks that ran before it in the same stage.
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Correlation id for log lines emitted during this render.
    pub render_id: Uuid,
    /// Name of the template being rendered. Empty for inline content.
    pub template_name: String,
    /// Raw template text, when the render was given source directly.
    pub template_source: Option<String>,
    /// Render input. Pre-hooks may mutate or replace it.
    pub data: DataMap,
    /// Rendered output. Empty until the engine has run.
    pub output: String,
    /// Free-form values for cross-hook communication. Never read by the engine.
    pub metadata: HashMap<String, Value>,
    /// `true` while pre-hooks run, `false` once the engine has produced output.
    pub is_pre_stage: bool,
}

impl HookContext {
    /// Creates a pre-stage context for a named template.
    pub fn new(template_name: impl Into<String>, data: DataMap) -> Self {
        Self {
            render_id: Uuid::new_v4(),
            template_name: template_name.into(),
            template_source: None,
            data,
            output: String::new(),
            metadata: HashMap::new(),
            is_pre_stage: true,
        }
    }

    /// Creates a pre-stage context for inline template source.
    pub fn inline(source: impl Into<String>, data: DataMap) -> Self {
        Self::new(String::new(), data).with_source(source)
    }

    /// Sets the raw template text.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.template_source = Some(source.into());
        self
    }

    /// Sets the current output and moves the context to the post stage.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self.is_pre_stage = false;
        self
    }

    /// Inserts a metadata value, replacing any previous value for `key`.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Gets a metadata value by key.
    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Gets a string metadata value.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Gets a boolean metadata value.
    pub fn metadata_bool(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(|v| v.as_bool())
    }

    /// Gets an i64 metadata value.
    pub fn metadata_i64(&self, key: &str) -> Option<i64> {
        self.metadata.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a string value from the render data.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}
