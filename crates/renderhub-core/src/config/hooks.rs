//! Built-in hook configuration.
//!
//! Each field enables one of the common hooks the CLI registers before
//! rendering. Everything is off by default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Selection and settings of the common hooks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Copyright line prepended to code output.
    #[serde(default)]
    pub copyright: Option<String>,
    /// License text rendered as a comment block on code output.
    #[serde(default)]
    pub license: Option<String>,
    /// Prepend a "Generated on" timestamp line to Go output.
    #[serde(default)]
    pub timestamp: bool,
    /// Prepend a "DO NOT EDIT" warning to Go output.
    #[serde(default)]
    pub generated_warning: bool,
    /// Strip trailing spaces and tabs from every output line.
    #[serde(default)]
    pub trim_trailing_whitespace: bool,
    /// Data keys that must be present before rendering.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Values filled in for data keys the caller did not provide.
    #[serde(default)]
    pub defaults: Map<String, Value>,
}
