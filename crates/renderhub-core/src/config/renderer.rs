//! Renderer configuration.

use serde::{Deserialize, Serialize};

/// Template loading and engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Directory templates are loaded from.
    #[serde(default)]
    pub base_dir: Option<String>,
    /// Extension appended to template names that do not already carry it.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Whether HTML auto-escaping is enabled for `.html`/`.htm`/`.xml` templates.
    #[serde(default)]
    pub autoescape: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            extension: default_extension(),
            autoescape: false,
        }
    }
}

/// Default template extension.
pub fn default_extension() -> String {
    ".tpl".to_string()
}
