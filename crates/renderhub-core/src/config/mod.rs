//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file overlaid with `RENDERHUB__*` environment variables.

pub mod hooks;
pub mod logging;
pub mod renderer;

use serde::{Deserialize, Serialize};
use tracing::debug;

use self::hooks::HooksConfig;
use self::logging::LoggingConfig;
use self::renderer::RendererConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "RENDERHUB";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Template loading and engine settings.
    #[serde(default)]
    pub renderer: RendererConfig,
    /// Common hooks to register.
    #[serde(default)]
    pub hooks: HooksConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// A missing file is not an error; every section falls back to its
    /// defaults. Environment variables use `__` as the section separator,
    /// e.g. `RENDERHUB__RENDERER__BASE_DIR=templates`.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path, "Adding configuration file source");
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
