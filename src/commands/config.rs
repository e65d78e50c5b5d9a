//! Configuration management CLI commands.

use std::fs;
use std::path::Path;

use clap::{Args, Subcommand};

use renderhub_core::config::AppConfig;
use renderhub_core::error::AppError;
use renderhub_engine::Renderer;
use renderhub_hooks::common::hooks_from_config;

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration as JSON
    Show,
    /// Check that the renderer can be built from the configuration
    Validate,
    /// Generate a default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "renderhub.toml")]
        output: String,
    },
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: Option<&str>,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommand::Validate => {
            let renderer = Renderer::builder()
                .from_config(&super::renderer_config(config, None))
                .build()?;
            let chain = hooks_from_config(&config.hooks);

            println!(
                "Configuration '{}' is valid",
                config_path.unwrap_or("<defaults>")
            );
            println!(
                "  Templates: {}",
                renderer
                    .base_dir()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default()
            );
            println!("  Extension: {}", renderer.extension());
            println!("  Pre-hooks: {}", chain.pre_hooks().len());
            println!("  Post-hooks: {}", chain.post_hooks().len());
        }
        ConfigCommand::Generate { output: out_path } => {
            write_default_config(Path::new(out_path))?;
            println!("Default config written to '{}'", out_path);
        }
    }

    Ok(())
}

fn write_default_config(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::internal(format!("Failed to create dir: {}", e)))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::internal(format!("Failed to write config: {}", e)))
}
