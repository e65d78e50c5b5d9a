//! CLI command definitions and dispatch.

pub mod config;
pub mod render;

use clap::{Parser, Subcommand};

use renderhub_core::config::AppConfig;
use renderhub_core::config::renderer::RendererConfig;
use renderhub_core::error::AppError;

/// RenderHub — template rendering with pre/post render hooks
#[derive(Debug, Parser)]
#[command(name = "renderhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a template file or inline template text
    Render(render::RenderArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Render(args) => render::execute(args, config),
            Commands::Config(args) => config::execute(args, config, self.config.as_deref()),
        }
    }
}

/// Renderer settings for a command: `base_dir` overrides the configured
/// directory, and the working directory is used when neither is set.
pub fn renderer_config(config: &AppConfig, base_dir: Option<&str>) -> RendererConfig {
    let mut renderer = config.renderer.clone();
    if let Some(dir) = base_dir {
        renderer.base_dir = Some(dir.to_string());
    }
    if renderer.base_dir.is_none() {
        renderer.base_dir = Some(".".to_string());
    }
    renderer
}
