//! RenderHub — renders templates through prioritized pre/post hooks.
//!
//! Loads configuration, initializes logging, and dispatches the CLI command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use renderhub_core::config::AppConfig;
use renderhub_core::config::logging::LoggingConfig;

mod commands;

use commands::Cli;

fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging, cli.verbose);

    if let Err(e) = cli.execute(&config) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. Output goes to stderr so rendered templates
/// can be piped from stdout.
fn init_logging(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
