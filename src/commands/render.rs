//! Template rendering command.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::Value;
use tracing::{debug, info};

use renderhub_core::config::AppConfig;
use renderhub_core::error::AppError;
use renderhub_engine::{Renderer, to_data_map};
use renderhub_hooks::common::hooks_from_config;
use renderhub_hooks::{DataMap, Priority};

/// Arguments for the render command
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template name (resolved under the template directory) or inline
    /// template text containing `{{` or `{%`
    pub input: String,

    /// JSON file holding the render data
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Set a data value, e.g. `name=World` or `server.port=8080`.
    /// Values are parsed as JSON and fall back to plain strings.
    #[arg(short, long = "set", value_parser = parse_assignment)]
    pub set: Vec<(String, Value)>,

    /// Write the output to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Template directory, overriding the configuration
    #[arg(short, long)]
    pub base_dir: Option<String>,
}

/// Execute the render command
pub fn execute(args: &RenderArgs, config: &AppConfig) -> Result<(), AppError> {
    let renderer_config = super::renderer_config(config, args.base_dir.as_deref());
    let renderer = Renderer::builder().from_config(&renderer_config).build()?;
    let chain = hooks_from_config(&config.hooks);
    debug!(
        pre = chain.pre_hooks().len(),
        post = chain.post_hooks().len(),
        "Registering configured hooks"
    );
    renderer.register_chain(&chain, Priority::DEFAULT);

    let data = build_data(args.data.as_deref(), &args.set)?;

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::internal(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
            let mut file = fs::File::create(path).map_err(|e| {
                AppError::internal(format!("Failed to create {}: {}", path.display(), e))
            })?;
            renderer.render_to(&args.input, &data, &mut [&mut file])?;
            info!(output = %path.display(), "Rendered");
        }
        None => {
            let mut stdout = io::stdout().lock();
            renderer.render_to(&args.input, &data, &mut [&mut stdout])?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Loads the data file, if any, and applies `--set` assignments on top.
fn build_data(path: Option<&Path>, assignments: &[(String, Value)]) -> Result<DataMap, AppError> {
    let mut data = match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| {
                AppError::internal(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let value: Value = serde_json::from_str(&raw)?;
            to_data_map(&value)?
        }
        None => DataMap::new(),
    };

    for (key, value) in assignments {
        set_path(&mut data, key, value.clone());
    }
    Ok(data)
}

/// Parses a `key=value` assignment.
fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() || key.split('.').any(str::is_empty) {
        return Err(format!("invalid key in '{raw}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Sets `value` at a dotted `key`, creating or replacing intermediate maps.
fn set_path(data: &mut DataMap, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            data.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = data
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(DataMap::new()));
            if !entry.is_object() {
                *entry = Value::Object(DataMap::new());
            }
            if let Value::Object(child) = entry {
                set_path(child, rest, value);
            }
        }
    }
}
