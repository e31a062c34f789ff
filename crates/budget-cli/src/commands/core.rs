//! Shared utilities for commands
//!
//! - `load_config` - Resolve the config file
//! - `open_store` - Open the JSON budget store
//! - `read_input` - Build raw input from a JSON file and `--set` pairs
//! - `engine` - Engine with the tracing observer attached

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use budget_core::{
    ChartRenderer, Config, Engine, JsonFileStore, RawInput, SvgRenderer, TracingObserver,
};
use serde_json::Value;

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("Failed to load config")
}

/// Open the store at `path`, or the configured store
pub fn open_store(path: Option<&Path>, config: &Config) -> JsonFileStore {
    let path = path.unwrap_or(config.store_path.as_path());
    tracing::debug!("Using budget store at {}", path.display());
    JsonFileStore::open(path)
}

/// Raw input from an optional JSON file, overlaid with `key=value` pairs
pub fn read_input(file: Option<&Path>, pairs: &[String]) -> Result<RawInput> {
    let mut raw = match file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            match value {
                Value::Object(map) => map,
                _ => bail!("Input file {} must contain a JSON object", path.display()),
            }
        }
        None => RawInput::new(),
    };

    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid --set value '{}' (expected KEY=VALUE)", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid --set value '{}' (empty key)", pair);
        }
        raw.insert(key.to_string(), Value::String(value.to_string()));
    }

    if raw.is_empty() {
        bail!("No input given. Use --input <file.json> and/or --set key=value");
    }
    Ok(raw)
}

pub fn engine() -> Engine {
    Engine::new().with_observer(Arc::new(TracingObserver))
}

/// The configured renderer, or `None` when charts are disabled
pub fn renderer(config: &Config) -> Option<SvgRenderer> {
    config.charts_enabled.then(|| config.renderer())
}

pub fn as_renderer(renderer: Option<&SvgRenderer>) -> Option<&dyn ChartRenderer> {
    renderer.map(|r| r as &dyn ChartRenderer)
}
