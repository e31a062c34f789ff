//! Configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/budget/config/budget.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Values missing from an override file keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::charts::SvgRenderer;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/budget.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file holding saved budgets
    pub store_path: PathBuf,
    pub charts_enabled: bool,
    pub chart_width: u32,
    pub chart_height: u32,
    /// strftime pattern used to name budgets saved without a name
    pub name_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            charts_enabled: true,
            chart_width: 800,
            chart_height: 600,
            name_format: "Budget %Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl Config {
    /// Load from `path` if it exists, else from the data dir override, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) if p.exists() => fs::read_to_string(&p).map_err(|e| {
                Error::Config(format!("Failed to read config {}: {}", p.display(), e))
            })?,
            _ => DEFAULT_CONFIG.to_string(),
        };
        parse_config(&content)
    }

    pub fn renderer(&self) -> SvgRenderer {
        SvgRenderer::new(self.chart_width, self.chart_height)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("budget").join("config").join("budget.toml"))
}

/// Default location of the budget store
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("budget").join("budgets.json"))
        .unwrap_or_else(|| PathBuf::from("budgets.json"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    store: Option<RawStore>,
    charts: Option<RawCharts>,
    records: Option<RawRecords>,
}

#[derive(Debug, Deserialize)]
struct RawStore {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawCharts {
    enabled: Option<bool>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawRecords {
    name_format: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(path) = raw.store.and_then(|s| s.path) {
        config.store_path = path;
    }

    if let Some(charts) = raw.charts {
        if let Some(enabled) = charts.enabled {
            config.charts_enabled = enabled;
        }
        if let Some(width) = charts.width {
            config.chart_width = width;
        }
        if let Some(height) = charts.height {
            config.chart_height = height;
        }
    }

    if let Some(name_format) = raw.records.and_then(|r| r.name_format) {
        if name_format.trim().is_empty() {
            return Err(Error::Config("records.name_format cannot be empty".into()));
        }
        config.name_format = name_format;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert!(config.charts_enabled);
        assert_eq!(config.chart_width, 800);
        assert_eq!(config.name_format, "Budget %Y-%m-%d %H:%M");
        assert_eq!(config.store_path, default_store_path());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [store]
            path = "/tmp/my-budgets.json"

            [charts]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/my-budgets.json"));
        assert!(!config.charts_enabled);
        assert_eq!(config.chart_height, 600);
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_config("[charts\nenabled = yes").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_name_format_rejected() {
        let err = parse_config("[records]\nname_format = \"  \"").unwrap_err();
        assert!(err.to_string().contains("name_format"));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[charts]\nwidth = 1024").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.chart_width, 1024);
        assert_eq!(config.renderer().width, 1024);
    }

    #[test]
    fn test_missing_explicit_path_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, parse_config(DEFAULT_CONFIG).unwrap());
    }
}
