use crate::core::{EmptrackError, Result};
use crate::results_grid::OutputFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Database file used when neither the command line nor the config names one.
pub const DEFAULT_DATABASE_PATH: &str = "employees.db";

/// Top-level configuration structure parsed from a TOML file.
///
/// Every section and key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Database-related configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub seed_sample_data: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: DEFAULT_DATABASE_PATH.to_string(),
            seed_sample_data: false,
        }
    }
}

/// UI-related configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// "table" or "json"
    pub output: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            output: "table".to_string(),
        }
    }
}

impl UiConfig {
    pub fn output_format(&self) -> Result<OutputFormat> {
        match self.output.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(EmptrackError::Config(format!(
                "Unsupported output format: '{}'. Supported formats: table, json",
                other
            ))),
        }
    }
}

/// Logging configuration. `RUST_LOG` takes precedence when set.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = emptrack::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| EmptrackError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&content).map_err(|e| EmptrackError::Config(format!("{}: {}", path.display(), e)))
}

/// `<config dir>/emptrack/config.toml`, e.g. `~/.config/emptrack/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("emptrack").join("config.toml"))
}

/// Loads `explicit` when given; otherwise the default location if that file
/// exists; otherwise built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            debug!("Loading config from {}", path.display());
            load_config(path)
        }
        _ => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
