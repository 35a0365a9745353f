use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::records::BackupPolicy;
use crate::ui::ColorMode;

/// Default data file name inside the data directory
pub const DATA_FILE_NAME: &str = "properties.csv";

/// Default report file name inside the data directory
pub const REPORT_FILE_NAME: &str = "property_report.txt";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// CSV file with the property records (default: <data dir>/properties.csv)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Report export target (default: <data dir>/property_report.txt)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_file: Option<PathBuf>,

    /// Backup behaviour before each save
    #[serde(default)]
    pub backup: BackupPolicy,
}

impl GeneralConfig {
    /// Resolve the data file, asking for the data directory only when no
    /// file is configured
    pub fn data_file(&self, data_dir: impl FnOnce() -> Result<PathBuf>) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DATA_FILE_NAME)),
        }
    }

    /// Resolve the report file, defaulting to the data file's directory
    pub fn report_file(&self, data_file: &Path) -> PathBuf {
        match &self.report_file {
            Some(path) => path.clone(),
            None => data_file
                .parent()
                .map_or_else(|| PathBuf::from(REPORT_FILE_NAME), |dir| dir.join(REPORT_FILE_NAME)),
        }
    }
}

/// Console rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub color: ColorMode,

    #[serde(default = "default_available_color")]
    pub available: String,

    #[serde(default = "default_sold_color")]
    pub sold: String,

    #[serde(default = "default_rented_color")]
    pub rented: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            color: ColorMode::default(),
            available: default_available_color(),
            sold: default_sold_color(),
            rented: default_rented_color(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file; when unset, env_logger writes to stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: None,
            level: default_log_level(),
        }
    }
}

// Default value functions for serde
fn default_available_color() -> String {
    "lightgreen".to_string()
}

fn default_sold_color() -> String {
    "lightred".to_string()
}

fn default_rented_color() -> String {
    "lightyellow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Trait for configuration storage
pub trait ConfigStorage {
    /// Load configuration from file
    fn load(&self) -> Result<Config>;

    /// Save configuration to file
    fn save(&self, config: &Config) -> Result<()>;

    /// Get the config file path
    fn path(&self) -> &PathBuf;

    /// Create default configuration file if it doesn't exist
    fn create_default(&self) -> Result<()>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    /// Create a new TomlConfigStorage with the given path
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        use anyhow::Context;
        use std::fs;

        // If file doesn't exist, create default and return it
        if !self.path.exists() {
            log::info!(
                "Config file not found at {:?}, creating default configuration",
                self.path
            );
            self.create_default()?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: backup={:?}, color={:?}, data_file={:?}",
            config.general.backup,
            config.display.color,
            config.general.data_file
        );

        Ok(config)
    }

    fn save(&self, config: &Config) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        let toml_str =
            toml::to_string_pretty(config).with_context(|| "Failed to serialize configuration")?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&self.path, toml_str)
            .with_context(|| format!("Failed to write config to {:?}", self.path))?;

        log::debug!("Saved configuration to {:?}", self.path);

        Ok(())
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn create_default(&self) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        // Use the example config compiled into the binary
        let example_config = include_str!("../../estate.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        log::info!("Created default configuration at {:?}", self.path);

        Ok(())
    }
}
