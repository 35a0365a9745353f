pub mod config;
pub mod records;
pub mod report;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use config::{
    Config, ConfigStorage, DisplayConfig, GeneralConfig, LoggingConfig, TomlConfigStorage,
};
pub use records::{BackupPolicy, CsvPropertyStore, PropertyStore, StoreError};
pub use report::{ReportError, TextReport};

/// Ensure the XDG data directory exists and return it
///
/// $XDG_DATA_HOME/estate (default: ~/.local/share/estate)
pub fn data_dir() -> Result<PathBuf> {
    ensure_xdg_dir("XDG_DATA_HOME", ".local/share")
}

/// Ensure the XDG config directory exists and return it
///
/// $XDG_CONFIG_HOME/estate (default: ~/.config/estate)
pub fn config_dir() -> Result<PathBuf> {
    ensure_xdg_dir("XDG_CONFIG_HOME", ".config")
}

fn ensure_xdg_dir(var: &str, home_fallback: &str) -> Result<PathBuf> {
    let dir = match env::var_os(var) {
        Some(base) if !base.is_empty() => PathBuf::from(base).join("estate"),
        _ => {
            let home = env::var_os("HOME").with_context(|| {
                format!("Neither {} nor HOME environment variable is set", var)
            })?;
            PathBuf::from(home).join(home_fallback).join("estate")
        }
    };

    fs::create_dir_all(&dir).with_context(|| format!("Failed to create directory {:?}", dir))?;
    log::debug!("Using {} directory {:?}", var, dir);
    Ok(dir)
}
