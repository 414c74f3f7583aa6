//! Configuration management for fleet-manifest
//!
//! Config stored at: ~/.config/fleet-manifest/config.json

use manifest_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "fleet-manifest";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding app_data.json and archives.json
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Label shown for an empty status
    #[serde(default = "default_status_placeholder")]
    pub status_placeholder: String,

    /// Write the document on a worker thread instead of inline
    #[serde(default)]
    pub background_save: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_status_placeholder() -> String {
    "Select Status".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: None,
            output_format: OutputFormat::default(),
            log_level: default_log_level(),
            status_placeholder: default_status_placeholder(),
            background_save: false,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the store directory path
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(store_dir)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fleet Manifest Configuration")?;
        writeln!(f, "============================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Store dir:          {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:      {}", self.output_format)?;
        writeln!(f, "Log level:          {}", self.log_level)?;
        writeln!(f, "Status placeholder: {}", self.status_placeholder)?;
        writeln!(f, "Background save:    {}", self.background_save)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:        {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"output_format": "json"}"#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.status_placeholder, "Select Status");
        assert!(!config.background_save);
    }

    #[test]
    fn test_store_dir_override() {
        let config = Config {
            store_dir: Some(PathBuf::from("/tmp/fleet")),
            ..Default::default()
        };
        assert_eq!(config.store_dir().unwrap(), PathBuf::from("/tmp/fleet"));
    }
}
