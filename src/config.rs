// ABOUTME: Configuration management for SwiftDash
// ABOUTME: Database location, log level and first-run seeding, stored as extensible JSON

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::db::store::DB_FILE_NAME;

/// Overrides the config file location
pub const CONFIG_ENV_VAR: &str = "SWIFTDASH_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Config directory not found")]
    NoDirFound,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(rename = "databasePath", default)]
    pub database_path: Option<PathBuf>,
    #[serde(rename = "logLevel", default = "default_log_level")]
    pub log_level: String,
    #[serde(rename = "seedDefaultCategories", default = "default_true")]
    pub seed_default_categories: bool,
}

fn default_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            database_path: None,
            log_level: default_log_level(),
            seed_default_categories: true,
        }
    }
}

impl AppConfig {
    /// Get the config file path: `$SWIFTDASH_CONFIG`, else the OS config dir
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoDirFound)?;
        Ok(config_dir.join("SwiftDash").join("config.json"))
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, writing a default file there if it is missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Explicit database path, or `None` for the store's default location
    pub fn database_path(&self) -> Option<&Path> {
        self.database_path.as_deref()
    }

    /// Database path to report to the user
    pub fn describe_database(&self) -> String {
        match &self.database_path {
            Some(path) => path.display().to_string(),
            None => format!("<data dir>/SwiftDash/{}", DB_FILE_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.database_path, None);
        assert_eq!(config.log_level, "warn");
        assert!(config.seed_default_categories);
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SwiftDash").join("config.json");

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"databasePath": "/tmp/dash.db", "futureKey": 3}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.database_path(), Some(Path::new("/tmp/dash.db")));
        assert_eq!(config.log_level, "warn");
        assert!(config.seed_default_categories);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            log_level: "debug".to_string(),
            seed_default_categories: false,
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
