//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::auth::KeyValueStore;
use crate::routes::Route;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Admin API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Persisted key-value storage (holds the bearer token).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform default `storage.json` location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for rolling log files. Platform data dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub file_enabled: bool,
}

fn default_true() -> bool {
    true
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Route shown at start when no record id is given.
    #[serde(default = "default_start_route")]
    pub start_route: String,
}

fn default_start_route() -> String {
    crate::routes::ABSEN_PATH.to_string()
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation("API base URL cannot be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }
        if self.api.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if Route::parse(&self.ui.start_route).is_none() {
            return Err(ConfigError::Validation(format!(
                "Unknown start route '{}'",
                self.ui.start_route
            )));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Key-value storage configured for this app.
    pub fn token_store(&self) -> KeyValueStore {
        match &self.storage.path {
            Some(path) => KeyValueStore::new(path),
            None => KeyValueStore::new(KeyValueStore::default_path()),
        }
    }

    /// Parsed start route, `/absen` when the configured one is unknown.
    pub fn start_route(&self) -> Route {
        Route::parse(&self.ui.start_route).unwrap_or(Route::Absen)
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_enabled: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_route: default_start_route(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_url_scheme() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_timeout() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_start_route() {
        let mut config = AppConfig::default();
        config.ui.start_route = "/absensi/9/edit".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.start_route(), Route::EditAbsen("9".to_string()));

        config.ui.start_route = "/nowhere".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[api]\nbase_url = \"https://hr.example.id/api\"\n").unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.logging.file_enabled);
        assert!(config.storage.path.is_none());
        assert_eq!(config.start_route(), Route::Absen);
    }

    #[test]
    fn test_try_load_states() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));

        std::fs::write(&path, "[api]\nbase_url = \"localhost\"\n").unwrap();
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Invalid(ConfigError::Validation(_))));

        std::fs::write(&path, "not toml [").unwrap();
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Invalid(ConfigError::Parse(_))));

        AppConfig::default().save(&path).unwrap();
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Loaded(_)));
    }
}
