//! Configuration management for the NimeStream client.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Durable storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Upstream API settings
    pub api: ApiConfig,

    /// Screen behaviour settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Storage slot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key of the slot holding the serialized watchlist
    pub watchlist_key: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// User agent sent with each request
    pub user_agent: String,

    /// Request timeout in seconds (None = transport default)
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Screen behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Carousel auto-advance period in milliseconds (0 disables)
    pub carousel_interval_ms: u64,

    /// Delay before the promotional popup appears in milliseconds (0 disables)
    pub promo_delay_ms: u64,

    /// Substring of a stream source label picked as the default quality
    pub preferred_quality: String,

    /// Image shown when an item has none
    pub placeholder_image: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            watchlist_key: "nimestream_watchlist".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            carousel_interval_ms: 5000,
            promo_delay_ms: 1000,
            preferred_quality: "720".to_string(),
            placeholder_image: "https://picsum.photos/300/450?blur=2".to_string(),
        }
    }
}

impl UiConfig {
    /// Carousel period, `None` when auto-advance is disabled
    pub fn carousel_interval(&self) -> Option<Duration> {
        (self.carousel_interval_ms > 0).then(|| Duration::from_millis(self.carousel_interval_ms))
    }

    /// Promo popup delay, `None` when the popup is disabled
    pub fn promo_delay(&self) -> Option<Duration> {
        (self.promo_delay_ms > 0).then(|| Duration::from_millis(self.promo_delay_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            storage: StorageConfig::default(),
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            api: ApiConfig {
                base_url: "https://nexta-api.vercel.app/api/anime/oploverz".to_string(),
                user_agent: "NimeStream/0.1.0".to_string(),
                timeout_seconds: None,
            },
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        let log_path = Path::new(&self.logging.log_dir);
        if log_path.is_absolute() {
            log_path.to_path_buf()
        } else {
            self.data_dir().join(log_path)
        }
    }

    /// Parse the configured default log level, falling back to INFO
    pub fn log_level(&self) -> tracing::Level {
        self.logging
            .default_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }

    /// Request timeout, if one is configured
    pub fn api_timeout(&self) -> Option<Duration> {
        self.api.timeout_seconds.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root_dir, "data");
        assert_eq!(config.storage.watchlist_key, "nimestream_watchlist");
        assert_eq!(
            config.api.base_url,
            "https://nexta-api.vercel.app/api/anime/oploverz"
        );
        assert_eq!(config.api.timeout_seconds, None);
        assert_eq!(config.ui.carousel_interval_ms, 5000);
        assert_eq!(config.ui.promo_delay_ms, 1000);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut original_config = Config::default();
        original_config.api.timeout_seconds = Some(15);
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.data.root_dir, original_config.data.root_dir);
        assert_eq!(loaded_config.api.base_url, original_config.api.base_url);
        assert_eq!(loaded_config.api_timeout(), Some(Duration::from_secs(15)));

        Ok(())
    }

    #[test]
    fn test_missing_sections_use_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[data]
root_dir = "/srv/nimestream"

[logging]
log_dir = "logs"
default_level = "debug"
console = false
file = true
json_format = true

[api]
base_url = "http://localhost:8080"
user_agent = "test"
"#,
        )?;

        let config = Config::from_file(&config_path)?;
        assert_eq!(config.storage.watchlist_key, "nimestream_watchlist");
        assert_eq!(config.ui.preferred_quality, "720");
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
        assert_eq!(config.log_dir(), PathBuf::from("/srv/nimestream/logs"));

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.data.root_dir, "data");
    }

    #[test]
    fn test_ui_timers_can_be_disabled() {
        let mut ui = UiConfig::default();
        assert_eq!(ui.carousel_interval(), Some(Duration::from_secs(5)));
        assert_eq!(ui.promo_delay(), Some(Duration::from_secs(1)));

        ui.carousel_interval_ms = 0;
        ui.promo_delay_ms = 0;
        assert_eq!(ui.carousel_interval(), None);
        assert_eq!(ui.promo_delay(), None);
    }

    #[test]
    fn test_path_resolution() {
        let config = Config::default();

        let log_dir = config.log_dir();
        assert!(log_dir.ends_with("data/logs"));
    }
}
