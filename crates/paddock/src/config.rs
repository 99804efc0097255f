//! Configuration management for paddock.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fetch::{DEFAULT_BASE_URL, DEFAULT_RESULT_LIMIT};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "paddock";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "f1_data.db";

/// Default chart directory name, inside the data directory.
const CHART_DIR_NAME: &str = "charts";

/// First season of the world championship.
const FIRST_SEASON: i32 = 1950;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PADDOCK_`, sections split by `__`)
/// 2. TOML config file at `~/.config/paddock/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Results API configuration.
    pub source: SourceConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Report configuration.
    pub report: ReportConfig,
}

/// Results API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// API root; `/{season}/results.json` is appended.
    pub base_url: String,
    /// Season to fetch.
    pub season: i32,
    /// Maximum number of results requested. Anything beyond is dropped.
    pub result_limit: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/paddock/f1_data.db`
    pub database_path: Option<PathBuf>,
}

/// Report-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory charts are written to.
    /// Defaults to `~/.local/share/paddock/charts`
    pub output_dir: Option<PathBuf>,
    /// Driver plotted by the driver trend chart.
    pub driver: String,
    /// Constructor plotted by the constructor trend chart.
    pub constructor: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            season: 2023,
            result_limit: DEFAULT_RESULT_LIMIT,
            timeout_secs: 30,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: None, // Will be resolved to default at runtime
            driver: "Max Verstappen".to_string(),
            constructor: "Red Bull".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (e.g. `PADDOCK_SOURCE__SEASON=2021`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("PADDOCK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.source.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::ConfigValidation {
                message: format!("base_url must be an http(s) URL, got '{base_url}'"),
            });
        }

        if self.source.season < FIRST_SEASON {
            return Err(Error::ConfigValidation {
                message: format!(
                    "season ({}) cannot be earlier than {FIRST_SEASON}",
                    self.source.season
                ),
            });
        }

        if self.source.result_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "result_limit must be greater than 0".to_string(),
            });
        }

        if self.source.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.report.driver.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "report.driver cannot be empty".to_string(),
            });
        }

        if self.report.constructor.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "report.constructor cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the chart output directory, resolving defaults if not set.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.report
            .output_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(CHART_DIR_NAME))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }
}
