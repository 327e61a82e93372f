//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory. A missing file
//! means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::progression::leveling::{
    LevelCurve, DEFAULT_BASE_XP, DEFAULT_GROWTH_FACTOR, DEFAULT_GROWTH_STEP,
};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Database settings
    pub database: DatabaseSettings,
    /// Level curve settings
    pub leveling: LevelingSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            database: DatabaseSettings::default(),
            leveling: LevelingSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Full path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database.file_name)
    }
}

/// Database-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// File name inside the data directory
    pub file_name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            file_name: "muscleup.db".to_string(),
        }
    }
}

/// Level curve settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelingSettings {
    /// XP needed to leave level 1
    pub base_xp: u32,
    /// Initial growth factor between level requirements (> 1)
    pub growth_factor: f64,
    /// Growth factor increase per level
    pub growth_step: f64,
}

impl Default for LevelingSettings {
    fn default() -> Self {
        Self {
            base_xp: DEFAULT_BASE_XP,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            growth_step: DEFAULT_GROWTH_STEP,
        }
    }
}

impl LevelingSettings {
    /// Build the level curve, validating the parameters.
    pub fn curve(&self) -> Result<LevelCurve, ConfigError> {
        LevelCurve::new(self.base_xp, self.growth_factor, self.growth_step)
            .map_err(|e| ConfigError::Invalid(format!("leveling: {}", e)))
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "muscleup", "MuscleUp")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_data_dir())
}

/// Load application configuration from `config.toml` in `data_dir`.
pub fn load_config_from(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = data_dir.join("config.toml");

    if !path.exists() {
        let config = AppConfig {
            data_dir: data_dir.to_path_buf(),
            ..Default::default()
        };
        return Ok(config);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = data_dir.to_path_buf();
    config.leveling.curve()?;

    Ok(config)
}

/// Save application configuration to `config.toml` in its data directory.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config.data_dir.join("config.toml");

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
