//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory. A missing file
//! yields the defaults; every section may be partially specified.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::workouts::Coordinates;

/// Storage key holding the workout snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "workouts";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Map settings
    pub map: MapSettings,
    /// Storage settings
    pub storage: StorageSettings,
    /// Position source settings
    pub location: LocationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            log_filter: "info".to_string(),
            map: MapSettings::default(),
            storage: StorageSettings::default(),
            location: LocationSettings::default(),
        }
    }
}

impl AppConfig {
    /// Directory holding the workout snapshot.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.clone())
    }
}

/// Map-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Zoom used when panning to a workout from the list
    pub zoom_level: u8,
    /// Zoom used when the map first centres on the user
    pub initial_zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom_level: 13,
            initial_zoom: 9,
        }
    }
}

/// Storage-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Key of the workout snapshot
    pub key: String,
    /// Override for the storage directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
        }
    }
}

/// Position source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSettings {
    /// Fixed latitude for hosts without a live position source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Fixed longitude for hosts without a live position source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// How long to wait for a position before giving up
    pub timeout_secs: u64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            timeout_secs: 10,
        }
    }
}

impl LocationSettings {
    /// The configured fixed position, if both halves are set.
    pub fn fixed_position(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "waymark", "Waymark")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load application configuration from `path`, falling back to defaults when
/// the file does not exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save application configuration to `path`.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

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
}
