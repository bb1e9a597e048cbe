//! Configuration management for auto-grind.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{BehaviourConfig, CaptureConfig, HotkeyConfig},
};

use auto_grind_core::{ChordTable, EngineConfig};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Device selection, tick and display scale.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Hotkey chords.
    #[serde(default)]
    pub hotkeys: HotkeyConfig,
    /// Application behavior settings.
    #[serde(default)]
    pub behavior: BehaviourConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let config = Self::load_from(&config_path)?;
            info!(config_path = ?config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Read and validate a configuration file.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        if self.capture.interval_ms == 0 {
            return Err(AppError::ConfigError {
                reason: "capture.interval_ms must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !self.capture.screen_scale.is_finite() || self.capture.screen_scale <= 0.0 {
            return Err(AppError::ConfigError {
                reason: format!(
                    "capture.screen_scale must be positive, got {}",
                    self.capture.screen_scale
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.hotkeys.chord_table()?;
        Ok(())
    }

    /// Engine settings derived from the `[capture]` section and the
    /// take-over switch in `[hotkeys]`.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            take_over: self.hotkeys.take_over,
            ..self.capture.engine_config()
        }
    }

    /// Chord table derived from the `[hotkeys]` section.
    #[track_caller]
    pub fn chord_table(&self) -> AppResult<ChordTable> {
        self.hotkeys.chord_table()
    }

    /// Write to `path` through a temp file and rename, so a crash mid-write
    /// never leaves a truncated config behind.
    #[track_caller]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Platform project directories for auto-grind.
    #[track_caller]
    pub fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "auto-grind", "Auto-Grind").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Directory holding saved recordings, created on demand.
    #[track_caller]
    pub fn recordings_dir() -> AppResult<PathBuf> {
        Self::data_subdir("recordings")
    }

    /// Directory holding rolling log files, created on demand.
    #[track_caller]
    pub fn logs_dir() -> AppResult<PathBuf> {
        Self::data_subdir("logs")
    }

    #[track_caller]
    fn data_subdir(name: &str) -> AppResult<PathBuf> {
        let dir = Self::project_dirs()?.data_dir().join(name);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            debug!(dir = ?dir, "Created data directory");
        }
        Ok(dir)
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }
}
