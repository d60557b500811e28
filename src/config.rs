//! Application configuration loaded from `config.toml`.
//!
//! The file lives in the platform config directory
//! (`ProjectDirs::from("com", "KenBoyle", "SharedCalendar")`). A missing
//! file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "calendar.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "KenBoyle", "SharedCalendar")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file for the shared store. Absent means the platform data dir.
    pub database_path: Option<String>,
    /// Use the in-memory local store instead of the shared database.
    pub offline: bool,
    pub calendar_id: String,
    /// `env_logger` filter, overridden by `RUST_LOG`.
    pub log_level: String,
    /// JSON file mirroring the local store. Absent means sample events.
    pub local_snapshot_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            offline: false,
            calendar_id: "default".to_string(),
            log_level: "info".to_string(),
            local_snapshot_path: None,
        }
    }
}

impl AppConfig {
    /// Path of the config file in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the platform config directory, falling back to defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("No config directory available, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, data)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// The SQLite file to open, creating the data directory when the
    /// default location is used.
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        if let Some(path) = self.database_path.as_ref() {
            return Ok(PathBuf::from(path));
        }

        match project_dirs() {
            Some(dirs) => {
                let data_dir = dirs.data_dir();
                fs::create_dir_all(data_dir)
                    .with_context(|| format!("failed to create dir {}", data_dir.display()))?;
                Ok(data_dir.join(DATABASE_FILE))
            }
            None => {
                log::warn!("No data directory available, using ./{}", DATABASE_FILE);
                Ok(PathBuf::from(DATABASE_FILE))
            }
        }
    }
}
