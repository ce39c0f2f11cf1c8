//! Application settings management
//!
//! Where profiles are stored, which profile is loaded on startup and how profiles are written.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Directory holding profile files (defaults to the working directory)
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    /// Profile to load on startup (defaults to "Default")
    #[serde(default = "default_profile_name")]
    pub default_profile: String,

    /// Write profiles through a temporary file and rename
    #[serde(default = "default_atomic_save")]
    pub atomic_save: bool,
}

fn default_profile_name() -> String {
    "Default".to_string()
}

fn default_atomic_save() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            profile_dir: None,
            default_profile: default_profile_name(),
            atomic_save: true,
        }
    }
}

impl AppSettings {
    /// Get the settings file path
    pub fn settings_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("spatha");
        Ok(config_dir.join("settings.toml"))
    }

    /// Load settings from the user config directory (or defaults)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    /// Load settings from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file: {:?}", path))?;
            let settings: AppSettings = toml::from_str(&content)
                .with_context(|| format!("Failed to parse settings file: {:?}", path))?;
            info!("Loaded settings from {:?}", path);
            Ok(settings)
        } else {
            info!("No settings file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save settings to the user config directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content).context("Failed to write settings file")?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}
