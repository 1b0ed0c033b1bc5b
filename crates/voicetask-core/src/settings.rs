//! Persistent application settings.
//!
//! Stored as pretty JSON at `<config dir>/voicetask/settings.json`. Loading
//! never fails: a missing or unreadable file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio::RecordingLimits;
use crate::noise::NoiseCheckConfig;

/// Application directory name under the platform config/data dirs
const APP_DIR: &str = "voicetask";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Where the journal, recordings and photos live (None = platform default)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Selected microphone device name (None = system default)
    #[serde(default)]
    pub microphone_device: Option<String>,

    /// Accepted recording length
    #[serde(default)]
    pub recording: RecordingLimits,

    /// Ambient noise check parameters
    #[serde(default)]
    pub noise: NoiseCheckConfig,
}

impl Settings {
    /// Default location of the settings file
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("settings.json")
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| match serde_json::from_str(&content) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "ignoring invalid settings file: {e}");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Directory recordings are written to
    pub fn audio_dir(&self) -> PathBuf {
        self.data_dir().join("audio")
    }

    /// Directory captured photos are copied to
    pub fn photos_dir(&self) -> PathBuf {
        self.data_dir().join("photos")
    }
}

/// Platform default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
