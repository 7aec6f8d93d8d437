//! User settings persisted as TOML under the app directory.
//!
//! Settings cover the classifier command and an optional decode cap; the
//! analysis constants (16 kHz target rate, 50–300 Hz pitch range) are
//! domain parameters and deliberately not configurable here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// File name used for settings under the app root.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Errors while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The app directory could not be resolved.
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
    /// Reading or writing the settings file failed.
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file exists but is not valid TOML.
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    /// Serializing settings to TOML failed.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// All persisted settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// External classifier invocation.
    #[serde(default)]
    pub classifier: ClassifierSettings,
    /// Analysis limits.
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// How to invoke the external classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Program to run; the staged clip path is appended as the last
    /// argument. `None` means no classifier is configured.
    #[serde(default)]
    pub command: Option<String>,
    /// Extra arguments passed before the clip path.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Limits applied during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Cap on decoded seconds per clip; `None` decodes the whole clip.
    #[serde(default)]
    pub max_clip_seconds: Option<f32>,
}

impl Settings {
    /// Load settings from the app directory; a missing file yields defaults.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&app_dirs::settings_file()?)
    }

    /// Load settings from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Persist settings to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}
