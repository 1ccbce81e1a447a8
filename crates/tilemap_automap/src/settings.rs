//! Automapping preferences, stored as TOML.
//!
//! ```toml
//! while_drawing = true
//! rules_file_override = ["rules/walls.txt"]
//! project_rules_file = "project_rules.txt"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where rules come from and when they run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomapSettings {
    /// Run the rules after every edit (the "AutoMap while drawing" mode)
    pub while_drawing: bool,
    /// Rule files used instead of `rules.txt` beside the map, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules_file_override: Vec<PathBuf>,
    /// Rules file configured for the project, used when the map has no `rules.txt`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_rules_file: Option<PathBuf>,
}

impl AutomapSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
