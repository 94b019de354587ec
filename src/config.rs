//! Configuration
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```json
//! {
//!   "watcher": { "synthetic": "hardware_only", "proximity_px": 4 },
//!   "log_level": "info"
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detector::DEFAULT_PROXIMITY_PX;
use crate::error::{Error, Result};

/// Whether software-injected pointer events may trigger the action.
///
/// `HardwareOnly` (the default) drops injected events before either
/// double-click producer sees them, which keeps automation tools that
/// replay clicks from toggling the desktop. `AcceptAll` treats injected
/// events exactly like device input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticPolicy {
    #[default]
    HardwareOnly,
    AcceptAll,
}

impl SyntheticPolicy {
    pub fn admits(&self, synthetic: bool) -> bool {
        match self {
            SyntheticPolicy::HardwareOnly => !synthetic,
            SyntheticPolicy::AcceptAll => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    pub synthetic: SyntheticPolicy,
    pub proximity_px: i32,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            synthetic: SyntheticPolicy::default(),
            proximity_px: DEFAULT_PROXIMITY_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub watcher: WatcherConfig,
    pub log_level: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.watcher.proximity_px < 0 {
            return Err(Error::Config(format!(
                "proximity_px must not be negative (got {})",
                self.watcher.proximity_px
            )));
        }
        Ok(())
    }
}
