// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player configuration.
//!
//! Stored as RON. Every field has a default, so a config file only needs the
//! values it overrides.

use crate::error::Result;
use crate::keymap::KeyBindings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Config format version
    pub version: u32,
    /// Host update cadence in frames per second
    pub frame_rate: u32,
    /// Fade applied when a carried audio handle is disposed, in seconds
    pub audio_fade_out: f32,
    /// Countdown decrement period in seconds
    pub countdown_tick: f32,
    /// Root directory for media files
    pub assets_root: Option<PathBuf>,
    /// An advance on the "presentation ended" screen exits the session
    pub end_screen_exits: bool,
    /// Key bindings
    pub key_bindings: KeyBindings,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            frame_rate: 60,
            audio_fade_out: 0.5,
            countdown_tick: 1.0,
            assets_root: None,
            end_screen_exits: true,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl PlayerConfig {
    /// Seconds per host frame
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Parse from RON
    pub fn from_ron(s: &str) -> Result<Self> {
        let config: PlayerConfig = ron::from_str(s)?;
        if config.version > CONFIG_FORMAT_VERSION {
            tracing::warn!(
                "Config version {} is newer than supported version {}; unknown settings are ignored",
                config.version,
                CONFIG_FORMAT_VERSION
            );
        }
        Ok(config)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::info!("Loaded player config from {:?}", path);
        Ok(config)
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}
