//! Player preferences
//!
//! Persisted separately from the high scores.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::storage::{KeyValueStore, load_json, save_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    /// Pause Square Shooter when the window loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "settings";

    /// Gain applied to every sound effect
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn toggle_fps(&mut self) {
        self.show_fps = !self.show_fps;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring saved settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
