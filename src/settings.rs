//! Player preferences
//!
//! Held for the lifetime of the page only; nothing is written to storage.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Menu music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// All audio silenced
    pub muted: bool,

    // === Visual Effects ===
    /// Sliding trail behind coffees
    pub coffee_trails: bool,
    /// Sparkles around the distraction show
    pub sparkles: bool,

    // === Accessibility ===
    /// Reduced motion (no bobbing tips, no sparkles)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 0.8,
            music_volume: 0.7,
            muted: false,

            coffee_trails: true,
            sparkles: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, clamping volumes into range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.set_sfx_volume(settings.sfx_volume);
        settings.set_music_volume(settings.music_volume);
        Ok(settings)
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Effective cue volume
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Effective sparkles (respects reduced_motion)
    pub fn effective_sparkles(&self) -> bool {
        self.sparkles && !self.reduced_motion
    }

    /// Effective tip bobbing (respects reduced_motion)
    pub fn effective_bobbing(&self) -> bool {
        !self.reduced_motion
    }
}
