//! Visual settings and preferences
//!
//! Persisted separately from the gameplay config in LocalStorage.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    /// Maximum burst particles drawn for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 200,
            QualityPreset::High => 400,
        }
    }

    /// Glow multiplier for slots (Low drops glow for fill-rate)
    pub fn glow_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.0,
            QualityPreset::Medium => 0.7,
            QualityPreset::High => 1.0,
        }
    }
}

/// Visual preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Glow around lit slots
    pub glow: bool,
    /// Burst particles on hits
    pub particles: bool,
    /// Ambient particles orbiting under the ring
    pub background_particles: bool,
    /// Light/bulb flash on hits
    pub flash: bool,
    /// Reduced motion (no flashes, no bursts)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            glow: true,
            particles: true,
            background_particles: true,
            flash: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Glow radius to use for a requested glow
    pub fn effective_glow(&self, glow: f32) -> f32 {
        if self.glow {
            glow * self.quality.glow_scale()
        } else {
            0.0
        }
    }

    /// Effective flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        self.flash && !self.reduced_motion
    }

    /// Effective burst particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles || self.reduced_motion {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "slot_ring_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Stored settings unreadable, using defaults");
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native: defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_glow_is_unscaled() {
        let settings = Settings::default();
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.effective_glow(15.0), 15.0);
        assert_eq!(settings.effective_glow(1.0), 1.0);
    }

    #[test]
    fn test_low_preset_disables_glow() {
        let settings = Settings {
            quality: QualityPreset::Low,
            ..Default::default()
        };
        assert_eq!(settings.effective_glow(15.0), 0.0);
        assert_eq!(settings.max_particles(), 60);
    }

    #[test]
    fn test_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_flash());
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_settings_json_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "quality": "Medium" }"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.glow);
    }
}
