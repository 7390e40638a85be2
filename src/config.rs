//! Gameplay tuning
//!
//! Defaults reproduce the classic arcade feel. A JSON override can be stored
//! in LocalStorage; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Hard cap on the life strip (one DOM cell per life)
pub const MAX_LIVES: u8 = 6;

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of slots at the start of a run
    pub initial_slot_count: u32,
    /// Slots added when the win score is reached
    pub slot_increment: u32,
    /// Score that triggers the level-up
    pub win_score: u32,
    /// Lives at the start of a run
    pub lives: u8,
    /// Spawn timer fires between spawn attempts needed for a ball
    pub initial_spawn_interval: u32,
    /// Spawn interval reduction applied at level-up
    pub spawn_interval_step: u32,
    /// Lowest spawn interval reachable
    pub spawn_interval_floor: u32,
    /// Simulation ticks between spawn timer fires (60 = one second)
    pub spawn_period_ticks: u32,
    /// A life is lost when the bounce counter runs this far past the checkpoint
    pub miss_streak_limit: u32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Background particles attempted at setup
    pub background_particles: usize,
    /// Minimum spacing between background particles
    pub particle_separation: f32,
    /// Placement attempts per background particle
    pub placement_attempts: u32,
    /// Burst particles spawned per hit
    pub burst_count: usize,
    /// Ticks the hit flash stays on (12 = 200 ms)
    pub flash_ticks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_slot_count: 20,
            slot_increment: 10,
            win_score: 20,
            lives: MAX_LIVES,
            initial_spawn_interval: 5,
            spawn_interval_step: 2,
            spawn_interval_floor: 1,
            spawn_period_ticks: 60,
            miss_streak_limit: 15,
            gravity: 0.1,
            background_particles: 20,
            particle_separation: 15.0,
            placement_attempts: 100,
            burst_count: 15,
            flash_ticks: 12,
        }
    }
}

impl GameConfig {
    /// Parse a JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_slot_count == 0 {
            return Err(ConfigError::NoSlots);
        }
        if self.lives == 0 || self.lives > MAX_LIVES {
            return Err(ConfigError::LivesOutOfRange {
                got: self.lives,
                max: MAX_LIVES,
            });
        }
        if self.spawn_period_ticks == 0 {
            return Err(ConfigError::ZeroSpawnPeriod);
        }
        if self.initial_spawn_interval == 0 || self.spawn_interval_floor == 0 {
            return Err(ConfigError::ZeroSpawnInterval {
                initial: self.initial_spawn_interval,
                floor: self.spawn_interval_floor,
            });
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(ConfigError::BadNumber { name: "gravity" });
        }
        if !self.particle_separation.is_finite() || self.particle_separation < 0.0 {
            return Err(ConfigError::BadNumber {
                name: "particle_separation",
            });
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "slot_ring_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded game config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored game config: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
