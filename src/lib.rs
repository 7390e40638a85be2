//! Slot Ring - catch falling balls in a rotating ring of slots
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, slot hits, game state)
//! - `renderer`: Display surface contract and WebGPU SDF backend
//! - `hud`: Indicator state (score, lives, flash) for the page
//! - `config`: Gameplay tuning loaded from LocalStorage
//! - `settings`: Visual preferences

pub mod color;
pub mod config;
pub mod error;
pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use color::Color;
pub use config::GameConfig;
pub use error::{ConfigError, GpuError};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;
use rand::Rng;

/// Play field constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (one animation frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field size in world units
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 500.0;

    /// Ring center and radius
    pub const RING_CENTER: Vec2 = Vec2::new(FIELD_WIDTH / 2.0, 200.0);
    pub const RING_RADIUS: f32 = 180.0;
    /// Stroke width of a slot arc
    pub const SLOT_LINE_WIDTH: f32 = 6.0;
    /// Glow around lit / unlit slots
    pub const SLOT_GLOW_LIT: f32 = 15.0;
    pub const SLOT_GLOW_UNLIT: f32 = 1.0;

    /// Ball radius
    pub const BALL_RADIUS: f32 = 10.0;
    /// Distance inside the ring edge at which a ball rebounds
    pub const BOUNCE_MARGIN: f32 = 3.0;

    /// Horizontal hit window per radian of slot width
    pub const HIT_WIDTH_FACTOR: f32 = 110.0;
    /// Vertical hit window half-height
    pub const HIT_HEIGHT: f32 = 16.0;

    /// Ground strip under the ring
    pub const GROUND_OFFSET_Y: f32 = 220.0;
    pub const GROUND_HALF_WIDTH: f32 = 300.0;
    pub const GROUND_HEIGHT: f32 = 2.0;

    /// Burst particle opacity lost per tick
    pub const BURST_FADE: f32 = 0.02;
}

/// Uniform integer in `[min, max)`
#[inline]
pub fn random_num<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_num_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_num(&mut rng, 5, 10);
            assert!((5..10).contains(&v));
        }
        // Negative ranges are supported for particle placement
        for _ in 0..1000 {
            let v = random_num(&mut rng, -100, 100);
            assert!((-100..100).contains(&v));
        }
    }

    #[test]
    fn test_random_num_empty_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(random_num(&mut rng, 3, 3), 3);
    }

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::PI;
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-5);
    }
}
