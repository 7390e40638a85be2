//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ball;
pub mod input;
pub mod particle;
pub mod slot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallState, hit_window};
pub use input::DragState;
pub use particle::{BackgroundParticle, BurstParticle, place_background_particles, spawn_burst};
pub use slot::{Slot, SlotId, angle_size};
pub use spawn::SpawnTimer;
pub use state::{Flash, GameEvent, GamePhase, Session};
pub use tick::{Game, LoopControl, tick};
