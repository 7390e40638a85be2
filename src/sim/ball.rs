//! Falling balls
//!
//! Euler integration under constant gravity. The ring edge does not reflect
//! the ball; it throws it back toward the middle with a fresh random
//! velocity, which counts as a miss.

use glam::Vec2;
use rand::Rng;

use super::slot::{SlotId, angle_size};
use crate::Color;
use crate::consts::*;
use crate::{distance, random_num};

/// Ball lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    /// Moving under gravity
    Falling,
    /// Rebounded off the ring edge this tick
    Bounced,
    /// Landed in its slot, removed at the end of the tick
    Consumed,
}

/// A ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// Slot this ball has to land in
    pub target: Option<SlotId>,
    pub state: BallState,
}

impl Ball {
    /// New ball drifting right with a small random speed
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        pos: Vec2,
        color: Color,
        target: Option<SlotId>,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(random_num(rng, 0, 5) as f32, 1.0),
            color,
            target,
            state: BallState::Falling,
        }
    }

    /// Advance one tick. Returns true if the ball hit the ring edge.
    pub fn advance<R: Rng + ?Sized>(&mut self, gravity: f32, rng: &mut R) -> bool {
        // Edge distance is measured before moving
        let d = distance(self.pos, RING_CENTER) + BALL_RADIUS;

        self.vel.y += gravity;
        self.pos += self.vel;

        if d >= RING_RADIUS - BOUNCE_MARGIN {
            self.vel.y = if self.pos.y > RING_CENTER.y {
                -random_num(rng, 5, 10) as f32
            } else {
                random_num(rng, 1, 3) as f32
            };
            self.vel.x = if self.pos.x > RING_CENTER.x {
                -random_num(rng, 1, 3) as f32
            } else {
                random_num(rng, 1, 3) as f32
            };
            self.state = BallState::Bounced;
            true
        } else {
            self.state = BallState::Falling;
            false
        }
    }

    /// Whether the ball sits inside the hit window around a slot midpoint
    pub fn hits(&self, slot_mid: Vec2, slot_count: u32) -> bool {
        let window = hit_window(slot_count);
        (self.pos.x - slot_mid.x).abs() <= window.x && (self.pos.y - slot_mid.y).abs() <= window.y
    }

    pub fn is_consumed(&self) -> bool {
        self.state == BallState::Consumed
    }
}

/// Half extents of the box a ball must reach around a slot midpoint.
///
/// The width is tuned, not derived: it shrinks with the slot count but is
/// much wider than the slot itself.
pub fn hit_window(slot_count: u32) -> Vec2 {
    Vec2::new(angle_size(slot_count) * HIT_WIDTH_FACTOR, HIT_HEIGHT)
}
