//! Decorative particles (no gameplay effect)

use glam::Vec2;
use rand::Rng;

use crate::Color;
use crate::consts::{BURST_FADE, RING_CENTER};
use crate::{distance, random_num};

/// Ambient particle orbiting a fixed point under the ring
#[derive(Debug, Clone)]
pub struct BackgroundParticle {
    pub origin: Vec2,
    pub pos: Vec2,
    pub radius: f32,
    pub angle: f32,
    /// Radians per tick
    pub speed: f32,
    /// Orbit radius
    pub orbit: f32,
    /// `None` until a hit lights it up
    pub color: Option<Color>,
}

impl BackgroundParticle {
    pub fn new<R: Rng + ?Sized>(origin: Vec2, rng: &mut R) -> Self {
        Self {
            origin,
            pos: origin,
            radius: random_num(rng, 1, 3) as f32,
            angle: rng.random::<f32>() * std::f32::consts::TAU,
            speed: 0.01 + rng.random::<f32>() * 0.01,
            orbit: 10.0 + rng.random::<f32>() * 10.0,
            color: None,
        }
    }

    pub fn update(&mut self) {
        self.angle += self.speed;
        self.pos = self.origin + Vec2::new(self.angle.cos(), self.angle.sin()) * self.orbit;
    }

    pub fn is_lit(&self) -> bool {
        self.color.is_some()
    }

    /// Take on a hit ball's color and grow a little
    pub fn recolor<R: Rng + ?Sized>(&mut self, color: Color, rng: &mut R) {
        self.color = Some(color);
        self.radius = random_num(rng, 4, 6) as f32;
    }
}

/// Scatter up to `count` background particles below the ring.
///
/// Each particle gets `attempts` tries to land at least `separation` away
/// from the ones already placed; a particle that never fits is dropped.
pub fn place_background_particles<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    separation: f32,
    attempts: u32,
) -> Vec<BackgroundParticle> {
    let mut placed: Vec<BackgroundParticle> = Vec::with_capacity(count);
    for _ in 0..count {
        for _ in 0..attempts {
            let origin = RING_CENTER
                + Vec2::new(
                    random_num(rng, -100, 100) as f32,
                    random_num(rng, 200, 270) as f32,
                );
            let overlap = placed.iter().any(|p| distance(origin, p.pos) < separation);
            if !overlap {
                placed.push(BackgroundParticle::new(origin, rng));
                break;
            }
        }
    }
    if placed.len() < count {
        log::debug!("Placed {} of {} background particles", placed.len(), count);
    }
    placed
}

/// Short-lived spark thrown off by a hit
#[derive(Debug, Clone)]
pub struct BurstParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// 1.0 at spawn, removed once at or below zero
    pub alpha: f32,
}

impl BurstParticle {
    pub fn new<R: Rng + ?Sized>(pos: Vec2, color: Color, rng: &mut R) -> Self {
        let radius = random_num(rng, 1, 3) as f32;
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 3.0,
            (rng.random::<f32>() - 0.5) * 3.0,
        );
        Self {
            pos,
            vel,
            radius,
            color,
            alpha: 1.0,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.alpha -= BURST_FADE;
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }
}

/// A batch of burst particles at one point
pub fn spawn_burst<R: Rng + ?Sized>(
    pos: Vec2,
    color: Color,
    count: usize,
    rng: &mut R,
) -> Vec<BurstParticle> {
    (0..count).map(|_| BurstParticle::new(pos, color, rng)).collect()
}
