//! Ball spawning on a fixed cadence
//!
//! The spawn timer is independent of the ball physics: it fires once per
//! `period_ticks` simulation ticks (one second by default), and every
//! `spawn_interval` fires a ball is dropped toward a free slot.

use glam::Vec2;
use super::ball::Ball;
use super::state::{GameEvent, Session};
use crate::color::PALETTE;
use crate::consts::RING_CENTER;
use crate::random_num;

/// Cancelable repeating timer counted in simulation ticks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnTimer {
    period_ticks: u32,
    counter: u32,
    running: bool,
}

impl SpawnTimer {
    pub fn new(period_ticks: u32) -> Self {
        Self {
            period_ticks: period_ticks.max(1),
            counter: 0,
            running: false,
        }
    }

    /// Start from a fresh period
    pub fn start(&mut self) {
        self.counter = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one tick. Returns true when the timer fires.
    pub fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.counter += 1;
        if self.counter >= self.period_ticks {
            self.counter = 0;
            return true;
        }
        false
    }
}

impl Session {
    /// Spawn timer callback. Returns the new ball's id if one was spawned.
    pub fn on_spawn_timer(&mut self) -> Option<u32> {
        self.elapsed_spawn_ticks += 1;
        if self.elapsed_spawn_ticks - self.last_spawn_tick < self.spawn_interval {
            return None;
        }
        let id = self.spawn_ball()?;
        self.last_spawn_tick = self.elapsed_spawn_ticks;
        Some(id)
    }

    /// Drop a ball toward a random free slot. `None` if every slot is taken.
    pub fn spawn_ball(&mut self) -> Option<u32> {
        let free: Vec<usize> = self
            .slots
            .iter()
            .filter(|s| !s.occupied)
            .map(|s| s.index)
            .collect();
        if free.is_empty() {
            return None;
        }

        let index = free[random_num(&mut self.rng, 0, free.len() as i32) as usize];
        let color = PALETTE[random_num(&mut self.rng, 0, PALETTE.len() as i32) as usize];
        self.slots[index].light(color);

        let cx = RING_CENTER.x as i32;
        let pos = Vec2::new(
            random_num(&mut self.rng, cx - 50, cx + 50) as f32,
            random_num(&mut self.rng, 105, 115) as f32,
        );
        let target = Some(self.slot_id(index));
        let ball_id = self.next_entity_id();
        let ball = Ball::new(ball_id, pos, color, target, &mut self.rng);
        self.balls.push(ball);

        log::debug!("Spawned ball {} toward slot {}", ball_id, index);
        self.events.push(GameEvent::Spawned {
            ball_id,
            slot: index,
        });
        Some(ball_id)
    }
}
