//! Session state and core game rules
//!
//! One `Session` owns everything that changes during a run. Nothing lives in
//! globals; the host holds the session and passes it to `tick`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ball::{Ball, BallState};
use super::particle::{BackgroundParticle, BurstParticle, place_background_particles, spawn_burst};
use super::slot::{Slot, SlotId};
use super::spawn::SpawnTimer;
use crate::Color;
use crate::config::GameConfig;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Win score reached; waiting for the player to continue
    LevelUp,
    /// Out of lives; waiting for a reset
    GameOver,
}

/// Light/bulb flash after a hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    pub color: Color,
    pub ticks_remaining: u32,
}

/// Events raised by a tick, for logging and the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Spawned { ball_id: u32, slot: usize },
    /// `slot` is `None` when the ball's target no longer resolved
    Hit { ball_id: u32, slot: Option<usize> },
    LifeLost { lives: u8 },
    LevelUp { slot_count: u32, spawn_interval: u32 },
    GameOver { score: u32 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GameConfig,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub score: u32,
    pub lives: u8,
    pub slot_count: u32,
    /// Spawn timer fires needed between spawns
    pub spawn_interval: u32,
    /// Ring rotation (radians, unbounded)
    pub rotation: f32,
    /// Ring-edge bounces since the run started
    pub miss_counter: u32,
    /// `miss_counter` at the last life loss
    pub last_miss_checkpoint: u32,
    /// Spawn timer fires since the run started
    pub elapsed_spawn_ticks: u32,
    /// `elapsed_spawn_ticks` at the last spawn
    pub last_spawn_tick: u32,
    /// Simulation ticks since the run started
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub flash: Option<Flash>,
    pub slots: Vec<Slot>,
    slot_generation: u32,
    /// Active balls (sorted by id)
    pub balls: Vec<Ball>,
    pub background: Vec<BackgroundParticle>,
    pub bursts: Vec<BurstParticle>,
    pub spawn_timer: SpawnTimer,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl Session {
    /// Start a run with the given config and seed
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut session = Self {
            spawn_timer: SpawnTimer::new(config.spawn_period_ticks),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            lives: 0,
            slot_count: 0,
            spawn_interval: 0,
            rotation: 0.0,
            miss_counter: 0,
            last_miss_checkpoint: 0,
            elapsed_spawn_ticks: 0,
            last_spawn_tick: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            flash: None,
            slots: Vec::new(),
            slot_generation: 0,
            balls: Vec::new(),
            background: Vec::new(),
            bursts: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        session.reset();
        session
    }

    /// Put every counter, collection and indicator back to its starting value
    /// and restart the spawn timer. The RNG keeps running.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.config.lives;
        self.slot_count = self.config.initial_slot_count;
        self.spawn_interval = self.config.initial_spawn_interval;
        self.rotation = 0.0;
        self.miss_counter = 0;
        self.last_miss_checkpoint = 0;
        self.elapsed_spawn_ticks = 0;
        self.last_spawn_tick = 0;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.flash = None;
        self.balls.clear();
        self.bursts.clear();
        self.events.clear();
        self.recreate_slots();
        self.background = place_background_particles(
            &mut self.rng,
            self.config.background_particles,
            self.config.particle_separation,
            self.config.placement_attempts,
        );
        self.spawn_timer = SpawnTimer::new(self.config.spawn_period_ticks);
        self.spawn_timer.start();
    }

    /// Replace all slots with `slot_count` unlit ones. Old handles go stale.
    pub fn recreate_slots(&mut self) {
        self.slot_generation = self.slot_generation.wrapping_add(1);
        self.slots = (0..self.slot_count as usize).map(Slot::new).collect();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Handle for the slot at `index` in the current generation
    pub fn slot_id(&self, index: usize) -> SlotId {
        SlotId {
            index,
            generation: self.slot_generation,
        }
    }

    /// Resolve a handle; stale or out-of-range handles give `None`
    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        if id.generation != self.slot_generation {
            return None;
        }
        self.slots.get(id.index)
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        if id.generation != self.slot_generation {
            return None;
        }
        self.slots.get_mut(id.index)
    }

    /// Accumulate a drag delta into the ring rotation
    pub fn rotate_by(&mut self, delta: f32) {
        self.rotation += delta;
    }

    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.occupied).count()
    }

    /// Active balls whose target still resolves
    pub fn targeted_balls(&self) -> usize {
        self.balls
            .iter()
            .filter(|b| !b.is_consumed() && b.target.and_then(|id| self.slot(id)).is_some())
            .count()
    }

    /// Count one ring-edge bounce. Returns true if it cost a life.
    pub fn record_bounce(&mut self) -> bool {
        self.miss_counter += 1;
        if self.miss_counter.abs_diff(self.last_miss_checkpoint) > self.config.miss_streak_limit {
            self.lives = self.lives.saturating_sub(1);
            self.last_miss_checkpoint = self.miss_counter;
            log::debug!("Life lost after {} misses, {} left", self.miss_counter, self.lives);
            self.events.push(GameEvent::LifeLost { lives: self.lives });
            return true;
        }
        false
    }

    /// Advance every ball, then settle misses, hits and removals.
    ///
    /// Balls are moved first and compacted last so a removal never shifts
    /// the ball being updated.
    pub fn update_balls(&mut self) {
        let gravity = self.config.gravity;
        let mut bounces = 0;
        for ball in &mut self.balls {
            if ball.advance(gravity, &mut self.rng) {
                bounces += 1;
            }
        }
        for _ in 0..bounces {
            self.record_bounce();
        }

        let mut hits = Vec::new();
        for (i, ball) in self.balls.iter().enumerate() {
            let Some(slot) = ball.target.and_then(|id| self.slot(id)) else {
                continue;
            };
            if ball.hits(slot.midpoint(self.rotation, self.slot_count), self.slot_count) {
                hits.push(i);
            }
        }

        // Every landed ball scores before the ring is rebuilt
        let mut level_up = false;
        for i in hits {
            self.balls[i].state = BallState::Consumed;
            level_up |= self.consume(i);
        }
        self.balls.retain(|b| !b.is_consumed());
        if level_up {
            self.level_up();
        }
    }

    /// Score a landed ball. Returns true if it reached the win score.
    fn consume(&mut self, ball_index: usize) -> bool {
        let ball = &self.balls[ball_index];
        let (ball_id, pos, color, target) = (ball.id, ball.pos, ball.color, ball.target);

        let slot = target.and_then(|id| self.slot_mut(id)).map(|slot| {
            slot.clear();
            slot.index
        });
        self.balls[ball_index].target = None;
        self.score += 1;
        self.events.push(GameEvent::Hit { ball_id, slot });

        if let Some(particle) = self.background.iter_mut().find(|p| !p.is_lit()) {
            particle.recolor(color, &mut self.rng);
        }

        self.flash = Some(Flash {
            color,
            ticks_remaining: self.config.flash_ticks,
        });

        let burst = spawn_burst(pos, color, self.config.burst_count, &mut self.rng);
        self.bursts.extend(burst);

        self.score == self.config.win_score
    }

    /// Faster spawns, more slots, fresh ring.
    ///
    /// Balls still in flight keep their slot index and are rebound to the
    /// same index on the new ring, which is lit in their color again.
    fn level_up(&mut self) {
        self.spawn_interval = self
            .spawn_interval
            .saturating_sub(self.config.spawn_interval_step)
            .max(self.config.spawn_interval_floor);
        self.slot_count += self.config.slot_increment;
        let in_flight: Vec<Option<usize>> = self
            .balls
            .iter()
            .map(|b| b.target.filter(|id| self.slot(*id).is_some()).map(|id| id.index))
            .collect();
        self.recreate_slots();
        for (i, index) in in_flight.into_iter().enumerate() {
            let target = index.filter(|&index| index < self.slots.len());
            if let Some(index) = target {
                let color = self.balls[i].color;
                self.slots[index].light(color);
            }
            self.balls[i].target = target.map(|index| self.slot_id(index));
        }
        self.phase = GamePhase::LevelUp;
        log::info!(
            "Level up at score {}: {} slots, spawn every {}",
            self.score,
            self.slot_count,
            self.spawn_interval
        );
        self.events.push(GameEvent::LevelUp {
            slot_count: self.slot_count,
            spawn_interval: self.spawn_interval,
        });
    }

    /// Count down the hit flash
    pub fn update_flash(&mut self) {
        if let Some(flash) = &mut self.flash {
            flash.ticks_remaining = flash.ticks_remaining.saturating_sub(1);
            if flash.ticks_remaining == 0 {
                self.flash = None;
            }
        }
    }

    /// Leave the level-up notice and keep playing
    pub fn resume(&mut self) {
        if self.phase == GamePhase::LevelUp {
            self.phase = GamePhase::Playing;
        }
    }

    /// Enter game over if out of lives. Returns true on the transition.
    pub fn check_game_over(&mut self) -> bool {
        if self.lives == 0 && self.phase != GamePhase::GameOver {
            self.phase = GamePhase::GameOver;
            self.spawn_timer.stop();
            log::info!("Game over, score {}", self.score);
            self.events.push(GameEvent::GameOver { score: self.score });
            return true;
        }
        false
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PALETTE;
    use crate::consts::*;
    use glam::Vec2;

    fn session() -> Session {
        Session::new(GameConfig::default(), 42)
    }

    /// Ball parked on its slot's midpoint, slot lit
    fn park_ball_on_slot(session: &mut Session, index: usize) -> u32 {
        let id = session.slot_id(index);
        session.slots[index].light(PALETTE[0]);
        let mid = session.slots[index].midpoint(session.rotation, session.slot_count);
        let ball_id = session.next_entity_id();
        session.balls.push(Ball {
            id: ball_id,
            // Gravity adds 0.1 before the hit test
            pos: mid - Vec2::new(0.0, 0.1),
            vel: Vec2::ZERO,
            color: PALETTE[0],
            target: Some(id),
            state: BallState::Falling,
        });
        ball_id
    }

    #[test]
    fn test_new_session() {
        let s = session();
        assert_eq!(s.score, 0);
        assert_eq!(s.lives, 6);
        assert_eq!(s.slot_count, 20);
        assert_eq!(s.slots.len(), 20);
        assert_eq!(s.spawn_interval, 5);
        assert!(s.spawn_timer.is_running());
        assert!(s.balls.is_empty());
        assert!(!s.background.is_empty());
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_miss_streak_costs_one_life_per_sixteen() {
        let mut s = session();
        for _ in 0..15 {
            assert!(!s.record_bounce());
        }
        assert_eq!(s.lives, 6);
        assert!(s.record_bounce());
        assert_eq!(s.lives, 5);
        assert_eq!(s.last_miss_checkpoint, 16);
        for _ in 0..15 {
            s.record_bounce();
        }
        assert_eq!(s.lives, 5);
        s.record_bounce();
        assert_eq!(s.lives, 4);
    }

    #[test]
    fn test_lives_saturate_at_zero() {
        let mut s = session();
        for _ in 0..16 * 10 {
            s.record_bounce();
        }
        assert_eq!(s.lives, 0);
    }

    #[test]
    fn test_hit_scores_and_frees_slot() {
        let mut s = session();
        park_ball_on_slot(&mut s, 4);
        assert_eq!(s.occupied_slots(), 1);

        s.update_balls();

        assert_eq!(s.score, 1);
        assert!(s.balls.is_empty());
        assert!(!s.slots[4].occupied);
        assert!(!s.slots[4].is_lit());
        assert_eq!(s.bursts.len(), 15);
        assert_eq!(s.flash.map(|f| f.color), Some(PALETTE[0]));
        assert_eq!(s.background.iter().filter(|p| p.is_lit()).count(), 1);
        assert!(s.events.contains(&GameEvent::Hit {
            ball_id: 1,
            slot: Some(4)
        }));
    }

    #[test]
    fn test_miss_keeps_ball() {
        let mut s = session();
        let id = s.slot_id(0);
        s.slots[0].light(PALETTE[1]);
        let ball_id = s.next_entity_id();
        s.balls.push(Ball {
            id: ball_id,
            pos: RING_CENTER,
            vel: Vec2::ZERO,
            color: PALETTE[1],
            target: Some(id),
            state: BallState::Falling,
        });
        s.update_balls();
        assert_eq!(s.score, 0);
        assert_eq!(s.balls.len(), 1);
        assert!(s.slots[0].occupied);
    }

    #[test]
    fn test_two_hits_same_tick() {
        let mut s = session();
        park_ball_on_slot(&mut s, 2);
        park_ball_on_slot(&mut s, 12);
        s.update_balls();
        assert_eq!(s.score, 2);
        assert!(s.balls.is_empty());
        assert_eq!(s.occupied_slots(), 0);
        assert_eq!(s.bursts.len(), 30);
    }

    #[test]
    fn test_win_threshold() {
        let mut s = session();
        s.score = 19;
        park_ball_on_slot(&mut s, 0);
        park_ball_on_slot(&mut s, 9);

        s.update_balls();

        // Both landings count; the level-up runs once
        assert_eq!(s.score, 21);
        assert_eq!(
            s.events
                .iter()
                .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
                .count(),
            1
        );
        assert_eq!(s.spawn_interval, 3);
        assert_eq!(s.slot_count, 30);
        assert_eq!(s.slots.len(), 30);
        assert!(s.slots.iter().all(|slot| !slot.occupied && !slot.is_lit()));
        assert!(s.balls.is_empty());
        assert_eq!(s.phase, GamePhase::LevelUp);
        assert_eq!(s.occupied_slots(), s.targeted_balls());

        s.resume();
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_level_up_keeps_balls_in_flight() {
        let mut s = session();
        s.score = 19;
        park_ball_on_slot(&mut s, 0);
        let flying = s.spawn_ball().unwrap();
        let old_index = s.balls[1].target.unwrap().index;
        let color = s.balls[1].color;

        s.update_balls();

        assert_eq!(s.phase, GamePhase::LevelUp);
        assert_eq!(s.balls.len(), 1);
        let ball = &s.balls[0];
        assert_eq!(ball.id, flying);
        let slot = s.slot(ball.target.unwrap()).unwrap();
        assert_eq!(slot.index, old_index);
        assert!(slot.occupied);
        assert_eq!(slot.color, Some(color));
        assert_eq!(s.occupied_slots(), 1);
        assert_eq!(s.occupied_slots(), s.targeted_balls());
    }

    #[test]
    fn test_level_up_ball_can_still_score() {
        let mut s = session();
        s.score = 19;
        park_ball_on_slot(&mut s, 0);
        s.spawn_ball().unwrap();
        s.update_balls();
        s.resume();

        // Park the surviving ball on its rebound slot
        let index = s.balls[0].target.unwrap().index;
        let mid = s.slots[index].midpoint(s.rotation, s.slot_count);
        s.balls[0].pos = mid - Vec2::new(0.0, 0.1);
        s.balls[0].vel = Vec2::ZERO;
        s.update_balls();

        assert_eq!(s.score, 21);
        assert!(s.balls.is_empty());
        assert_eq!(s.occupied_slots(), 0);
        assert!(s.events.contains(&GameEvent::Hit {
            ball_id: 2,
            slot: Some(index)
        }));
    }

    #[test]
    fn test_hit_on_stale_target_reports_no_slot() {
        let mut s = session();
        park_ball_on_slot(&mut s, 3);
        s.recreate_slots();
        let ball_id = s.balls[0].id;
        // Stale handles are never hit-tested, so consume directly
        s.balls[0].state = BallState::Consumed;
        s.consume(0);
        assert!(s.events.contains(&GameEvent::Hit { ball_id, slot: None }));
        assert_eq!(s.score, 1);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let mut s = session();
        s.spawn_interval = 2;
        s.score = 19;
        park_ball_on_slot(&mut s, 0);
        s.update_balls();
        assert_eq!(s.spawn_interval, 1);
    }

    #[test]
    fn test_stale_slot_handle() {
        let mut s = session();
        let old = s.slot_id(3);
        assert!(s.slot(old).is_some());
        s.recreate_slots();
        assert!(s.slot(old).is_none());
        assert!(s.slot(s.slot_id(3)).is_some());
        assert!(s.slot(s.slot_id(99)).is_none());
    }

    #[test]
    fn test_reset() {
        let mut s = session();
        s.score = 20;
        s.lives = 2;
        s.rotation = 1.3;
        s.slot_count = 30;
        s.miss_counter = 40;
        s.last_miss_checkpoint = 32;
        s.phase = GamePhase::GameOver;
        s.spawn_timer.stop();
        park_ball_on_slot(&mut s, 1);
        s.bursts.extend(spawn_burst(Vec2::ZERO, PALETTE[0], 5, &mut s.rng));

        s.reset();

        assert_eq!(s.score, 0);
        assert_eq!(s.lives, 6);
        assert_eq!(s.rotation, 0.0);
        assert_eq!(s.slot_count, 20);
        assert_eq!(s.slots.len(), 20);
        assert_eq!(s.miss_counter, 0);
        assert_eq!(s.last_miss_checkpoint, 0);
        assert!(s.balls.is_empty());
        assert!(s.bursts.is_empty());
        assert_eq!(s.occupied_slots(), 0);
        assert!(s.spawn_timer.is_running());
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_stops_timer() {
        let mut s = session();
        s.lives = 0;
        assert!(s.check_game_over());
        assert!(s.is_game_over());
        assert!(!s.spawn_timer.is_running());
        // Only transitions once
        assert!(!s.check_game_over());
    }

    #[test]
    fn test_flash_expires() {
        let mut s = session();
        s.flash = Some(Flash {
            color: PALETTE[2],
            ticks_remaining: 2,
        });
        s.update_flash();
        assert!(s.flash.is_some());
        s.update_flash();
        assert!(s.flash.is_none());
    }
}
