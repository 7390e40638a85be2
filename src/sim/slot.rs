//! Ring slots
//!
//! Slot `i` of `N` covers `[i·(2π/N), (i+1)·(2π/N))`, shifted by the ring's
//! current rotation.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::Color;
use crate::consts::{RING_CENTER, RING_RADIUS};
use crate::polar_to_cartesian;

/// Generation-checked handle to a slot.
///
/// Slots are recreated wholesale at level-up; a handle taken before that
/// no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub index: usize,
    pub generation: u32,
}

/// One angular segment of the ring
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub index: usize,
    /// `None` while unlit
    pub color: Option<Color>,
    /// Some ball is on its way to this slot
    pub occupied: bool,
}

impl Slot {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            color: None,
            occupied: false,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.color.is_some()
    }

    /// Mark as the target of a ball with the given color
    pub fn light(&mut self, color: Color) {
        self.color = Some(color);
        self.occupied = true;
    }

    /// Back to unlit and free
    pub fn clear(&mut self) {
        self.color = None;
        self.occupied = false;
    }

    /// Display color (white when unlit)
    pub fn display_color(&self) -> Color {
        self.color.unwrap_or(Color::UNLIT)
    }

    /// Angular start and end of the slot
    pub fn span(&self, rotation: f32, slot_count: u32) -> (f32, f32) {
        let size = angle_size(slot_count);
        let start = self.index as f32 * size + rotation;
        (start, start + size)
    }

    /// Point on the ring at the slot's angular center
    pub fn midpoint(&self, rotation: f32, slot_count: u32) -> Vec2 {
        let size = angle_size(slot_count);
        let theta = size * self.index as f32 + size / 2.0 + rotation;
        RING_CENTER + polar_to_cartesian(RING_RADIUS, theta)
    }
}

/// Angular width of one slot
#[inline]
pub fn angle_size(slot_count: u32) -> f32 {
    TAU / slot_count.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_span_follows_rotation() {
        let slot = Slot::new(3);
        let (start, end) = slot.span(0.0, 20);
        assert!((start - 3.0 * PI / 10.0).abs() < 1e-5);
        assert!((end - 4.0 * PI / 10.0).abs() < 1e-5);

        let (start, _) = slot.span(1.0, 20);
        assert!((start - (3.0 * PI / 10.0 + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_midpoint_on_ring() {
        let slot = Slot::new(7);
        let mid = slot.midpoint(0.4, 20);
        assert!((mid.distance(RING_CENTER) - RING_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn test_midpoint_quarter_turn() {
        // Four slots, no rotation: slot 0 is centered at 45°
        let mid = Slot::new(0).midpoint(0.0, 4);
        let expected = RING_CENTER + polar_to_cartesian(RING_RADIUS, PI / 4.0);
        assert!(mid.distance(expected) < 1e-3);
    }

    #[test]
    fn test_light_and_clear_together() {
        let mut slot = Slot::new(0);
        assert!(!slot.is_lit() && !slot.occupied);
        slot.light(crate::color::PALETTE[1]);
        assert!(slot.is_lit() && slot.occupied);
        slot.clear();
        assert!(!slot.is_lit() && !slot.occupied);
        assert_eq!(slot.display_color(), Color::UNLIT);
    }
}
