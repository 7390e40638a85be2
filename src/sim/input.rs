//! Drag-to-rotate input
//!
//! The player grabs the ring and turns it: the change in pointer angle
//! around the ring center between two moves is added to the rotation.

use glam::Vec2;

use crate::consts::RING_CENTER;
use crate::normalize_angle;

/// Pointer drag tracker
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    dragging: bool,
    last_angle: f32,
}

impl DragState {
    /// Angle of a play-field point around the ring center
    pub fn angle_of(point: Vec2) -> f32 {
        let d = point - RING_CENTER;
        d.y.atan2(d.x)
    }

    pub fn press(&mut self, point: Vec2) {
        self.dragging = true;
        self.last_angle = Self::angle_of(point);
    }

    /// Rotation delta for a pointer move, `None` when not dragging
    pub fn move_to(&mut self, point: Vec2) -> Option<f32> {
        if !self.dragging {
            return None;
        }
        let angle = Self::angle_of(point);
        let delta = normalize_angle(angle - self.last_angle);
        self.last_angle = angle;
        Some(delta)
    }

    /// Pointer up or left the canvas
    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
