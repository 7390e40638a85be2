//! Play field ↔ canvas mapping
//!
//! The 600×500 play field is scaled uniformly to fit the canvas and
//! centered, letterboxing the spare axis.

use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset: Vec2,
}

impl Viewport {
    /// Fit the play field into a canvas of the given size
    pub fn fit(width: f32, height: f32) -> Self {
        let scale = (width / FIELD_WIDTH).min(height / FIELD_HEIGHT).max(f32::EPSILON);
        let offset = Vec2::new(
            (width - FIELD_WIDTH * scale) / 2.0,
            (height - FIELD_HEIGHT * scale) / 2.0,
        );
        Self { scale, offset }
    }

    pub fn to_canvas(&self, field: Vec2) -> Vec2 {
        field * self.scale + self.offset
    }

    /// Canvas point (e.g. pointer position) to play-field coordinates
    pub fn to_field(&self, canvas: Vec2) -> Vec2 {
        (canvas - self.offset) / self.scale
    }
}
