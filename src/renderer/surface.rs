//! Immediate-mode 2D drawing contract
//!
//! Scene code draws through [`Surface`]; [`DrawList`] records the calls so
//! a GPU backend can replay them in one pass.

use glam::Vec2;

use crate::Color;

/// Fill/stroke style for one draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    /// 0 = invisible, 1 = opaque
    pub alpha: f32,
    /// Glow radius in play-field units (0 = none)
    pub glow: f32,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            alpha: 1.0,
            glow: 0.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_glow(mut self, glow: f32) -> Self {
        self.glow = glow.max(0.0);
        self
    }
}

/// A 2D drawing target in play-field coordinates (y down)
pub trait Surface {
    /// Erase everything drawn so far
    fn clear(&mut self);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: Paint);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint);
    /// Stroke the arc from `start` to `end` (radians, clockwise on screen)
    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        line_width: f32,
        paint: Paint,
    );
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        origin: Vec2,
        size: Vec2,
        paint: Paint,
    },
    Circle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        line_width: f32,
        paint: Paint,
    },
}

impl Primitive {
    pub fn paint(&self) -> Paint {
        match self {
            Primitive::Rect { paint, .. }
            | Primitive::Circle { paint, .. }
            | Primitive::Arc { paint, .. } => *paint,
        }
    }
}

/// Recording surface, drawn back to front
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub primitives: Vec<Primitive>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Surface for DrawList {
    fn clear(&mut self) {
        self.primitives.clear();
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: Paint) {
        self.primitives.push(Primitive::Rect {
            origin,
            size,
            paint,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint) {
        self.primitives.push(Primitive::Circle {
            center,
            radius,
            paint,
        });
    }

    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        line_width: f32,
        paint: Paint,
    ) {
        self.primitives.push(Primitive::Arc {
            center,
            radius,
            start,
            end,
            line_width,
            paint,
        });
    }
}
