//! Draws a session onto any [`Surface`]

use glam::Vec2;

use super::surface::{Paint, Surface};
use crate::Color;
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Ball, BackgroundParticle, BurstParticle, Session, Slot};

/// Full frame: ground, background particles, slots, balls, bursts
pub fn draw_scene<S: Surface + ?Sized>(session: &Session, settings: &Settings, surface: &mut S) {
    surface.clear();
    draw_ground(surface);

    if settings.background_particles {
        for particle in &session.background {
            draw_background_particle(particle, surface);
        }
    }

    for slot in &session.slots {
        draw_slot(slot, session.rotation, session.slot_count, settings, surface);
    }

    for ball in &session.balls {
        draw_ball(ball, surface);
    }

    for particle in session.bursts.iter().take(settings.max_particles()) {
        draw_burst_particle(particle, surface);
    }
}

/// Thin strip the ring stands on
pub fn draw_ground<S: Surface + ?Sized>(surface: &mut S) {
    let origin = Vec2::new(
        RING_CENTER.x - GROUND_HALF_WIDTH,
        RING_CENTER.y + GROUND_OFFSET_Y,
    );
    surface.fill_rect(
        origin,
        Vec2::new(GROUND_HALF_WIDTH * 2.0, GROUND_HEIGHT),
        Paint::solid(Color::BLACK),
    );
}

/// Arc segment, glowing in its ball's color while lit
pub fn draw_slot<S: Surface + ?Sized>(
    slot: &Slot,
    rotation: f32,
    slot_count: u32,
    settings: &Settings,
    surface: &mut S,
) {
    let (start, end) = slot.span(rotation, slot_count);
    let glow = if slot.is_lit() {
        SLOT_GLOW_LIT
    } else {
        SLOT_GLOW_UNLIT
    };
    let paint = Paint::solid(slot.display_color()).with_glow(settings.effective_glow(glow));
    surface.stroke_arc(RING_CENTER, RING_RADIUS, start, end, SLOT_LINE_WIDTH, paint);
}

pub fn draw_ball<S: Surface + ?Sized>(ball: &Ball, surface: &mut S) {
    surface.fill_circle(ball.pos, BALL_RADIUS, Paint::solid(ball.color));
}

pub fn draw_background_particle<S: Surface + ?Sized>(particle: &BackgroundParticle, surface: &mut S) {
    let color = particle.color.unwrap_or(Color::UNLIT);
    surface.fill_circle(particle.pos, particle.radius, Paint::solid(color));
}

pub fn draw_burst_particle<S: Surface + ?Sized>(particle: &BurstParticle, surface: &mut S) {
    if particle.alpha <= 0.0 {
        return;
    }
    surface.fill_circle(
        particle.pos,
        particle.radius,
        Paint::solid(particle.color).with_alpha(particle.alpha),
    );
}
