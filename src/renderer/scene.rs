//! Frame composition
//!
//! Turns the current game state into one triangle list. Pure: reads state,
//! never writes it. Layer order is background, entities, player, particles,
//! overlay, so nothing in the foreground is ever hidden by decoration.

use glam::Vec2;

use super::shapes;
use super::starfield::Starfield;
use super::vertex::{Vertex, colors};
use crate::sim::{EntityKind, GameState, SessionState};

const CIRCLE_SEGMENTS: u32 = 20;
const HUD_MARGIN: f32 = 16.0;
const HUD_DIGIT_HEIGHT: f32 = 22.0;
const BIG_DIGIT_HEIGHT: f32 = 64.0;
const RECORD_BAND_HEIGHT: f32 = 36.0;

/// Everything a frame is drawn from
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub state: &'a GameState,
    pub stars: &'a Starfield,
    pub best_score: u64,
    /// The finished session beat the previous best
    pub new_record: bool,
    /// Host time in ms, for pulsing effects only
    pub time_ms: f64,
}

/// Build the full frame
pub fn build_frame(view: &SceneView) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    background(&mut out, view);
    entities(&mut out, view.state);
    player(&mut out, view.state);
    particles(&mut out, view.state);
    overlay(&mut out, view);
    out
}

fn background(out: &mut Vec<Vertex>, view: &SceneView) {
    let field = view.state.playfield;
    shapes::vertical_gradient(
        out,
        Vec2::ZERO,
        Vec2::new(field.width, field.height),
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    );

    for star in &view.stars.stars {
        let mut color = colors::STAR;
        color[3] = star.brightness;
        let h = star.size / 2.0;
        shapes::rect(out, star.pos - Vec2::splat(h), star.pos + Vec2::splat(h), color);
    }
}

fn entities(out: &mut Vec<Vertex>, state: &GameState) {
    for entity in &state.entities {
        match entity.kind {
            EntityKind::Hostile => {
                shapes::circle(out, entity.pos, entity.radius, colors::HOSTILE, CIRCLE_SEGMENTS);
                shapes::ring(
                    out,
                    entity.pos,
                    entity.radius * 0.8,
                    entity.radius,
                    colors::HOSTILE_RIM,
                    CIRCLE_SEGMENTS,
                );
            }
            EntityKind::Bonus => {
                shapes::circle(
                    out,
                    entity.pos,
                    entity.radius * 1.6,
                    colors::BONUS_GLOW,
                    CIRCLE_SEGMENTS,
                );
                shapes::circle(out, entity.pos, entity.radius, colors::BONUS, CIRCLE_SEGMENTS);
            }
        }
    }
}

fn player(out: &mut Vec<Vertex>, state: &GameState) {
    // The ship is gone once it has exploded
    if state.session == SessionState::GameOver {
        return;
    }
    let p = &state.player;
    shapes::ship(out, p.pos, p.radius * 1.2, p.facing, p.color);
}

fn particles(out: &mut Vec<Vertex>, state: &GameState) {
    for particle in &state.particles {
        let mut color = particle.color;
        color[3] *= particle.life.clamp(0.0, 1.0);
        let h = particle.size / 2.0;
        shapes::rect(
            out,
            particle.pos - Vec2::splat(h),
            particle.pos + Vec2::splat(h),
            color,
        );
    }
}

fn overlay(out: &mut Vec<Vertex>, view: &SceneView) {
    let state = view.state;
    let field = state.playfield;

    match state.session {
        SessionState::Playing => {
            shapes::number(
                out,
                state.score,
                Vec2::splat(HUD_MARGIN),
                HUD_DIGIT_HEIGHT,
                colors::SCORE,
            );
            best_corner(out, view);
        }
        SessionState::Start => {
            best_corner(out, view);
            // Pulsing play glyph
            let pulse = 1.0 + 0.08 * ((view.time_ms / 300.0).sin() as f32);
            let size = field.width.min(field.height) * 0.12 * pulse;
            let c = Vec2::new(field.width / 2.0, field.height / 2.0);
            out.push(Vertex::new(c.x - size * 0.6, c.y - size, colors::SCORE));
            out.push(Vertex::new(c.x + size, c.y, colors::SCORE));
            out.push(Vertex::new(c.x - size * 0.6, c.y + size, colors::SCORE));
        }
        SessionState::GameOver => {
            shapes::rect(
                out,
                Vec2::ZERO,
                Vec2::new(field.width, field.height),
                colors::VEIL,
            );
            let w = shapes::number_width(state.score, BIG_DIGIT_HEIGHT);
            let origin = Vec2::new(
                (field.width - w) / 2.0,
                field.height / 2.0 - BIG_DIGIT_HEIGHT,
            );
            if view.new_record {
                record_badge(out, view, origin.y);
            }
            shapes::number(out, state.score, origin, BIG_DIGIT_HEIGHT, colors::SCORE);

            let best = view.best_score.max(state.score);
            let bw = shapes::number_width(best, HUD_DIGIT_HEIGHT);
            let best_origin = Vec2::new(
                (field.width - bw) / 2.0,
                field.height / 2.0 + HUD_DIGIT_HEIGHT,
            );
            shapes::number(out, best, best_origin, HUD_DIGIT_HEIGHT, colors::BEST);
        }
    }
}

/// Starred band just above the final score
fn record_badge(out: &mut Vec<Vertex>, view: &SceneView, score_top: f32) {
    let width = view.state.playfield.width;
    let bottom = score_top - HUD_MARGIN;
    let top = bottom - RECORD_BAND_HEIGHT;
    shapes::rect(
        out,
        Vec2::new(0.0, top),
        Vec2::new(width, bottom),
        colors::RECORD_BAND,
    );

    let pulse = 1.0 + 0.15 * ((view.time_ms / 200.0).sin() as f32);
    let outer = RECORD_BAND_HEIGHT * 0.35 * pulse;
    let y = (top + bottom) / 2.0;
    for dx in [-1.5, 0.0, 1.5] {
        let center = Vec2::new(width / 2.0 + dx * RECORD_BAND_HEIGHT, y);
        shapes::star(out, center, outer, outer * 0.45, 5, colors::RECORD);
    }
}

/// Best score in the top-right corner
fn best_corner(out: &mut Vec<Vertex>, view: &SceneView) {
    if view.best_score == 0 {
        return;
    }
    let height = HUD_DIGIT_HEIGHT * 0.75;
    let w = shapes::number_width(view.best_score, height);
    let origin = Vec2::new(view.state.playfield.width - HUD_MARGIN - w, HUD_MARGIN);
    shapes::number(out, view.best_score, origin, height, colors::BEST);
}
