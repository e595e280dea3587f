//! Circle collision and per-entity frame classification
//!
//! Collision always wins over expiry: an entity that touches the player on
//! the same frame it crosses the bottom edge counts as a hit.

use glam::Vec2;

use super::entity::{Entity, EntityKind, Player};

/// What happens to an entity this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Overlaps the player
    Collided(EntityKind),
    /// Fell past the bottom edge untouched
    Expired,
    /// Still in play
    Alive,
}

/// Strict circle overlap: centers exactly `r1 + r2` apart do not collide
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Classify an (already moved) entity against the player
pub fn classify(entity: &Entity, player: &Player, height: f32) -> Outcome {
    if circles_overlap(entity.pos, entity.radius, player.pos, player.radius) {
        Outcome::Collided(entity.kind)
    } else if entity.pos.y > height {
        Outcome::Expired
    } else {
        Outcome::Alive
    }
}
