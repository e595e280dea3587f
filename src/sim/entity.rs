//! Moving actors: the player, falling entities and cosmetic particles

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Falling entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Touching it ends the session
    Hostile,
    /// Touching it scores and consumes it
    Bonus,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per frame at full intent
    pub speed: f32,
    /// Visual orientation in radians (0 = nose up); no gameplay effect
    pub facing: f32,
    pub color: [f32; 4],
}

impl Player {
    pub const COLOR: [f32; 4] = [0.98, 0.85, 0.45, 1.0];

    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            pos,
            radius,
            speed,
            facing: 0.0,
            color: Self::COLOR,
        }
    }

    /// Keep the player fully inside a `width` x `height` playfield
    pub fn clamp_to(&mut self, width: f32, height: f32) {
        self.pos.x = clamp_axis(self.pos.x, self.radius, width);
        self.pos.y = clamp_axis(self.pos.y, self.radius, height);
    }
}

/// Clamp `v` into `[radius, extent - radius]`, centering when the extent
/// is too small to hold the circle
#[inline]
pub fn clamp_axis(v: f32, radius: f32, extent: f32) -> f32 {
    if extent <= radius * 2.0 {
        extent / 2.0
    } else {
        v.max(radius).min(extent - radius)
    }
}

/// A falling hostile or bonus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per frame, downward
    pub speed: f32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 1 -> 0
    pub color: [f32; 4],
    pub size: f32,
}

impl Particle {
    /// Advance one frame; returns false once the particle has expired
    pub fn step(&mut self, decay: f32) -> bool {
        self.pos += self.vel;
        self.life -= decay;
        self.life > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(-5.0, 10.0, 100.0), 10.0);
        assert_eq!(clamp_axis(95.0, 10.0, 100.0), 90.0);
        assert_eq!(clamp_axis(50.0, 10.0, 100.0), 50.0);
        // Too narrow to hold the circle
        assert_eq!(clamp_axis(3.0, 10.0, 15.0), 7.5);
    }

    #[test]
    fn test_particle_expires() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 2.0),
            life: 0.05,
            color: [1.0; 4],
            size: 2.0,
        };
        assert!(p.step(0.02));
        assert_eq!(p.pos, Vec2::new(1.0, 2.0));
        assert!(p.step(0.02));
        assert!(!p.step(0.02));
    }
}
