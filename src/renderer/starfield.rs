//! Drifting starfield background
//!
//! Purely cosmetic and decoupled from gameplay: it has its own RNG and
//! keeps moving on every screen.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A background star
#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub pos: Vec2,
    /// Pixels per frame, downward
    pub speed: f32,
    pub size: f32,
    pub brightness: f32,
}

/// Looping field of stars
#[derive(Debug, Clone)]
pub struct Starfield {
    pub stars: Vec<Star>,
    rng: Pcg32,
}

impl Starfield {
    pub fn new(seed: u64) -> Self {
        Self {
            stars: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Scatter `count` stars over a `width` x `height` area
    pub fn seed(&mut self, width: f32, height: f32, count: usize) {
        self.stars.clear();
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        for _ in 0..count {
            let depth = self.rng.random::<f32>();
            self.stars.push(Star {
                pos: Vec2::new(
                    self.rng.random::<f32>() * width,
                    self.rng.random::<f32>() * height,
                ),
                speed: 0.2 + depth * 1.3,
                size: 0.6 + depth * 1.6,
                brightness: 0.3 + depth * 0.7,
            });
        }
    }

    /// Drop stars that fell outside a resized area
    pub fn retain_within(&mut self, width: f32, height: f32) {
        self.stars
            .retain(|s| s.pos.x >= 0.0 && s.pos.x <= width && s.pos.y >= 0.0 && s.pos.y <= height);
    }

    /// Move every star down, wrapping to the top with a new column
    pub fn drift(&mut self, width: f32, height: f32) {
        for star in &mut self.stars {
            star.pos.y += star.speed;
            if star.pos.y > height {
                star.pos.y -= height;
                star.pos.x = self.rng.random::<f32>() * width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_fills_area() {
        let mut field = Starfield::new(1);
        field.seed(300.0, 500.0, 50);
        assert_eq!(field.stars.len(), 50);
        assert!(
            field
                .stars
                .iter()
                .all(|s| (0.0..=300.0).contains(&s.pos.x) && (0.0..=500.0).contains(&s.pos.y))
        );
    }

    #[test]
    fn test_zero_area_seeds_nothing() {
        let mut field = Starfield::new(1);
        field.seed(0.0, 500.0, 50);
        assert!(field.is_empty());
    }

    #[test]
    fn test_drift_wraps() {
        let mut field = Starfield::new(2);
        field.seed(100.0, 100.0, 20);
        for _ in 0..1_000 {
            field.drift(100.0, 100.0);
        }
        assert_eq!(field.stars.len(), 20);
        assert!(field.stars.iter().all(|s| s.pos.y <= 100.0));
    }

    #[test]
    fn test_shrink_drops_outside_stars() {
        let mut field = Starfield::new(3);
        field.seed(400.0, 400.0, 100);
        field.retain_within(100.0, 100.0);
        assert!(field.stars.len() < 100);
        field.retain_within(-1.0, -1.0);
        assert!(field.is_empty());
    }
}
