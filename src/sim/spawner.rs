//! Difficulty-scaled entity spawning
//!
//! The spawner only decides; it never touches score or player. All randomness
//! comes from the caller's generator so a seeded run is fully reproducible.

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, EntityKind, clamp_axis};
use crate::tuning::Tuning;

/// Spawn decisions driven by frame counter and score
#[derive(Debug, Clone, Copy)]
pub struct Spawner<'a> {
    tuning: &'a Tuning,
}

impl<'a> Spawner<'a> {
    pub fn new(tuning: &'a Tuning) -> Self {
        Self { tuning }
    }

    /// Frames between spawn attempts at this score
    pub fn interval(&self, score: u64) -> u32 {
        self.tuning.spawn_interval(score)
    }

    /// Whether `frame` is a spawn frame at this score (frame 0 never is)
    pub fn is_spawn_frame(&self, frame: u64, score: u64) -> bool {
        frame > 0 && frame.is_multiple_of(self.interval(score) as u64)
    }

    /// Emit a new entity with id `id` if this frame is a spawn frame
    pub fn maybe_spawn<R: Rng>(
        &self,
        frame: u64,
        width: f32,
        score: u64,
        rng: &mut R,
        id: u32,
    ) -> Option<Entity> {
        if width <= 0.0 || !self.is_spawn_frame(frame, score) {
            return None;
        }
        Some(self.spawn(width, score, rng, id))
    }

    /// Roll a new entity unconditionally
    pub fn spawn<R: Rng>(&self, width: f32, score: u64, rng: &mut R, id: u32) -> Entity {
        let t = self.tuning;

        let kind = if rng.random_bool(t.bonus_chance) {
            EntityKind::Bonus
        } else {
            EntityKind::Hostile
        };

        let radius = match kind {
            EntityKind::Bonus => t.bonus_radius,
            EntityKind::Hostile => uniform(rng, t.hostile_radius_min, t.hostile_radius_max),
        };

        // Uniform over the playable width, fully on-screen
        let x = clamp_axis(uniform(rng, radius, width - radius), radius, width);

        let speed = uniform(rng, t.min_fall_speed, t.max_fall_speed)
            + score as f32 * t.speed_per_point;

        Entity {
            id,
            kind,
            pos: Vec2::new(x, -radius),
            radius,
            speed,
        }
    }
}

/// Uniform sample in `[lo, hi]`; degenerate ranges return `lo`
fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        lo + rng.random::<f32>() * (hi - lo)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cadence_at_zero_score() {
        let tuning = Tuning::default();
        let spawner = Spawner::new(&tuning);
        assert_eq!(spawner.interval(0), tuning.base_spawn_interval);

        let mut rng = Pcg32::seed_from_u64(1);
        let frames: Vec<u64> = (0..=200)
            .filter(|&f| spawner.maybe_spawn(f, 400.0, 0, &mut rng, 1).is_some())
            .collect();
        assert_eq!(frames, vec![40, 80, 120, 160, 200]);
    }

    #[test]
    fn test_cadence_floor_at_high_score() {
        let tuning = Tuning::default();
        let spawner = Spawner::new(&tuning);
        for score in [1_000, 10_000, 1_000_000] {
            assert!(spawner.interval(score) >= tuning.min_spawn_interval);
        }
        assert_eq!(spawner.interval(1_000_000), tuning.min_spawn_interval);
    }

    #[test]
    fn test_placement_stays_on_screen() {
        let tuning = Tuning::default();
        let spawner = Spawner::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..500 {
            let e = spawner.spawn(320.0, 0, &mut rng, id);
            assert!(e.pos.x >= e.radius && e.pos.x <= 320.0 - e.radius);
            assert!(e.pos.y < 0.0);
        }
    }

    #[test]
    fn test_narrow_playfield_centers() {
        let tuning = Tuning::default();
        let spawner = Spawner::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(3);
        let e = spawner.spawn(10.0, 0, &mut rng, 1);
        assert_eq!(e.pos.x, 5.0);
    }

    #[test]
    fn test_bonuses_are_rare() {
        let tuning = Tuning::default();
        let spawner = Spawner::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(42);
        let bonuses = (0..2000)
            .filter(|&id| spawner.spawn(400.0, 0, &mut rng, id).kind == EntityKind::Bonus)
            .count();
        // ~10% with generous slack
        assert!(bonuses > 100 && bonuses < 320, "bonuses = {}", bonuses);
    }

    #[test]
    fn test_speed_grows_with_score() {
        let tuning = Tuning::default();
        let spawner = Spawner::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(5);
        let fast = spawner.spawn(400.0, 1_000, &mut rng, 1);
        assert!(fast.speed >= tuning.min_fall_speed + 1_000.0 * tuning.speed_per_point);
        let slow = spawner.spawn(400.0, 0, &mut rng, 2);
        assert!(slow.speed <= tuning.max_fall_speed);
    }

    #[test]
    fn test_same_seed_same_entities() {
        let tuning = Tuning::default();
        let spawner = Spawner::new(&tuning);
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for id in 0..50 {
            let ea = spawner.spawn(400.0, id as u64 * 10, &mut a, id);
            let eb = spawner.spawn(400.0, id as u64 * 10, &mut b, id);
            assert_eq!(ea.kind, eb.kind);
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.speed, eb.speed);
        }
    }
}
