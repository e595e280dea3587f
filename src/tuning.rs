//! Data-driven game balance
//!
//! Every hand-tuned number lives here so playtests can tweak difficulty
//! without touching simulation code. Persisted as JSON in LocalStorage.

use serde::{Deserialize, Serialize};

/// Balance parameters (units are pixels and frames)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Player collision radius
    pub player_radius: f32,
    /// Player movement per frame at full intent
    pub player_speed: f32,
    /// Distance of the player's spawn point above the bottom edge
    pub player_bottom_margin: f32,
    /// Pointer distance under which follow input is ignored
    pub follow_dead_zone: f32,
    /// Visual tilt (radians) toward the held horizontal key
    pub facing_tilt: f32,

    // === Spawning ===
    /// Frames between spawn attempts at score 0
    pub base_spawn_interval: u32,
    /// Spawn interval floor
    pub min_spawn_interval: u32,
    /// Points needed to shave one frame off the spawn interval
    pub score_per_interval_step: u64,
    /// Probability that a spawn is a bonus
    pub bonus_chance: f64,
    pub hostile_radius_min: f32,
    pub hostile_radius_max: f32,
    pub bonus_radius: f32,
    /// Random base fall speed range (pixels per frame)
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,
    /// Extra fall speed per point of score
    pub speed_per_point: f32,

    // === Scoring ===
    /// Points for catching a bonus
    pub bonus_points: u64,
    /// Points for each hostile that leaves the playfield
    pub survive_points: u64,

    // === Particles ===
    /// Life lost per frame (life starts at 1.0)
    pub particle_decay: f32,
    /// Particles in the player's death explosion
    pub death_burst: u32,
    /// Particles in a bonus pickup burst
    pub bonus_burst: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: 14.0,
            player_speed: 6.0,
            player_bottom_margin: 60.0,
            follow_dead_zone: 4.0,
            facing_tilt: 0.25,

            base_spawn_interval: 40,
            min_spawn_interval: 12,
            score_per_interval_step: 25,
            bonus_chance: 0.1,
            hostile_radius_min: 12.0,
            hostile_radius_max: 24.0,
            bonus_radius: 11.0,
            min_fall_speed: 2.0,
            max_fall_speed: 4.0,
            speed_per_point: 0.01,

            bonus_points: 50,
            survive_points: 10,

            particle_decay: 0.02,
            death_burst: 40,
            bonus_burst: 12,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "vendange_tuning";

    /// Slowest fall speed (pixels per frame) validation lets through
    pub const MIN_FALL_SPEED: f32 = 0.1;

    /// Spawn interval (frames) for the given score, never below the floor
    pub fn spawn_interval(&self, score: u64) -> u32 {
        let step = self.score_per_interval_step.max(1);
        let shaved = (score / step).min(u32::MAX as u64) as u32;
        self.base_spawn_interval
            .saturating_sub(shaved)
            .max(self.min_spawn_interval)
            .max(1)
    }

    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate();
        Ok(tuning)
    }

    /// Repair values that would break the simulation (inverted ranges,
    /// zero intervals, out-of-range probabilities, entities that never fall)
    pub fn validate(&mut self) {
        if self.hostile_radius_min > self.hostile_radius_max {
            std::mem::swap(&mut self.hostile_radius_min, &mut self.hostile_radius_max);
        }
        // Every entity must keep moving down or it would never leave
        self.min_fall_speed = self.min_fall_speed.max(Self::MIN_FALL_SPEED);
        self.max_fall_speed = self.max_fall_speed.max(Self::MIN_FALL_SPEED);
        self.speed_per_point = self.speed_per_point.max(0.0);
        if self.min_fall_speed > self.max_fall_speed {
            std::mem::swap(&mut self.min_fall_speed, &mut self.max_fall_speed);
        }
        self.min_spawn_interval = self.min_spawn_interval.max(1);
        self.base_spawn_interval = self.base_spawn_interval.max(self.min_spawn_interval);
        self.bonus_chance = self.bonus_chance.clamp(0.0, 1.0);
        self.particle_decay = self.particle_decay.max(0.001);
        self.player_radius = self.player_radius.max(1.0);
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring malformed tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Spawner;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_interval_base_and_floor() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval(0), tuning.base_spawn_interval);
        assert_eq!(tuning.spawn_interval(u64::MAX), tuning.min_spawn_interval);
        assert_eq!(tuning.spawn_interval(1_000_000), tuning.min_spawn_interval);
    }

    #[test]
    fn test_spawn_interval_shrinks_with_score() {
        let tuning = Tuning::default();
        let early = tuning.spawn_interval(0);
        let mid = tuning.spawn_interval(200);
        assert!(mid < early);
        assert!(mid >= tuning.min_spawn_interval);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "bonus_points": 75 }"#).unwrap();
        assert_eq!(tuning.bonus_points, 75);
        assert_eq!(tuning.survive_points, Tuning::default().survive_points);
    }

    #[test]
    fn test_validate_repairs_ranges() {
        let tuning = Tuning::from_json(
            r#"{ "hostile_radius_min": 30.0, "hostile_radius_max": 10.0,
                 "min_spawn_interval": 0, "base_spawn_interval": 0,
                 "bonus_chance": 4.0 }"#,
        )
        .unwrap();
        assert!(tuning.hostile_radius_min <= tuning.hostile_radius_max);
        assert_eq!(tuning.min_spawn_interval, 1);
        assert!(tuning.base_spawn_interval >= tuning.min_spawn_interval);
        assert_eq!(tuning.bonus_chance, 1.0);
    }

    #[test]
    fn test_validate_keeps_entities_falling() {
        let tuning = Tuning::from_json(
            r#"{ "min_fall_speed": -5.0, "max_fall_speed": -1.0,
                 "speed_per_point": -0.5 }"#,
        )
        .unwrap();
        assert!(tuning.min_fall_speed > 0.0);
        assert!(tuning.max_fall_speed >= tuning.min_fall_speed);
        assert_eq!(tuning.speed_per_point, 0.0);

        // Spawned entities move down at any score
        let spawner = Spawner::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(3);
        for id in 0..50 {
            let e = spawner.spawn(400.0, 100_000, &mut rng, id);
            assert!(e.speed >= Tuning::MIN_FALL_SPEED);
        }
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
