//! Per-frame simulation step
//!
//! One call advances the game by exactly one display frame. Speeds are in
//! pixels per frame, so the step takes no delta time.

use glam::Vec2;
use rand::Rng;

use super::collision::{Outcome, classify};
use super::entity::{EntityKind, Particle};
use super::spawner::Spawner;
use super::state::{GameEvent, GameState, SessionState};
use crate::consts::MAX_PARTICLES;
use crate::input::Intent;
use crate::tuning::Tuning;

/// Explosion palette: death is fiery, bonuses sparkle gold
const DEATH_COLORS: [[f32; 4]; 3] = [
    [1.0, 0.45, 0.2, 1.0],
    [1.0, 0.8, 0.3, 1.0],
    [0.7, 0.15, 0.25, 1.0],
];
const BONUS_COLORS: [[f32; 4]; 2] = [[1.0, 0.88, 0.35, 1.0], [1.0, 1.0, 0.85, 1.0]];

/// Advance the game state by one frame, returning what the host should hear
pub fn tick(state: &mut GameState, intent: &Intent, tuning: &Tuning) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Nothing to simulate against an unmeasured surface
    if state.playfield.is_empty() {
        return events;
    }

    if state.session == SessionState::Playing {
        step_playing(state, intent, tuning, &mut events);
    }

    // Particles keep animating on every screen
    let decay = tuning.particle_decay;
    state.particles.retain_mut(|p| p.step(decay));

    events
}

fn step_playing(
    state: &mut GameState,
    intent: &Intent,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    let field = state.playfield;

    // 1. Move and clamp the player
    let player = &mut state.player;
    player.pos += intent.dir * player.speed;
    player.clamp_to(field.width, field.height);
    player.facing = intent.facing;

    // 2. Spawn
    state.frame += 1;
    let spawner = Spawner::new(tuning);
    let id = state.peek_entity_id();
    if let Some(entity) =
        spawner.maybe_spawn(state.frame, field.width, state.score, &mut state.rng, id)
    {
        state.next_entity_id();
        state.entities.push(entity);
    }

    // 3. Fall, classify, dispatch
    let mut hit_hostile = false;
    let mut i = 0;
    while i < state.entities.len() {
        let entity = &mut state.entities[i];
        entity.pos.y += entity.speed;

        match classify(entity, &state.player, field.height) {
            Outcome::Collided(EntityKind::Hostile) => {
                state.entities.swap_remove(i);
                let at = state.player.pos;
                burst(state, at, tuning.death_burst, 1.0, 4.0, &DEATH_COLORS);
                state.session = SessionState::GameOver;
                events.push(GameEvent::GameOver {
                    score: state.score,
                    elapsed_secs: state.elapsed_secs(),
                });
                log::info!(
                    "Session over: score {} after {:.1}s",
                    state.score,
                    state.elapsed_secs()
                );
                hit_hostile = true;
                break;
            }
            Outcome::Collided(EntityKind::Bonus) => {
                let at = entity.pos;
                state.entities.swap_remove(i);
                state.score += tuning.bonus_points;
                burst(state, at, tuning.bonus_burst, 0.5, 2.5, &BONUS_COLORS);
                events.push(GameEvent::BonusCollected { pos: at });
                events.push(GameEvent::ScoreChanged { score: state.score });
            }
            Outcome::Expired => {
                state.entities.swap_remove(i);
                state.score += tuning.survive_points;
                events.push(GameEvent::ScoreChanged { score: state.score });
            }
            Outcome::Alive => i += 1,
        }
    }

    if hit_hostile {
        // No scoring after the hit, but nothing stale may outlive the frame
        state.entities.retain(|e| e.pos.y <= field.height);
    }
}

/// Spawn an explosion of up to `count` particles at `at`
fn burst(
    state: &mut GameState,
    at: Vec2,
    count: u32,
    min_speed: f32,
    max_speed: f32,
    palette: &[[f32; 4]],
) {
    let room = MAX_PARTICLES.saturating_sub(state.particles.len());
    let count = (count as usize).min(room);
    let rng = &mut state.rng;

    for _ in 0..count {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = min_speed + rng.random::<f32>() * (max_speed - min_speed);
        let color = palette[rng.random_range(0..palette.len())];
        state.particles.push(Particle {
            pos: at,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            color,
            size: 1.5 + rng.random::<f32>() * 2.5,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Entity;
    use crate::sim::state::Playfield;
    use proptest::prelude::*;

    const W: f32 = 400.0;
    const H: f32 = 600.0;

    fn playing(seed: u64) -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(seed, Playfield::new(W, H), &tuning);
        state.begin(0.0, &tuning);
        (state, tuning)
    }

    fn push_entity(state: &mut GameState, kind: EntityKind, pos: Vec2, speed: f32) -> u32 {
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            kind,
            pos,
            radius: 12.0,
            speed,
        });
        id
    }

    #[test]
    fn test_bonus_pickup_scores_and_bursts() {
        let (mut state, tuning) = playing(1);
        let at = state.player.pos;
        push_entity(&mut state, EntityKind::Bonus, at, 0.0);

        let events = tick(&mut state, &Intent::default(), &tuning);

        assert_eq!(state.score, tuning.bonus_points);
        assert!(state.entities.is_empty());
        assert!(!state.particles.is_empty());
        assert_eq!(state.session, SessionState::Playing);
        assert!(events.contains(&GameEvent::ScoreChanged {
            score: tuning.bonus_points
        }));
    }

    #[test]
    fn test_hostile_hit_ends_session_once() {
        let (mut state, tuning) = playing(2);
        state.now_ms = 1_500.0;
        let at = state.player.pos;
        push_entity(&mut state, EntityKind::Hostile, at, 0.0);
        // Would score if processed after the hit
        push_entity(&mut state, EntityKind::Hostile, Vec2::new(30.0, H + 50.0), 1.0);

        let events = tick(&mut state, &Intent::default(), &tuning);

        assert_eq!(state.session, SessionState::GameOver);
        assert_eq!(state.score, 0);
        let overs: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(overs.len(), 1);
        if let GameEvent::GameOver { score, elapsed_secs } = *overs[0] {
            assert_eq!(score, 0);
            assert!((elapsed_secs - 1.5).abs() < 1e-9);
        }
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ScoreChanged { .. })));
        assert!(state.entities.iter().all(|e| e.pos.y <= H));
        assert!(!state.particles.is_empty());

        // Later frames never fire again
        let events = tick(&mut state, &Intent::default(), &tuning);
        assert!(events.is_empty());
    }

    #[test]
    fn test_expired_hostile_scores_and_is_removed() {
        let (mut state, tuning) = playing(3);
        push_entity(&mut state, EntityKind::Hostile, Vec2::new(20.0, H - 1.0), 5.0);

        tick(&mut state, &Intent::default(), &tuning);

        assert!(state.entities.is_empty());
        assert_eq!(state.score, tuning.survive_points);
    }

    #[test]
    fn test_collision_takes_precedence_over_expiry() {
        let (mut state, tuning) = playing(4);
        state.player.pos = Vec2::new(200.0, H - state.player.radius);
        push_entity(&mut state, EntityKind::Bonus, Vec2::new(200.0, H - 2.0), 5.0);

        tick(&mut state, &Intent::default(), &tuning);

        assert_eq!(state.score, tuning.bonus_points);
    }

    #[test]
    fn test_spawns_on_interval() {
        let (mut state, tuning) = playing(5);
        for _ in 0..tuning.base_spawn_interval - 1 {
            tick(&mut state, &Intent::default(), &tuning);
        }
        assert!(state.entities.is_empty());
        tick(&mut state, &Intent::default(), &tuning);
        assert_eq!(state.entities.len(), 1);
    }

    #[test]
    fn test_ids_only_consumed_by_spawns() {
        let (mut state, tuning) = playing(6);
        let first = state.peek_entity_id();
        for _ in 0..tuning.base_spawn_interval * 2 {
            tick(&mut state, &Intent::default(), &tuning);
        }
        let ids: Vec<u32> = state.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first, first + 1]);
        assert_eq!(state.peek_entity_id(), first + 2);
    }

    #[test]
    fn test_start_and_game_over_do_not_simulate() {
        let tuning = Tuning::default();
        let mut state = GameState::new(6, Playfield::new(W, H), &tuning);
        let before = state.player.pos;
        let intent = Intent {
            dir: Vec2::new(1.0, 0.0),
            facing: 0.0,
        };
        for _ in 0..100 {
            tick(&mut state, &intent, &tuning);
        }
        assert_eq!(state.player.pos, before);
        assert_eq!(state.frame, 0);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_zero_sized_playfield_skips_frame() {
        let tuning = Tuning::default();
        let mut state = GameState::new(7, Playfield::default(), &tuning);
        state.begin(0.0, &tuning);
        let events = tick(&mut state, &Intent::default(), &tuning);
        assert!(events.is_empty());
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_particles_expire() {
        let (mut state, tuning) = playing(8);
        let at = state.player.pos;
        push_entity(&mut state, EntityKind::Bonus, at, 0.0);
        tick(&mut state, &Intent::default(), &tuning);
        assert!(!state.particles.is_empty());

        state.session = SessionState::GameOver;
        let frames = (1.0 / tuning.particle_decay).ceil() as usize + 1;
        for _ in 0..frames {
            tick(&mut state, &Intent::default(), &tuning);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let (mut a, tuning) = playing(99);
        let (mut b, _) = playing(99);
        let intent = Intent {
            dir: Vec2::new(-1.0, 0.0),
            facing: -0.25,
        };
        for _ in 0..600 {
            tick(&mut a, &intent, &tuning);
            tick(&mut b, &intent, &tuning);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.session, b.session);
        assert_eq!(a.entities.len(), b.entities.len());
        assert_eq!(a.player.pos, b.player.pos);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            moves in prop::collection::vec((-1.0f32..=1.0, -1.0f32..=1.0), 1..200),
        ) {
            let (mut state, tuning) = playing(11);
            for (dx, dy) in moves {
                let intent = Intent { dir: Vec2::new(dx, dy), facing: 0.0 };
                tick(&mut state, &intent, &tuning);
                let p = &state.player;
                prop_assert!(p.pos.x >= p.radius && p.pos.x <= W - p.radius);
                prop_assert!(p.pos.y >= p.radius && p.pos.y <= H - p.radius);
                prop_assert!(state.entities.iter().all(|e| e.pos.y <= H));
            }
        }

        #[test]
        fn prop_score_never_decreases(seed in any::<u64>(), dx in -1.0f32..=1.0) {
            let (mut state, tuning) = playing(seed);
            let intent = Intent { dir: Vec2::new(dx, 0.0), facing: 0.0 };
            let mut last = state.score;
            for _ in 0..400 {
                tick(&mut state, &intent, &tuning);
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }
    }
}
