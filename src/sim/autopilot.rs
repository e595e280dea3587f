//! Demo-mode pilot
//!
//! Produces a follow target the same way a finger on the screen would, so
//! the attract loop exercises the normal input path.

use glam::Vec2;

use super::entity::EntityKind;
use super::state::GameState;

/// How far above the player (in frames of fall) a hostile counts as a threat
const LOOKAHEAD_FRAMES: f32 = 45.0;
/// Extra clearance kept around hostiles
const MARGIN: f32 = 10.0;

/// Pick a follow target for the player, or None to hold still
pub fn steer(state: &GameState) -> Option<Vec2> {
    let field = state.playfield;
    if field.is_empty() {
        return None;
    }
    let player = &state.player;

    // Most urgent hostile: in our column, above us, arriving soonest
    let threat = state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Hostile && e.pos.y < player.pos.y + player.radius)
        .filter(|e| (e.pos.x - player.pos.x).abs() < e.radius + player.radius + MARGIN)
        .map(|e| {
            let frames = (player.pos.y - e.pos.y).max(0.0) / e.speed.max(0.1);
            (e, frames)
        })
        .filter(|(_, frames)| *frames < LOOKAHEAD_FRAMES)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((hostile, _)) = threat {
        // Dodge toward the side with more room
        let clearance = hostile.radius + player.radius + MARGIN * 2.0;
        let left = hostile.pos.x - clearance;
        let right = hostile.pos.x + clearance;
        let x = if hostile.pos.x > player.pos.x {
            if left > player.radius { left } else { right }
        } else if right < field.width - player.radius {
            right
        } else {
            left
        };
        return Some(Vec2::new(x, player.pos.y));
    }

    // Nothing dangerous: go for the nearest bonus still above us
    let bonus = state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Bonus && e.pos.y < player.pos.y)
        .min_by(|a, b| {
            let da = a.pos.distance_squared(player.pos);
            let db = b.pos.distance_squared(player.pos);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(bonus) = bonus {
        return Some(Vec2::new(bonus.pos.x, player.pos.y));
    }

    // Drift back to the lane centre
    Some(Vec2::new(field.width / 2.0, player.pos.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Entity;
    use crate::sim::state::Playfield;
    use crate::tuning::Tuning;

    fn state_with(entities: Vec<Entity>) -> GameState {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, Playfield::new(400.0, 600.0), &tuning);
        state.begin(0.0, &tuning);
        state.entities = entities;
        state
    }

    fn entity(kind: EntityKind, x: f32, y: f32) -> Entity {
        Entity {
            id: 1,
            kind,
            pos: Vec2::new(x, y),
            radius: 15.0,
            speed: 4.0,
        }
    }

    #[test]
    fn test_dodges_incoming_hostile() {
        // Player sits at x = 200
        let state = state_with(vec![entity(EntityKind::Hostile, 205.0, 450.0)]);
        let target = steer(&state).unwrap();
        assert!((target.x - 205.0).abs() > 15.0 + 14.0);
    }

    #[test]
    fn test_chases_bonus_when_safe() {
        let state = state_with(vec![entity(EntityKind::Bonus, 320.0, 100.0)]);
        let target = steer(&state).unwrap();
        assert_eq!(target.x, 320.0);
    }

    #[test]
    fn test_returns_to_centre() {
        let mut state = state_with(Vec::new());
        state.player.pos.x = 50.0;
        let target = steer(&state).unwrap();
        assert_eq!(target.x, 200.0);
    }

    #[test]
    fn test_unmeasured_playfield() {
        let tuning = Tuning::default();
        let state = GameState::new(1, Playfield::default(), &tuning);
        assert!(steer(&state).is_none());
    }
}
