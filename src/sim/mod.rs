//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - One step per frame, speeds in pixels per frame
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Outcome, circles_overlap, classify};
pub use entity::{Entity, EntityKind, Particle, Player};
pub use spawner::Spawner;
pub use state::{GameEvent, GameState, Playfield, SessionState};
pub use tick::tick;
