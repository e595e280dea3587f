//! Session state and core simulation types
//!
//! Everything the frame step mutates lives in `GameState`, owned by the
//! loop driver and handed to `tick` by exclusive reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Particle, Player};
use crate::tuning::Tuning;

/// Lifecycle of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Title screen, waiting for a start request
    Start,
    /// Active gameplay
    Playing,
    /// Session ended by a hostile hit
    GameOver,
}

/// Things the host may want to hear about, produced by a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Score changed (bonus pickup or survived hostile)
    ScoreChanged { score: u64 },
    /// A bonus was consumed at this position
    BonusCollected { pos: Vec2 },
    /// Session ended; fired once per session
    GameOver { score: u64, elapsed_secs: f64 },
}

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Not yet measured, or collapsed to nothing
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Player spawn point: centered, near the bottom edge
    pub fn player_spawn(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(
            self.width / 2.0,
            (self.height - tuning.player_bottom_margin).max(self.height / 2.0),
        )
    }
}

/// Complete simulation state for one running game
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current session
    pub seed: u64,
    pub session: SessionState,
    pub score: u64,
    /// Frames simulated in the current session
    pub frame: u64,
    /// Host timestamp (ms) at session start
    pub started_at_ms: f64,
    /// Host timestamp (ms) of the latest frame
    pub now_ms: f64,
    pub playfield: Playfield,
    pub player: Player,
    pub entities: Vec<Entity>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a state on the title screen
    pub fn new(seed: u64, playfield: Playfield, tuning: &Tuning) -> Self {
        Self {
            seed,
            session: SessionState::Start,
            score: 0,
            frame: 0,
            started_at_ms: 0.0,
            now_ms: 0.0,
            playfield,
            player: Player::new(
                playfield.player_spawn(tuning),
                tuning.player_radius,
                tuning.player_speed,
            ),
            entities: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// The ID `next_entity_id` will hand out, without consuming it
    pub fn peek_entity_id(&self) -> u32 {
        self.next_id
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Reset everything a session owns. Particles are cleared as well so a
    /// new session starts on a clean field.
    fn reset_session(&mut self, tuning: &Tuning) {
        self.score = 0;
        self.frame = 0;
        self.player = Player::new(
            self.playfield.player_spawn(tuning),
            tuning.player_radius,
            tuning.player_speed,
        );
        self.player.clamp_to(self.playfield.width, self.playfield.height);
        self.entities.clear();
        self.particles.clear();
    }

    /// Enter Playing with a fresh session starting at `now_ms`
    pub fn begin(&mut self, now_ms: f64, tuning: &Tuning) {
        self.reset_session(tuning);
        self.started_at_ms = now_ms;
        self.now_ms = now_ms;
        self.session = SessionState::Playing;
    }

    /// Return to the title screen
    pub fn reset_to_start(&mut self, tuning: &Tuning) {
        self.reset_session(tuning);
        self.session = SessionState::Start;
    }

    /// Seconds since the session started
    pub fn elapsed_secs(&self) -> f64 {
        ((self.now_ms - self.started_at_ms) / 1000.0).max(0.0)
    }

    /// Apply a new playfield size, keeping the player inside it
    pub fn resize(&mut self, playfield: Playfield) {
        self.playfield = playfield;
        if !playfield.is_empty() {
            self.player.clamp_to(playfield.width, playfield.height);
        }
    }
}
