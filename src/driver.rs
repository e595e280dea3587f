//! Frame loop driver
//!
//! Owns the simulation and everything around it: session transitions,
//! playfield measurement, the starfield, best-score bookkeeping and the
//! host callbacks. Platform glue calls `frame` once per display refresh and
//! presents whatever geometry comes back.

use crate::best_score::{BestScore, ScoreStore};
use crate::consts::STAR_COUNT;
use crate::input::InputState;
use crate::renderer::{SceneView, Starfield, Vertex, build_frame};
use crate::sim::{GameEvent, GameState, Playfield, SessionState, autopilot, tick};
use crate::tuning::Tuning;

/// Callbacks into the embedding application
pub trait GameHost {
    /// Score changed (including the reset to 0 at session start)
    fn score_changed(&mut self, score: u64);
    /// Session ended; called once per session
    fn game_over(&mut self, score: u64, elapsed_secs: f64);
}

/// Host that ignores everything
#[derive(Debug, Default)]
pub struct NullHost;

impl GameHost for NullHost {
    fn score_changed(&mut self, _score: u64) {}
    fn game_over(&mut self, _score: u64, _elapsed_secs: f64) {}
}

/// A running mini-game
pub struct Game<H: GameHost, S: ScoreStore> {
    pub state: GameState,
    pub tuning: Tuning,
    pub stars: Starfield,
    best: BestScore<S>,
    host: H,
    /// Whether the best score was beaten by the last finished session
    new_record: bool,
}

impl<H: GameHost, S: ScoreStore> Game<H, S> {
    pub fn new(seed: u64, mut tuning: Tuning, host: H, store: S) -> Self {
        tuning.validate();
        Self {
            state: GameState::new(seed, Playfield::default(), &tuning),
            stars: Starfield::new(seed ^ 0x5eed_57a2),
            tuning,
            best: BestScore::load(store),
            host,
            new_record: false,
        }
    }

    pub fn best_score(&self) -> u64 {
        self.best.value()
    }

    pub fn new_record(&self) -> bool {
        self.new_record
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &S {
        self.best.store()
    }

    /// Begin a new session at host time `now_ms`
    pub fn start_session(&mut self, now_ms: f64) {
        self.state.begin(now_ms, &self.tuning);
        self.new_record = false;
        log::info!("Session started (seed {})", self.state.seed);
        self.host.score_changed(0);
    }

    /// Back to the title screen. The host hears about the score dropping
    /// to 0 unless it already was 0.
    pub fn reset_to_start(&mut self) {
        let previous = self.state.score;
        self.state.reset_to_start(&self.tuning);
        self.new_record = false;
        if previous != 0 {
            self.host.score_changed(0);
        }
    }

    /// Apply a newly measured surface size
    pub fn resize(&mut self, width: f32, height: f32) {
        let playfield = Playfield::new(width.max(0.0), height.max(0.0));
        if playfield == self.state.playfield {
            return;
        }
        log::info!("Playfield resized to {}x{}", playfield.width, playfield.height);
        self.state.resize(playfield);

        self.stars.retain_within(playfield.width, playfield.height);
        if self.stars.is_empty() && !playfield.is_empty() {
            self.stars.seed(playfield.width, playfield.height, STAR_COUNT);
        }
    }

    /// Run one frame: input, simulate, decorate, draw.
    /// Returns `None` while the surface has no area.
    pub fn frame(&mut self, now_ms: f64, input: &mut InputState) -> Option<Vec<Vertex>> {
        if self.state.playfield.is_empty() {
            return None;
        }

        if input.take_start() && self.state.session != SessionState::Playing {
            self.start_session(now_ms);
        }

        self.state.now_ms = now_ms;

        if input.demo && self.state.session == SessionState::Playing {
            input.follow = autopilot::steer(&self.state);
        }

        let intent = input.intent(
            self.state.player.pos,
            self.tuning.follow_dead_zone,
            self.tuning.facing_tilt,
        );

        for event in tick(&mut self.state, &intent, &self.tuning) {
            self.dispatch(event);
        }

        let field = self.state.playfield;
        self.stars.drift(field.width, field.height);

        let view = SceneView {
            state: &self.state,
            stars: &self.stars,
            best_score: self.best.value(),
            new_record: self.new_record,
            time_ms: now_ms,
        };
        Some(build_frame(&view))
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::ScoreChanged { score } => self.host.score_changed(score),
            GameEvent::BonusCollected { pos } => {
                log::debug!("Bonus collected at ({:.0}, {:.0})", pos.x, pos.y);
            }
            GameEvent::GameOver { score, elapsed_secs } => {
                self.new_record = self.best.record(score);
                self.host.game_over(score, elapsed_secs);
            }
        }
    }
}
