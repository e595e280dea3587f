//! La Vendange - a falling-hazard dodger
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawning, collisions, state)
//! - `input`: Keyboard/pointer aggregation into a movement intent
//! - `renderer`: Scene building and the WebGPU pipeline
//! - `driver`: Per-frame loop, session transitions and host callbacks
//! - `best_score`: Best-score bookkeeping behind a storage trait
//! - `platform`: Browser glue (wasm32 only)
//! - `tuning`: Data-driven game balance

pub mod best_score;
pub mod driver;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use best_score::{BestScore, MemoryStore, ScoreStore};
pub use driver::{Game, GameHost, NullHost};
pub use input::InputState;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Live particle cap; bursts past it are truncated
    pub const MAX_PARTICLES: usize = 512;
    /// Stars seeded into an empty background
    pub const STAR_COUNT: usize = 80;
    /// Nominal frame length used by headless runs
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
