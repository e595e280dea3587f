//! Platform abstraction layer
//!
//! Browser glue lives in `web` (canvas, WebGPU surface, listeners,
//! LocalStorage). Native builds only run headless and need nothing here.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// LocalStorage key holding the best score
pub const BEST_SCORE_KEY: &str = "sommelier_highscore";
