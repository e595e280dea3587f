//! La Vendange entry point
//!
//! The browser build is driven from JS through the library's exported
//! handle. Natively there is no window: the binary runs a headless session
//! flown by the autopilot and logs how it went.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use la_vendange::consts::FRAME_MS;
    use la_vendange::sim::SessionState;
    use la_vendange::{Game, GameHost, InputState, MemoryStore, Tuning};

    /// Logs every callback
    struct LogHost;

    impl GameHost for LogHost {
        fn score_changed(&mut self, score: u64) {
            log::debug!("Score: {}", score);
        }

        fn game_over(&mut self, score: u64, elapsed_secs: f64) {
            log::info!("Game over: score {} after {:.1}s", score, elapsed_secs);
        }
    }

    env_logger::init();
    log::info!("La Vendange (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x76_65_6e_64);
    let max_frames: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 120);

    let tuning = match std::env::var("VENDANGE_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::load(),
    };

    let mut game = Game::new(seed, tuning, LogHost, MemoryStore::default());
    game.resize(480.0, 720.0);

    let mut input = InputState {
        start: true,
        demo: true,
        ..Default::default()
    };

    let mut now_ms = 0.0;
    let mut frames = 0;
    while frames < max_frames {
        game.frame(now_ms, &mut input);
        now_ms += FRAME_MS;
        frames += 1;
        if game.state.session == SessionState::GameOver {
            break;
        }
    }

    log::info!(
        "Demo finished after {} frames: score {}, best {}, {} entities on field",
        frames,
        game.state.score,
        game.best_score(),
        game.state.entities.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start function
}
