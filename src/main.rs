//! Slice Rush entry point
//!
//! Runs a headless autoplay session: a scripted blade slices a random share of
//! whatever spawns until it hits a bomb or the frame cap is reached.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use slice_rush::consts::FRAME_DT;
use slice_rush::platform::{LogPresentation, Services};
use slice_rush::sim::{EntityId, SpawnCategory};
use slice_rush::{HighScoreStore, Session, SessionPhase, TickInput, Tuning, tick};

/// Two minutes at 60 Hz
const MAX_FRAMES: u32 = 60 * 120;
/// Per-frame chance the blade cuts a given fruit or power-up
const SLICE_CHANCE: f32 = 0.05;
/// Per-frame chance the blade clips a bomb
const BOMB_SLICE_CHANCE: f32 = 0.004;

/// Game instance driving a session with scripted input
struct Game {
    session: Session,
    blade_rng: Pcg32,
    frame: u32,
}

/// End-of-run summary
struct RunSummary {
    frames: u32,
    score: u64,
    high_score: u64,
    game_over: bool,
}

impl Game {
    fn new(tuning: Tuning, store: impl HighScoreStore + 'static) -> Self {
        let seed = tuning.seed.unwrap_or_default();
        let services = Services::headless()
            .with_presentation(LogPresentation)
            .with_store(store);
        Self {
            session: Session::new(tuning, services),
            blade_rng: Pcg32::seed_from_u64(seed ^ 0xB1ADE),
            frame: 0,
        }
    }

    /// Pick this frame's cuts
    fn blade_input(&mut self) -> TickInput {
        let mut slices: Vec<EntityId> = Vec::new();
        if self.session.slicing_enabled() {
            for entity in self.session.registry().iter().filter(|e| !e.sliced) {
                let chance = match entity.category {
                    SpawnCategory::Bomb => BOMB_SLICE_CHANCE,
                    _ => SLICE_CHANCE,
                };
                if self.blade_rng.random::<f32>() < chance {
                    slices.push(entity.id);
                }
            }
        }
        TickInput {
            pause: false,
            slices,
        }
    }

    /// Run simulation frames
    fn run(&mut self, max_frames: u32) -> RunSummary {
        while self.frame < max_frames && self.session.phase() != SessionPhase::GameOver {
            let input = self.blade_input();
            tick(&mut self.session, &input, FRAME_DT);
            self.frame += 1;
        }

        RunSummary {
            frames: self.frame,
            score: self.session.score(),
            high_score: self.session.high_score(),
            game_over: self.session.phase() == SessionPhase::GameOver,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use slice_rush::highscores::FileHighScores;
    use std::path::Path;

    env_logger::init();
    log::info!("Slice Rush (headless) starting...");

    let mut tuning = std::env::args()
        .nth(1)
        .map(|path| Tuning::load_or_default(Path::new(&path)))
        .unwrap_or_default();
    if tuning.seed.is_none() {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(slice_rush::sim::DEFAULT_SEED);
        tuning.seed = Some(seed);
    }
    log::info!("Seed {}", tuning.seed.unwrap_or_default());

    let store = FileHighScores::open(std::env::temp_dir().join("slice-rush").join("hiscore.json"));
    let mut game = Game::new(tuning, store);
    let summary = game.run(MAX_FRAMES);

    println!(
        "{} after {:.1}s: score {}, high score {}",
        if summary.game_over { "Game over" } else { "Time up" },
        summary.frames as f32 * FRAME_DT,
        summary.score,
        summary.high_score
    );
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    use slice_rush::highscores::LocalStorageHighScores;

    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Slice Rush (wasm) starting...");

    let tuning = Tuning {
        seed: Some(js_sys::Date::now() as u64),
        ..Default::default()
    };
    let mut game = Game::new(tuning, LocalStorageHighScores::load());
    let summary = game.run(MAX_FRAMES);
    log::info!(
        "Run ended after {} frames: score {}, high score {} (game over: {})",
        summary.frames,
        summary.score,
        summary.high_score,
        summary.game_over
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
