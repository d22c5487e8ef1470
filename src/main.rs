//! Tilt Invaders headless driver
//!
//! Runs the simulation at a fixed 60 Hz with a scripted pilot standing in
//! for the accelerometer and touch screen. Contacts come from the built-in
//! overlap pass instead of a physics engine.
//!
//! Usage: `tilt-invaders [tuning.json] [seed]`

use std::process::ExitCode;

use tilt_invaders::Tuning;
use tilt_invaders::sim::{
    Category, GameEvent, GameState, Host, SeededRandom, detect_contacts, update,
};

const FRAME_DT: f64 = 1.0 / 60.0;
/// Give up after ten minutes of simulated play
const MAX_FRAMES: u64 = 60 * 60 * 10;
/// Horizontal distance that maps to full tilt
const STEER_RANGE: f32 = 40.0;

/// Scripted stand-in for the device: steers under the lowest invader and
/// taps every frame
#[derive(Default)]
struct Pilot {
    tilt: Option<f32>,
    motion_on: bool,
    final_score: Option<u64>,
}

impl Pilot {
    fn new() -> Self {
        Self {
            motion_on: true,
            ..Default::default()
        }
    }

    fn steer(&mut self, state: &GameState) {
        if !self.motion_on {
            self.tilt = None;
            return;
        }
        let ship = state.registry.first_alive(Category::Ship);
        let target = state
            .registry
            .alive(Category::Invader)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y).then(a.pos.x.total_cmp(&b.pos.x)));
        self.tilt = match (ship, target) {
            (Some(ship), Some(target)) => {
                Some(((target.pos.x - ship.pos.x) / STEER_RANGE).clamp(-1.0, 1.0))
            }
            _ => None,
        };
    }
}

impl Host for Pilot {
    fn tilt(&mut self) -> Option<f32> {
        self.tilt
    }

    fn stop_motion_updates(&mut self) {
        self.motion_on = false;
    }

    fn game_over(&mut self, final_score: u64) {
        self.final_score = Some(final_score);
    }
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {e}");
            return ExitCode::FAILURE;
        }
        None => 1,
    };

    let mut state = match GameState::try_new(tuning) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let mut rng = SeededRandom::new(seed);
    let mut pilot = Pilot::new();
    log::info!("Seed {seed}");

    for frame in 0..MAX_FRAMES {
        let now = frame as f64 * FRAME_DT;

        // Host-side input, queued between frames
        for (a, b) in detect_contacts(&state.registry) {
            state.record_contact(a, b, now);
        }
        state.record_tap(1);
        pilot.steer(&state);

        update(&mut state, now, &mut rng, &mut pilot);

        for event in state.take_events() {
            match event {
                GameEvent::ScoreChanged { .. } | GameEvent::HealthChanged { .. } => {
                    log::info!(
                        "[{now:7.2}s] {} | {}",
                        state.player.score_text(),
                        state.player.health_text()
                    );
                }
                GameEvent::AnimationSpeed { ratio } => {
                    log::debug!("[{now:7.2}s] invaders animate x{ratio:.2} faster");
                }
                GameEvent::GameOver { final_score } => {
                    log::info!("[{now:7.2}s] Game over with {final_score} points");
                }
                _ => {}
            }
        }

        if state.is_ending() {
            break;
        }
    }

    match pilot.final_score {
        Some(score) => {
            println!("{score}");
            ExitCode::SUCCESS
        }
        None => {
            log::warn!("Run did not finish within {MAX_FRAMES} frames");
            println!("{}", state.score());
            ExitCode::SUCCESS
        }
    }
}
