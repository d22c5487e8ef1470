//! Per-frame update
//!
//! Core game loop that advances the simulation one rendered frame.

use super::bullet::{advance_flights, fire_invader_bullet, process_taps};
use super::collision::drain_and_resolve;
use super::entity::Category;
use super::formation::{Direction, advance};
use super::random::RandomSource;
use super::ship::{apply_tilt, integrate_ship};
use super::state::{GameEvent, GameState};
use crate::consts::MAX_FRAME_DT;

/// The platform side of the simulation
pub trait Host {
    /// Latest signed accelerometer x reading, if one is available
    fn tilt(&mut self) -> Option<f32>;

    /// Stop producing accelerometer samples
    fn stop_motion_updates(&mut self) {}

    /// Show the end-of-game screen. Called exactly once per run.
    fn game_over(&mut self, final_score: u64);
}

/// Advance the game by one frame at absolute time `now` (seconds)
pub fn update(state: &mut GameState, now: f64, rng: &mut dyn RandomSource, host: &mut dyn Host) {
    if state.player.ending {
        return;
    }

    let dt = state
        .last_frame_time
        .map_or(0.0, |last| (now - last).clamp(0.0, MAX_FRAME_DT)) as f32;
    state.last_frame_time = Some(now);

    if is_game_over(state) {
        end_game(state, host);
        return;
    }

    drain_and_resolve(state);

    process_taps(state, now);

    if let Some(tilt) = host.tilt() {
        apply_tilt(state, tilt, dt);
    }
    integrate_ship(state, dt);

    advance(state, now);

    fire_invader_bullet(state, rng, now);

    advance_flights(state, now);
    state.registry.sweep();
}

/// True once the formation is gone, an invader sank too low, or the ship
/// was destroyed
pub fn is_game_over(state: &GameState) -> bool {
    let floor = state.tuning.min_invader_bottom;
    let registry = &state.registry;

    !registry.any_alive(Category::Invader)
        || registry.alive(Category::Invader).any(|e| e.min_y() <= floor)
        || !registry.any_alive(Category::Ship)
}

/// End the run. Only the first call has any effect; returns whether this
/// call was it.
pub fn end_game(state: &mut GameState, host: &mut dyn Host) -> bool {
    if state.player.ending {
        return false;
    }

    state.player.ending = true;
    state.formation.direction = Direction::Idle;
    state.contacts.clear();
    state.taps.clear();
    host.stop_motion_updates();

    let final_score = state.player.score;
    state.events.push(GameEvent::GameOver { final_score });
    host.game_over(final_score);
    log::info!("Game over, final score {final_score}");
    true
}
