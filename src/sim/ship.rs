//! Player ship: placement and tilt-driven motion
//!
//! The ship is a small rigid body pushed sideways by accelerometer tilt and
//! stopped by the scene edges.

use glam::Vec2;

use super::entity::Category;
use super::state::GameState;

/// Place the ship at the bottom center of the scene
pub fn spawn_ship(state: &mut GameState) {
    let size = state.tuning.ship_size;
    let pos = Vec2::new(state.tuning.scene_size.x / 2.0, size.y / 2.0);
    state.spawn(Category::Ship, pos, size);
}

/// Apply a tilt sample for one frame. Samples inside the deadzone are
/// ignored. Returns true if a force was applied.
pub fn apply_tilt(state: &mut GameState, tilt: f32, dt: f32) -> bool {
    let tuning = &state.tuning;
    if !tilt.is_finite() || tilt.abs() <= tuning.tilt_deadzone {
        return false;
    }

    let accel = tuning.tilt_force * tilt / tuning.ship_mass;
    let Some(ship) = state.registry.alive_mut(Category::Ship).next() else {
        return false;
    };
    ship.vel.x += accel * dt;
    true
}

/// Integrate ship velocity and keep it inside the scene
pub fn integrate_ship(state: &mut GameState, dt: f32) {
    let width = state.tuning.scene_size.x;
    let damping = state.tuning.ship_damping;
    let Some(ship) = state.registry.alive_mut(Category::Ship).next() else {
        return;
    };

    ship.vel *= (1.0 - damping * dt).max(0.0);
    ship.pos += ship.vel * dt;

    let half = ship.size.x / 2.0;
    if ship.pos.x < half {
        ship.pos.x = half;
        ship.vel.x = ship.vel.x.max(0.0);
    } else if ship.pos.x > width - half {
        ship.pos.x = width - half;
        ship.vel.x = ship.vel.x.min(0.0);
    }
}
