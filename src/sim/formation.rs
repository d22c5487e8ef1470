//! Invader formation controller
//!
//! The formation marches sideways one step per move tick. When any invader
//! touches a side wall it drops one step, reverses, and the move interval
//! shrinks so the whole grid speeds up.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Category, InvaderKind};
use super::state::{GameEvent, GameState};
use crate::consts::INITIAL_TIME_PER_MOVE;

/// Formation movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    /// Dropping one row, then heading right
    DownThenRight,
    /// Dropping one row, then heading left
    DownThenLeft,
    /// Formation empty or run over
    Idle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FormationStateRaw")]
pub struct FormationState {
    pub direction: Direction,
    pub time_of_last_move: f64,
    /// Always > 0
    time_per_move: f64,
}

/// Unchecked wire form of [`FormationState`]
#[derive(Deserialize)]
struct FormationStateRaw {
    direction: Direction,
    time_of_last_move: f64,
    time_per_move: f64,
}

impl TryFrom<FormationStateRaw> for FormationState {
    type Error = &'static str;

    fn try_from(raw: FormationStateRaw) -> Result<Self, Self::Error> {
        if !(raw.time_per_move > 0.0) || !raw.time_per_move.is_finite() {
            return Err("time_per_move must be a positive number");
        }
        Ok(Self {
            direction: raw.direction,
            time_of_last_move: raw.time_of_last_move,
            time_per_move: raw.time_per_move,
        })
    }
}

impl FormationState {
    pub fn new(time_per_move: f64) -> Self {
        Self {
            direction: Direction::Right,
            time_of_last_move: 0.0,
            time_per_move: if time_per_move > 0.0 {
                time_per_move
            } else {
                INITIAL_TIME_PER_MOVE
            },
        }
    }

    pub fn time_per_move(&self) -> f64 {
        self.time_per_move
    }

    /// Replace the move interval. Returns `old / new`, or None (state kept)
    /// when `new` is not a positive number.
    pub fn set_time_per_move(&mut self, new: f64) -> Option<f64> {
        if !(new > 0.0) || !new.is_finite() {
            return None;
        }
        let ratio = self.time_per_move / new;
        self.time_per_move = new;
        Some(ratio)
    }

    /// Whether a move tick is due at `now`
    pub fn is_due(&self, now: f64) -> bool {
        now - self.time_of_last_move >= self.time_per_move
    }
}

/// Lay out the invader grid, bottom row first
pub fn spawn_formation(state: &mut GameState) {
    let size = state.tuning.invader_size;
    let base = Vec2::new(state.tuning.scene_size.x / 3.0, state.tuning.invader_base_y);
    let col_stride = size.x + state.tuning.invader_spacing_x;
    let rows = state.tuning.invader_rows;
    let cols = state.tuning.invader_cols;

    for row in 1..=rows {
        let kind = InvaderKind::for_row(row);
        let y = row as f32 * (size.y * 2.0) + base.y;
        for col in 0..cols {
            let pos = Vec2::new(base.x + col as f32 * col_stride, y);
            let id = state.spawn(Category::Invader, pos, size);
            if let Some(invader) = state.registry.get_mut(id) {
                invader.invader_kind = Some(kind);
            }
        }
    }
}

/// Change the move interval and rescale invader animation to match.
/// Non-positive values are rejected and nothing changes.
pub fn adjust_time_per_move(state: &mut GameState, new_time_per_move: f64) -> bool {
    let Some(ratio) = state.formation.set_time_per_move(new_time_per_move) else {
        log::trace!("Ignoring move interval {new_time_per_move}");
        return false;
    };

    let ratio = ratio as f32;
    for invader in state.registry.alive_mut(Category::Invader) {
        invader.anim_speed *= ratio;
    }
    state.events.push(GameEvent::AnimationSpeed { ratio });
    log::debug!("Formation speed-up: {new_time_per_move:.3} s per move");
    true
}

/// Re-evaluate the direction from current invader extents.
///
/// A wall hit speeds the formation up; only the first offender in id order
/// counts.
pub fn determine_direction(state: &mut GameState) -> Direction {
    let width = state.tuning.scene_size.x;
    let eps = state.tuning.edge_epsilon;
    let current = state.formation.direction;

    let wrapped = match current {
        Direction::Right => state
            .registry
            .alive(Category::Invader)
            .find(|e| e.max_x() >= width - eps)
            .map(|_| Direction::DownThenLeft),
        Direction::Left => state
            .registry
            .alive(Category::Invader)
            .find(|e| e.min_x() <= eps)
            .map(|_| Direction::DownThenRight),
        _ => None,
    };

    let next = match (current, wrapped) {
        (_, Some(down)) => {
            let faster = state.formation.time_per_move() * state.tuning.speed_up_factor;
            adjust_time_per_move(state, faster);
            down
        }
        (Direction::DownThenLeft, None) => Direction::Left,
        (Direction::DownThenRight, None) => Direction::Right,
        (other, None) => other,
    };

    state.formation.direction = next;
    next
}

/// Step the formation if a move tick is due. Returns true when a tick fired.
pub fn advance(state: &mut GameState, now: f64) -> bool {
    if state.formation.direction == Direction::Idle || !state.formation.is_due(now) {
        return false;
    }

    if !state.registry.any_alive(Category::Invader) {
        state.formation.direction = Direction::Idle;
        return false;
    }

    let step = state.tuning.invader_step;
    let delta = match determine_direction(state) {
        Direction::Right => Vec2::new(step, 0.0),
        Direction::Left => Vec2::new(-step, 0.0),
        Direction::DownThenLeft | Direction::DownThenRight => Vec2::new(0.0, -step),
        Direction::Idle => Vec2::ZERO,
    };

    for invader in state.registry.alive_mut(Category::Invader) {
        invader.pos += delta;
    }
    state.formation.time_of_last_move = now;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(state: &GameState) -> Vec<Vec2> {
        state.registry.alive(Category::Invader).map(|e| e.pos).collect()
    }

    /// Slide the grid sideways so its right edge sits exactly on the wall
    fn push_to_right_wall(state: &mut GameState) {
        let width = state.tuning.scene_size.x;
        let max_x = state
            .registry
            .alive(Category::Invader)
            .map(|e| e.max_x())
            .fold(f32::MIN, f32::max);
        let dx = width - max_x;
        for invader in state.registry.alive_mut(Category::Invader) {
            invader.pos.x += dx;
        }
    }

    fn push_to_left_wall(state: &mut GameState) {
        let min_x = state
            .registry
            .alive(Category::Invader)
            .map(|e| e.min_x())
            .fold(f32::MAX, f32::min);
        for invader in state.registry.alive_mut(Category::Invader) {
            invader.pos.x -= min_x;
        }
    }

    #[test]
    fn test_layout() {
        let state = GameState::default();
        let invaders: Vec<_> = state.registry.alive(Category::Invader).collect();
        assert_eq!(invaders.len(), 36);

        let first = invaders[0];
        assert!((first.pos.x - 320.0 / 3.0).abs() < 1e-3);
        assert_eq!(first.pos.y, 212.0);
        assert_eq!(first.invader_kind, Some(InvaderKind::B));

        let last = invaders[35];
        assert!((last.pos.x - (320.0 / 3.0 + 5.0 * 36.0)).abs() < 1e-3);
        assert_eq!(last.pos.y, 372.0);
        assert_eq!(last.invader_kind, Some(InvaderKind::A));
    }

    #[test]
    fn test_no_move_before_tick() {
        let mut state = GameState::default();
        let before = positions(&state);
        assert!(!advance(&mut state, 0.5));
        assert_eq!(positions(&state), before);
        assert_eq!(state.formation.time_of_last_move, 0.0);
    }

    #[test]
    fn test_moves_right_on_tick() {
        let mut state = GameState::default();
        let before = positions(&state);
        assert!(advance(&mut state, 1.0));
        assert_eq!(state.formation.direction, Direction::Right);
        assert_eq!(state.formation.time_of_last_move, 1.0);
        for (old, new) in before.iter().zip(positions(&state)) {
            assert_eq!(new, *old + Vec2::new(10.0, 0.0));
        }
    }

    #[test]
    fn test_right_wall_drops_then_turns_left() {
        let mut state = GameState::default();
        push_to_right_wall(&mut state);
        let before = positions(&state);

        assert!(advance(&mut state, 1.0));
        assert_eq!(state.formation.direction, Direction::DownThenLeft);
        assert!((state.formation.time_per_move() - 0.8).abs() < 1e-9);
        for (old, new) in before.iter().zip(positions(&state)) {
            assert_eq!(new, *old - Vec2::new(0.0, 10.0));
        }

        // Next tick is due 0.8 s after the last one
        assert!(!advance(&mut state, 1.7));
        assert!(advance(&mut state, 1.85));
        assert_eq!(state.formation.direction, Direction::Left);
        for (old, new) in before.iter().zip(positions(&state)) {
            assert_eq!(new, *old - Vec2::new(10.0, 10.0));
        }
    }

    #[test]
    fn test_left_wall_drops_then_turns_right() {
        let mut state = GameState::default();
        state.formation.direction = Direction::Left;
        push_to_left_wall(&mut state);

        advance(&mut state, 1.0);
        assert_eq!(state.formation.direction, Direction::DownThenRight);
        advance(&mut state, 2.0);
        assert_eq!(state.formation.direction, Direction::Right);
    }

    #[test]
    fn test_single_speed_up_per_wall_hit() {
        let mut state = GameState::default();
        // Every column touches the wall at once
        for invader in state.registry.alive_mut(Category::Invader) {
            invader.pos.x = 310.0;
        }
        state.take_events();
        advance(&mut state, 1.0);

        assert!((state.formation.time_per_move() - 0.8).abs() < 1e-9);
        let speed_ups = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::AnimationSpeed { .. }))
            .count();
        assert_eq!(speed_ups, 1);
        for invader in state.registry.alive(Category::Invader) {
            assert!((invader.anim_speed - 1.25).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        let mut state = GameState::default();
        assert!(!adjust_time_per_move(&mut state, 0.0));
        assert!(!adjust_time_per_move(&mut state, -1.0));
        assert!(!adjust_time_per_move(&mut state, f64::NAN));
        assert_eq!(state.formation.time_per_move(), 1.0);
        assert!(state.registry.alive(Category::Invader).all(|e| e.anim_speed == 1.0));
    }

    #[test]
    fn test_speed_ratio_scales_animation() {
        let mut state = GameState::default();
        assert!(adjust_time_per_move(&mut state, 0.25));
        assert_eq!(state.formation.time_per_move(), 0.25);
        assert!(state.registry.alive(Category::Invader).all(|e| e.anim_speed == 4.0));
        assert!(state.events.contains(&GameEvent::AnimationSpeed { ratio: 4.0 }));
    }

    #[test]
    fn test_loading_rejects_bad_interval() {
        for bad in ["0.0", "-1.0", "1e400"] {
            let json = format!(
                r#"{{"direction":"Right","time_of_last_move":0.0,"time_per_move":{bad}}}"#
            );
            assert!(serde_json::from_str::<FormationState>(&json).is_err(), "{bad}");
        }

        let saved = serde_json::to_string(&FormationState::new(0.64)).unwrap();
        let loaded: FormationState = serde_json::from_str(&saved).unwrap();
        assert_eq!(loaded.time_per_move(), 0.64);
        assert_eq!(loaded.direction, Direction::Right);
    }

    #[test]
    fn test_idle_never_moves() {
        let mut state = GameState::default();
        state.formation.direction = Direction::Idle;
        let before = positions(&state);
        assert!(!advance(&mut state, 5.0));
        assert_eq!(positions(&state), before);
    }

    #[test]
    fn test_empty_formation_goes_idle() {
        let mut state = GameState::default();
        let ids: Vec<_> = state.registry.alive(Category::Invader).map(|e| e.id).collect();
        for id in ids {
            state.destroy(id);
        }
        assert!(!advance(&mut state, 1.0));
        assert_eq!(state.formation.direction, Direction::Idle);
    }
}
