//! Tilt Invaders - fixed-formation shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, bullets, contacts, game over)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Scene dimensions (portrait phone)
    pub const SCENE_WIDTH: f32 = 320.0;
    pub const SCENE_HEIGHT: f32 = 568.0;

    /// Invader grid
    pub const INVADER_ROWS: u32 = 6;
    pub const INVADER_COLS: u32 = 6;
    pub const INVADER_WIDTH: f32 = 24.0;
    pub const INVADER_HEIGHT: f32 = 16.0;
    pub const INVADER_SPACING_X: f32 = 12.0;
    /// Grid origin y; rows stack upward from here
    pub const INVADER_BASE_Y: f32 = 180.0;

    /// Formation movement
    pub const INVADER_STEP: f32 = 10.0;
    pub const EDGE_EPSILON: f32 = 1.0;
    pub const INITIAL_TIME_PER_MOVE: f64 = 1.0;
    /// Multiplier applied to time-per-move on each row wrap
    pub const SPEED_UP_FACTOR: f64 = 0.8;

    /// Lowest an invader's bottom edge may sink before the run ends
    pub const MIN_INVADER_BOTTOM: f32 = 32.0;

    /// Ship
    pub const SHIP_WIDTH: f32 = 30.0;
    pub const SHIP_HEIGHT: f32 = 16.0;
    pub const SHIP_MASS: f32 = 0.02;
    /// Linear damping per second
    pub const SHIP_DAMPING: f32 = 0.1;
    /// Three hits kill
    pub const SHIP_HIT_DAMAGE: f32 = 0.334;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 8.0;
    pub const SHIP_BULLET_DURATION: f64 = 1.0;
    pub const INVADER_BULLET_DURATION: f64 = 2.0;
    /// Lingers 3 frames after arrival so a last contact can still land
    pub const BULLET_GRACE: f64 = 3.0 / 60.0;

    pub const INVADER_POINTS: u64 = 100;

    /// Accelerometer
    pub const TILT_DEADZONE: f32 = 0.2;
    pub const TILT_FORCE: f32 = 40.0;

    /// Largest frame delta fed into ship integration
    pub const MAX_FRAME_DT: f64 = 0.1;
}
