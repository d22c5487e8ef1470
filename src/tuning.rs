//! Data-driven game balance
//!
//! Every gameplay constant lives here so a host can load a JSON override.
//! Missing fields fall back to [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("cannot read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scene extent in world units (origin bottom-left, y up)
    pub scene_size: Vec2,

    // === Formation ===
    pub invader_rows: u32,
    pub invader_cols: u32,
    pub invader_size: Vec2,
    pub invader_spacing_x: f32,
    pub invader_base_y: f32,
    pub invader_step: f32,
    pub edge_epsilon: f32,
    pub initial_time_per_move: f64,
    pub speed_up_factor: f64,
    pub min_invader_bottom: f32,

    // === Ship ===
    pub ship_size: Vec2,
    pub ship_mass: f32,
    pub ship_damping: f32,
    pub ship_hit_damage: f32,

    // === Bullets ===
    pub bullet_size: Vec2,
    pub ship_bullet_duration: f64,
    pub invader_bullet_duration: f64,
    pub bullet_grace: f64,

    // === Scoring / input ===
    pub invader_points: u64,
    pub tilt_deadzone: f32,
    pub tilt_force: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scene_size: Vec2::new(SCENE_WIDTH, SCENE_HEIGHT),

            invader_rows: INVADER_ROWS,
            invader_cols: INVADER_COLS,
            invader_size: Vec2::new(INVADER_WIDTH, INVADER_HEIGHT),
            invader_spacing_x: INVADER_SPACING_X,
            invader_base_y: INVADER_BASE_Y,
            invader_step: INVADER_STEP,
            edge_epsilon: EDGE_EPSILON,
            initial_time_per_move: INITIAL_TIME_PER_MOVE,
            speed_up_factor: SPEED_UP_FACTOR,
            min_invader_bottom: MIN_INVADER_BOTTOM,

            ship_size: Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            ship_mass: SHIP_MASS,
            ship_damping: SHIP_DAMPING,
            ship_hit_damage: SHIP_HIT_DAMAGE,

            bullet_size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            ship_bullet_duration: SHIP_BULLET_DURATION,
            invader_bullet_duration: INVADER_BULLET_DURATION,
            bullet_grace: BULLET_GRACE,

            invader_points: INVADER_POINTS,
            tilt_deadzone: TILT_DEADZONE,
            tilt_force: TILT_FORCE,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document (partial documents are allowed)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!(
            "Loaded tuning from {}: {}x{} grid, {} s per move",
            path.display(),
            tuning.invader_rows,
            tuning.invader_cols,
            tuning.initial_time_per_move
        );
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.scene_size.x <= 0.0 || self.scene_size.y <= 0.0 {
            return invalid("scene_size", "must be positive");
        }
        if self.invader_rows == 0 || self.invader_cols == 0 {
            return invalid("invader_rows/invader_cols", "formation must not be empty");
        }
        if !(self.invader_step > 0.0) {
            return invalid("invader_step", "must be positive");
        }
        if !(self.edge_epsilon >= 0.0) {
            return invalid("edge_epsilon", "must not be negative");
        }
        if self.initial_time_per_move <= 0.0 {
            return invalid("initial_time_per_move", "must be positive");
        }
        if !(self.speed_up_factor > 0.0 && self.speed_up_factor <= 1.0) {
            return invalid("speed_up_factor", "must be in (0, 1]");
        }
        if self.ship_bullet_duration <= 0.0 || self.invader_bullet_duration <= 0.0 {
            return invalid("bullet duration", "must be positive");
        }
        if self.bullet_grace < 0.0 {
            return invalid("bullet_grace", "must not be negative");
        }
        if self.ship_mass <= 0.0 {
            return invalid("ship_mass", "must be positive");
        }
        if self.ship_hit_damage <= 0.0 {
            return invalid("ship_hit_damage", "must be positive");
        }
        if !(0.0..1.0).contains(&self.tilt_deadzone) {
            return invalid("tilt_deadzone", "must be in [0, 1)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "invader_rows": 2, "tilt_force": 55.0 }"#).unwrap();
        assert_eq!(tuning.invader_rows, 2);
        assert_eq!(tuning.tilt_force, 55.0);
        assert_eq!(tuning.invader_cols, INVADER_COLS);
        assert_eq!(tuning.scene_size, Vec2::new(SCENE_WIDTH, SCENE_HEIGHT));
    }

    #[test]
    fn test_rejects_non_positive_move_interval() {
        let err = Tuning::from_json(r#"{ "initial_time_per_move": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "initial_time_per_move",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_geometry_and_deadzone() {
        for (json, field) in [
            (r#"{ "invader_step": -10.0 }"#, "invader_step"),
            (r#"{ "invader_step": 0.0 }"#, "invader_step"),
            (r#"{ "edge_epsilon": -1.0 }"#, "edge_epsilon"),
            (r#"{ "tilt_deadzone": -0.2 }"#, "tilt_deadzone"),
            (r#"{ "tilt_deadzone": 1.5 }"#, "tilt_deadzone"),
        ] {
            match Tuning::from_json(json) {
                Err(TuningError::Invalid { field: got, .. }) => assert_eq!(got, field),
                other => panic!("{json} gave {other:?}"),
            }
        }
        assert!(Tuning::from_json(r#"{ "edge_epsilon": 0.0, "tilt_deadzone": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Tuning::load("/nonexistent/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }

    #[test]
    fn test_saved_overrides_reload() {
        let tuning = Tuning {
            speed_up_factor: 0.5,
            invader_rows: 3,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        let loaded = Tuning::from_json(&json).unwrap();
        assert_eq!(loaded.speed_up_factor, 0.5);
        assert_eq!(loaded.invader_rows, 3);
    }
}
