//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied time only
//! - Injected randomness only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod bullet;
pub mod collision;
pub mod contact;
pub mod entity;
pub mod formation;
pub mod random;
pub mod registry;
pub mod ship;
pub mod state;
pub mod tick;

pub use bullet::{FireOutcome, Flight, fire, fire_invader_bullet, fire_ship_bullet};
pub use collision::{ContactOutcome, detect_contacts, drain_and_resolve, resolve_contact};
pub use contact::{ContactEvent, ContactQueue};
pub use entity::{Category, Entity, EntityId, InvaderKind};
pub use formation::{Direction, FormationState, adjust_time_per_move, advance};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use registry::Registry;
pub use state::{GameEvent, GameState, PlayerState, SoundEffect, TapQueue};
pub use tick::{Host, end_game, is_game_over, update};
