//! Game state and core simulation types
//!
//! Everything the frame pipeline mutates lives in [`GameState`].

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::Flight;
use super::contact::ContactQueue;
use super::entity::{Category, EntityId};
use super::formation::{FormationState, spawn_formation};
use super::registry::Registry;
use super::ship::spawn_ship;
use crate::tuning::{Tuning, TuningError};

/// Sound cues for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ship fired
    ShipBullet,
    /// Invader fired
    InvaderBullet,
    /// Invader bullet struck the ship
    ShipHit,
    /// Ship bullet destroyed an invader
    InvaderHit,
}

/// Notifications for rendering, audio and HUD, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned {
        id: EntityId,
        category: Category,
        pos: Vec2,
    },
    Removed {
        id: EntityId,
    },
    Sound(SoundEffect),
    ScoreChanged {
        score: u64,
    },
    /// Raw health; the ship's alpha is the clamped fraction
    HealthChanged {
        health: f32,
    },
    /// Invader animations should run `ratio` times faster than before
    AnimationSpeed {
        ratio: f32,
    },
    GameOver {
        final_score: u64,
    },
}

/// Score, health and the one-shot ending flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub score: u64,
    /// Starts at 1.0; may go negative, which is what kills the ship
    pub ship_health: f32,
    /// Set once when the run ends, never cleared
    pub ending: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            score: 0,
            ship_health: 1.0,
            ending: false,
        }
    }
}

impl PlayerState {
    pub fn adjust_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn adjust_health(&mut self, delta: f32) {
        self.ship_health += delta;
    }

    /// Health clamped to [0, 1] for display
    pub fn health_fraction(&self) -> f32 {
        self.ship_health.clamp(0.0, 1.0)
    }

    pub fn score_text(&self) -> String {
        format!("Score: {:04}", self.score)
    }

    pub fn health_text(&self) -> String {
        format!("Health: {:.1}%", self.health_fraction() * 100.0)
    }
}

/// A queued request to fire the ship's gun
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireIntent {
    /// Arrival order, for logging
    pub seq: u64,
}

/// FIFO of pending fire intents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TapQueue {
    pending: VecDeque<FireIntent>,
    next_seq: u64,
}

impl TapQueue {
    /// Queue a tap. Only single taps become fire intents.
    pub fn record(&mut self, tap_count: u32) -> bool {
        if tap_count != 1 {
            return false;
        }
        let intent = FireIntent { seq: self.next_seq };
        self.next_seq += 1;
        self.pending.push_back(intent);
        true
    }

    pub fn pop(&mut self) -> Option<FireIntent> {
        self.pending.pop_front()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub registry: Registry,
    pub formation: FormationState,
    pub player: PlayerState,
    pub contacts: ContactQueue,
    pub taps: TapQueue,
    /// Bullets in flight (sorted by bullet id)
    pub flights: Vec<Flight>,
    /// Time of the previous `update`, for ship integration
    pub last_frame_time: Option<f64>,
    /// Pending notifications for collaborators
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameState {
    /// Validate `tuning`, then set up a fresh run
    pub fn try_new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::new(tuning))
    }

    /// Lay out the formation and the ship for a fresh run.
    ///
    /// `tuning` is used as given; callers holding unchecked values should go
    /// through [`GameState::try_new`] or [`Tuning::validate`] first.
    pub fn new(tuning: Tuning) -> Self {
        let formation = FormationState::new(tuning.initial_time_per_move);
        let mut state = Self {
            tuning,
            registry: Registry::new(),
            formation,
            player: PlayerState::default(),
            contacts: ContactQueue::default(),
            taps: TapQueue::default(),
            flights: Vec::new(),
            last_frame_time: None,
            events: Vec::new(),
        };

        spawn_formation(&mut state);
        spawn_ship(&mut state);

        log::info!(
            "New game: {} invaders, {} s per move",
            state.registry.count_alive(Category::Invader),
            state.formation.time_per_move()
        );
        state
    }

    /// Spawn an entity and announce it to the rendering layer
    pub fn spawn(&mut self, category: Category, pos: Vec2, size: Vec2) -> EntityId {
        let id = self.registry.spawn(category, pos, size);
        self.events.push(GameEvent::Spawned { id, category, pos });
        id
    }

    /// Destroy an entity and announce its removal. No-op for dead ids.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        let removed = self.registry.destroy(id);
        if removed {
            self.events.push(GameEvent::Removed { id });
        }
        removed
    }

    pub fn ship_id(&self) -> Option<EntityId> {
        self.registry.first_alive(Category::Ship).map(|e| e.id)
    }

    pub fn invader_count(&self) -> usize {
        self.registry.count_alive(Category::Invader)
    }

    /// Report a raw collision between two entities (outside the frame).
    /// Ignored once the run has ended.
    pub fn record_contact(&mut self, a: EntityId, b: EntityId, time: f64) -> bool {
        if self.player.ending {
            return false;
        }
        self.contacts.record(a, b, time);
        true
    }

    /// Report a finished touch (outside the frame). Returns whether it was
    /// queued as a fire intent.
    pub fn record_tap(&mut self, tap_count: u32) -> bool {
        !self.player.ending && self.taps.record(tap_count)
    }

    pub fn score(&self) -> u64 {
        self.player.score
    }

    pub fn ship_health_fraction(&self) -> f32 {
        self.player.health_fraction()
    }

    pub fn is_ending(&self) -> bool {
        self.player.ending
    }

    /// Hand pending notifications to the host
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_layout() {
        let state = GameState::default();
        assert_eq!(state.invader_count(), 36);
        assert!(state.ship_id().is_some());
        assert_eq!(state.score(), 0);
        assert_eq!(state.player.ship_health, 1.0);
        assert!(!state.is_ending());
        // 36 invaders + ship announced
        assert_eq!(state.events.len(), 37);
    }

    #[test]
    fn test_try_new_validates_tuning() {
        let bad = Tuning {
            invader_step: -10.0,
            ..Default::default()
        };
        assert!(matches!(
            GameState::try_new(bad),
            Err(TuningError::Invalid {
                field: "invader_step",
                ..
            })
        ));

        let state = GameState::try_new(Tuning::default()).unwrap();
        assert_eq!(state.invader_count(), 36);
    }

    #[test]
    fn test_tap_queue_filters_multi_taps() {
        let mut taps = TapQueue::default();
        assert!(taps.record(1));
        assert!(!taps.record(2));
        assert!(taps.record(1));
        assert_eq!(taps.len(), 2);
        assert_eq!(taps.pop(), Some(FireIntent { seq: 0 }));
        assert_eq!(taps.pop(), Some(FireIntent { seq: 1 }));
        assert!(taps.is_empty());
    }

    #[test]
    fn test_hud_text() {
        let mut player = PlayerState::default();
        assert_eq!(player.score_text(), "Score: 0000");
        assert_eq!(player.health_text(), "Health: 100.0%");

        player.adjust_score(100);
        player.adjust_health(-0.334);
        assert_eq!(player.score_text(), "Score: 0100");
        assert_eq!(player.health_text(), "Health: 66.6%");

        player.adjust_health(-0.334 * 2.0);
        assert!(player.ship_health < 0.0);
        assert_eq!(player.health_fraction(), 0.0);
        assert_eq!(player.health_text(), "Health: 0.0%");
    }

    #[test]
    fn test_destroy_emits_once() {
        let mut state = GameState::default();
        state.take_events();
        let ship = state.ship_id().unwrap();
        assert!(state.destroy(ship));
        assert!(!state.destroy(ship));
        assert_eq!(state.take_events(), vec![GameEvent::Removed { id: ship }]);
    }
}
