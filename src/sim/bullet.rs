//! Bullet lifecycle
//!
//! Each side may have one bullet in flight. A bullet travels in a straight
//! line to its destination, lingers briefly so a last-moment contact still
//! registers, then disappears.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Category, EntityId};
use super::random::RandomSource;
use super::state::{GameEvent, GameState, SoundEffect};

/// A scheduled straight-line trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub bullet: EntityId,
    pub origin: Vec2,
    pub destination: Vec2,
    pub start: f64,
    pub duration: f64,
    /// Arrival plus grace
    pub remove_at: f64,
}

impl Flight {
    /// Interpolated position, clamped to the segment
    pub fn position_at(&self, now: f64) -> Vec2 {
        let t = if self.duration > 0.0 {
            ((now - self.start) / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.origin.lerp(self.destination, t as f32)
    }

    pub fn expired(&self, now: f64) -> bool {
        now >= self.remove_at
    }
}

/// Result of a fire attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired(EntityId),
    /// A bullet of this side is already in flight
    InFlight,
    /// Nobody to fire from (ship gone or formation empty)
    NoShooter,
    /// Category is not a bullet
    NotABullet,
}

impl FireOutcome {
    pub fn fired(self) -> Option<EntityId> {
        match self {
            FireOutcome::Fired(id) => Some(id),
            _ => None,
        }
    }
}

/// Launch a bullet unless one of the same category is already alive
pub fn fire(
    state: &mut GameState,
    category: Category,
    origin: Vec2,
    destination: Vec2,
    duration: f64,
    now: f64,
) -> FireOutcome {
    if !category.is_bullet() {
        return FireOutcome::NotABullet;
    }
    if state.registry.any_alive(category) {
        return FireOutcome::InFlight;
    }

    let id = state.spawn(category, origin, state.tuning.bullet_size);
    let duration = duration.max(0.0);
    state.flights.push(Flight {
        bullet: id,
        origin,
        destination,
        start: now,
        duration,
        remove_at: now + duration + state.tuning.bullet_grace,
    });

    let sound = match category {
        Category::ShipBullet => SoundEffect::ShipBullet,
        _ => SoundEffect::InvaderBullet,
    };
    state.events.push(GameEvent::Sound(sound));
    FireOutcome::Fired(id)
}

/// Fire from the ship's nose straight up past the top of the scene
pub fn fire_ship_bullet(state: &mut GameState, now: f64) -> FireOutcome {
    let Some(ship) = state.registry.first_alive(Category::Ship) else {
        return FireOutcome::NoShooter;
    };
    let bullet = state.tuning.bullet_size;
    let origin = Vec2::new(ship.pos.x, ship.pos.y + ship.size.y - bullet.y / 2.0);
    let destination = Vec2::new(ship.pos.x, state.tuning.scene_size.y + bullet.y / 2.0);
    let duration = state.tuning.ship_bullet_duration;

    fire(state, Category::ShipBullet, origin, destination, duration, now)
}

/// If no invader bullet is in flight, a random invader fires straight down
pub fn fire_invader_bullet(state: &mut GameState, rng: &mut dyn RandomSource, now: f64) -> FireOutcome {
    if state.registry.any_alive(Category::InvaderBullet) {
        return FireOutcome::InFlight;
    }

    let count = state.registry.count_alive(Category::Invader);
    if count == 0 {
        return FireOutcome::NoShooter;
    }
    let pick = rng.pick_index(count).min(count - 1);
    let Some(invader) = state.registry.alive(Category::Invader).nth(pick) else {
        return FireOutcome::NoShooter;
    };

    let bullet = state.tuning.bullet_size;
    let origin = Vec2::new(
        invader.pos.x,
        invader.pos.y - invader.size.y / 2.0 + bullet.y / 2.0,
    );
    let destination = Vec2::new(invader.pos.x, -(bullet.y / 2.0));
    let duration = state.tuning.invader_bullet_duration;

    fire(state, Category::InvaderBullet, origin, destination, duration, now)
}

/// Turn queued taps into ship bullets, oldest first. Taps that hit the fire
/// gate are dropped. Returns how many bullets were fired.
pub fn process_taps(state: &mut GameState, now: f64) -> usize {
    let mut fired = 0;
    while let Some(intent) = state.taps.pop() {
        match fire_ship_bullet(state, now) {
            FireOutcome::Fired(id) => {
                log::trace!("Tap {} fired bullet {}", intent.seq, id.0);
                fired += 1;
            }
            outcome => log::trace!("Tap {} dropped: {outcome:?}", intent.seq),
        }
    }
    fired
}

/// Move bullets along their flights and remove the ones past their grace
pub fn advance_flights(state: &mut GameState, now: f64) {
    let mut expired = Vec::new();
    let GameState {
        registry, flights, ..
    } = &mut *state;

    // Bullets destroyed by contacts take their flight with them
    flights.retain(|flight| registry.is_alive(flight.bullet));

    for flight in flights.iter() {
        if flight.expired(now) {
            expired.push(flight.bullet);
        } else if let Some(bullet) = registry.get_mut(flight.bullet) {
            bullet.pos = flight.position_at(now);
        }
    }
    flights.retain(|flight| !flight.expired(now));

    for id in expired {
        state.destroy(id);
    }
}
