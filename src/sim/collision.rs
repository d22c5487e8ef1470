//! Contact resolution and overlap detection
//!
//! Resolution is idempotent per entity: once either side of a contact is
//! destroyed, every later contact naming it is skipped. That is what keeps
//! duplicate reports of one physical hit from counting twice.

use super::contact::ContactEvent;
use super::entity::{Category, EntityId};
use super::registry::Registry;
use super::state::{GameEvent, GameState, SoundEffect};

/// The interaction a category pair triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Invader bullet struck the ship
    ShipHit { ship: EntityId, bullet: EntityId },
    /// Ship bullet struck an invader
    InvaderKilled { invader: EntityId, bullet: EntityId },
    /// No defined interaction
    Ignored,
}

/// What resolving one contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// An entity was already gone (or never existed)
    Stale,
    ShipDamaged,
    ShipDestroyed,
    InvaderDestroyed,
    Ignored,
}

/// Classify an unordered pair by category
pub fn classify(a: (EntityId, Category), b: (EntityId, Category)) -> Interaction {
    use Category::*;

    match (a.1, b.1) {
        (Ship, InvaderBullet) => Interaction::ShipHit { ship: a.0, bullet: b.0 },
        (InvaderBullet, Ship) => Interaction::ShipHit { ship: b.0, bullet: a.0 },
        (Invader, ShipBullet) => Interaction::InvaderKilled { invader: a.0, bullet: b.0 },
        (ShipBullet, Invader) => Interaction::InvaderKilled { invader: b.0, bullet: a.0 },
        _ => Interaction::Ignored,
    }
}

/// Apply the outcome of a single contact
pub fn resolve_contact(state: &mut GameState, a: EntityId, b: EntityId) -> ContactOutcome {
    let (Some(ea), Some(eb)) = (state.registry.get(a), state.registry.get(b)) else {
        return ContactOutcome::Stale;
    };
    if !ea.alive || !eb.alive || a == b {
        return ContactOutcome::Stale;
    }

    match classify((a, ea.category), (b, eb.category)) {
        Interaction::ShipHit { ship, bullet } => {
            state.events.push(GameEvent::Sound(SoundEffect::ShipHit));
            state.player.adjust_health(-state.tuning.ship_hit_damage);
            let health = state.player.ship_health;
            state.events.push(GameEvent::HealthChanged { health });

            if health <= 0.0 {
                state.destroy(ship);
                state.destroy(bullet);
                log::info!("Ship destroyed (health {health:.3})");
                ContactOutcome::ShipDestroyed
            } else {
                state.destroy(bullet);
                let alpha = state.player.health_fraction();
                if let Some(entity) = state.registry.get_mut(ship) {
                    entity.alpha = alpha;
                }
                log::debug!("Ship hit, health {health:.3}");
                ContactOutcome::ShipDamaged
            }
        }
        Interaction::InvaderKilled { invader, bullet } => {
            state.events.push(GameEvent::Sound(SoundEffect::InvaderHit));
            state.destroy(invader);
            state.destroy(bullet);
            state.player.adjust_score(state.tuning.invader_points);
            state.events.push(GameEvent::ScoreChanged {
                score: state.player.score,
            });
            log::debug!("Invader {} destroyed, score {}", invader.0, state.player.score);
            ContactOutcome::InvaderDestroyed
        }
        Interaction::Ignored => ContactOutcome::Ignored,
    }
}

/// Resolve every queued contact in arrival order, then clear the queue.
/// Returns how many contacts had an effect.
pub fn drain_and_resolve(state: &mut GameState) -> usize {
    let pending = state.contacts.take();
    let mut resolved: Vec<&ContactEvent> = Vec::new();
    for contact in &pending {
        match resolve_contact(state, contact.a, contact.b) {
            ContactOutcome::Stale if resolved.iter().any(|r| r.same_pair(contact)) => {
                log::debug!("Duplicate contact {} / {} skipped", contact.a.0, contact.b.0);
            }
            ContactOutcome::Stale => {
                log::trace!("Skipping stale contact {} / {}", contact.a.0, contact.b.0);
            }
            ContactOutcome::Ignored => {}
            _ => resolved.push(contact),
        }
    }
    resolved.len()
}

/// Find overlapping pairs that have a defined interaction.
///
/// Stands in for a physics engine when the host has none. Pairs come out
/// once each, ordered by the lower id then the higher.
pub fn detect_contacts(registry: &Registry) -> Vec<(EntityId, EntityId)> {
    let candidates: Vec<_> = registry.iter().collect();
    let mut pairs = Vec::new();

    for (i, a) in candidates.iter().enumerate() {
        for b in &candidates[i + 1..] {
            let interacts = classify((a.id, a.category), (b.id, b.category)) != Interaction::Ignored;
            if interacts && a.overlaps(b) {
                pairs.push((a.id, b.id));
            }
        }
    }

    pairs
}
