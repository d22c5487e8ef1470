//! Contact queue
//!
//! Collision notifications arrive between frames and are buffered here until
//! the next `update` drains them in arrival order.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// An unordered pair of touching entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub a: EntityId,
    pub b: EntityId,
    /// When the contact was reported
    pub time: f64,
}

impl ContactEvent {
    /// True if both events name the same pair, in either order
    pub fn same_pair(&self, other: &ContactEvent) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactQueue {
    pending: Vec<ContactEvent>,
}

impl ContactQueue {
    /// Append unconditionally; duplicates are resolved as no-ops later
    pub fn record(&mut self, a: EntityId, b: EntityId, time: f64) {
        self.pending.push(ContactEvent { a, b, time });
    }

    /// Take every queued event, leaving the queue empty
    pub fn take(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.pending)
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
