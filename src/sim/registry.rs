//! Entity registry
//!
//! Flat storage kept in id order so iteration is deterministic. Destruction
//! only clears the `alive` flag; dead entries are swept once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Category, Entity, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RegistryRaw")]
pub struct Registry {
    entities: Vec<Entity>,
    next_id: u32,
}

/// Unchecked wire form of [`Registry`]
#[derive(Deserialize)]
struct RegistryRaw {
    entities: Vec<Entity>,
    next_id: u32,
}

impl From<RegistryRaw> for Registry {
    /// Restores id order, drops repeated ids and keeps `next_id` past every
    /// stored id
    fn from(raw: RegistryRaw) -> Self {
        let mut entities = raw.entities;
        entities.sort_by_key(|e| e.id);
        entities.dedup_by_key(|e| e.id);
        let next_id = entities
            .last()
            .map_or(raw.next_id, |e| raw.next_id.max(e.id.0 + 1))
            .max(1);
        Self { entities, next_id }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
            next_id: 1,
        }
    }

    /// Allocate an id and insert a new alive entity
    pub fn spawn(&mut self, category: Category, pos: Vec2, size: Vec2) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        // Ids only grow, so pushing keeps the vec sorted
        self.entities.push(Entity::new(id, category, pos, size));
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| &self.entities[idx])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.entities.binary_search_by_key(&id, |e| e.id) {
            Ok(idx) => Some(&mut self.entities[idx]),
            Err(_) => None,
        }
    }

    /// Unknown ids count as dead
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.alive)
    }

    /// Mark an entity destroyed. Returns false if it was already gone.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.alive => {
                entity.alive = false;
                true
            }
            _ => false,
        }
    }

    /// All alive entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.alive)
    }

    /// Alive entities of one category in id order
    pub fn alive(&self, category: Category) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.alive && e.category == category)
    }

    pub fn alive_mut(&mut self, category: Category) -> impl Iterator<Item = &mut Entity> {
        self.entities
            .iter_mut()
            .filter(move |e| e.alive && e.category == category)
    }

    pub fn first_alive(&self, category: Category) -> Option<&Entity> {
        self.alive(category).next()
    }

    pub fn count_alive(&self, category: Category) -> usize {
        self.alive(category).count()
    }

    pub fn any_alive(&self, category: Category) -> bool {
        self.first_alive(category).is_some()
    }

    /// Drop destroyed entries. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.alive);
        before - self.entities.len()
    }

    /// Total stored entries, dead ones included
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
