//! Spatial entities: ship, invaders and bullets
//!
//! Positions are entity centers in scene space (origin bottom-left, y up).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable entity identity (monotonic, never reused within a run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What an entity is, which decides how contacts involving it resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Ship,
    Invader,
    ShipBullet,
    InvaderBullet,
}

impl Category {
    pub fn is_bullet(self) -> bool {
        matches!(self, Category::ShipBullet | Category::InvaderBullet)
    }
}

/// Invader skin, chosen per formation row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvaderKind {
    A,
    B,
    C,
}

impl InvaderKind {
    /// Row numbers are 1-based, bottom row first
    pub fn for_row(row: u32) -> Self {
        match row % 3 {
            0 => InvaderKind::A,
            1 => InvaderKind::B,
            _ => InvaderKind::C,
        }
    }
}

/// A live (or freshly destroyed) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub category: Category,
    /// Center position
    pub pos: Vec2,
    /// Axis-aligned bounding size
    pub size: Vec2,
    /// Velocity (only the ship is physics-driven)
    #[serde(default)]
    pub vel: Vec2,
    /// Cleared on destruction; dead entities are swept at frame end
    pub alive: bool,
    /// Opacity for the rendering layer (ship dims with damage)
    pub alpha: f32,
    /// Animation rate multiplier (invaders speed up with the formation)
    pub anim_speed: f32,
    /// Texture family for invaders
    #[serde(default)]
    pub invader_kind: Option<InvaderKind>,
}

impl Entity {
    pub fn new(id: EntityId, category: Category, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            category,
            pos,
            size,
            vel: Vec2::ZERO,
            alive: true,
            alpha: 1.0,
            anim_speed: 1.0,
            invader_kind: None,
        }
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.pos.x - self.size.x / 2.0
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }

    /// Strict AABB overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }
}
