//! Projectiles fired by soldiers.

use glam::Vec2;
use gloom::Rect;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A straight-flying shot.
///
/// A projectile applies its damage at most once: the first enemy that
/// consumes it takes the hit, later overlaps in the same frame see it spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    id: EntityId,
    owner: EntityId,
    /// Centre of the projectile
    pub position: Vec2,
    /// Displacement per frame
    pub velocity: Vec2,
    /// Damage dealt on hit
    pub damage: f32,
    /// Collision radius
    pub radius: f32,
    consumed: bool,
}

impl Projectile {
    /// Launch a projectile from `origin` along `direction`.
    ///
    /// The direction is normalized; a zero direction gives a projectile that
    /// never moves.
    #[must_use]
    pub fn new(
        id: EntityId,
        owner: EntityId,
        origin: Vec2,
        direction: Vec2,
        speed: f32,
        damage: f32,
        radius: f32,
    ) -> Self {
        Self {
            id,
            owner,
            position: origin,
            velocity: direction.normalize_or_zero() * speed,
            damage,
            radius,
            consumed: false,
        }
    }

    /// Get the projectile's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Soldier credited with kills.
    #[must_use]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Unit direction of travel.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        self.velocity.normalize_or_zero()
    }

    /// Move one frame along the velocity.
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }

    /// Square around the projectile's circle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.position, self.radius)
    }

    /// Mark the projectile spent. Returns `false` if it already was.
    pub fn consume(&mut self) -> bool {
        !std::mem::replace(&mut self.consumed, true)
    }

    /// Check if the projectile has hit something.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}
