//! Entity types for the arena simulation.
//!
//! - [`EntityId`]: Unique identifier for entities
//! - [`EntityTag`]: Kind carried as the spatial index payload
//! - [`Soldier`], [`Enemy`], [`Projectile`], [`Flare`], [`Grenade`]: the
//!   concrete entity families, one module each
//!
//! Entities never reference each other directly. Interactions go through the
//! spatial index, whose entries carry an `(EntityId, EntityTag)` pair that the
//! pipeline resolves back into the owning roster.
//!
//! # Example
//!
//! ```
//! use nightwatch_core::entity::{EntityId, EntityTag};
//!
//! let id = EntityId::new(42);
//! assert_eq!(id.as_u64(), 42);
//! assert_eq!(EntityTag::Enemy.to_string(), "Enemy");
//! ```

pub mod consumable;
pub mod enemy;
pub mod projectile;
pub mod soldier;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use consumable::{ConsumableKind, Flare, Grenade};
pub use enemy::{Enemy, EnemyFlags, EnemyKind};
pub use projectile::Projectile;
pub use soldier::{Soldier, SoldierState};

/// Unique identifier for an entity.
///
/// Ids are handed out by a monotonic counter and never reused within a
/// session, so ordering by id is ordering by creation.
///
/// ```
/// use nightwatch_core::entity::EntityId;
///
/// assert!(EntityId::new(1) < EntityId::new(2));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity kind, stored as the payload of every index entry.
///
/// Queries switch on the tag to decide which interaction rule applies and
/// which roster owns the entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Player-controlled defender
    Soldier,
    /// Hostile walker of any kind
    Enemy,
    /// In-flight shot
    Projectile,
    /// Decaying light that reveals and repels enemies
    Flare,
    /// Timed blast that damages everything it overlaps
    Grenade,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soldier => write!(f, "Soldier"),
            Self::Enemy => write!(f, "Enemy"),
            Self::Projectile => write!(f, "Projectile"),
            Self::Flare => write!(f, "Flare"),
            Self::Grenade => write!(f, "Grenade"),
        }
    }
}
