//! Events emitted by the frame step for renderer and audio collaborators.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{ConsumableKind, EnemyKind, EntityId};

/// Something observable happened during a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new enemy entered the arena.
    EnemySpawned {
        /// New enemy
        id: EntityId,
        /// Its kind
        kind: EnemyKind,
        /// Where it appeared
        position: Vec2,
    },
    /// An enemy died and its reward was credited.
    EnemyKilled {
        /// Dead enemy
        id: EntityId,
        /// Score and currency granted
        reward: u32,
    },
    /// A soldier fell.
    SoldierDown {
        /// Fallen soldier
        id: EntityId,
    },
    /// A soldier gained a level.
    LevelUp {
        /// Promoted soldier
        id: EntityId,
        /// Level reached
        level: u32,
    },
    /// A soldier fired.
    ProjectileFired {
        /// New projectile
        id: EntityId,
        /// Shooter
        owner: EntityId,
        /// Projectile target
        target: EntityId,
    },
    /// The player placed a flare or grenade.
    ConsumableUsed {
        /// New flare or grenade
        id: EntityId,
        /// What was placed
        kind: ConsumableKind,
        /// Where it was placed
        position: Vec2,
    },
    /// No free spot for a new enemy: the run is won.
    ArenaFull,
    /// The run ended.
    RunOver {
        /// True for a full arena, false when every soldier fell
        victory: bool,
        /// Game time in seconds
        elapsed: f32,
    },
}
