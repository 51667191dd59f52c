//! Arena module: entity rosters for one session.
//!
//! The Arena owns every live entity, one roster per entity family, and
//! hands out ids. It provides:
//! - Roster storage with deterministic iteration order (`BTreeMap`)
//! - Monotonic id allocation shared by all families
//! - The arena rectangle entities live in
//!
//! Ids are never reused within a session, so iterating a roster by id is
//! iterating it in spawn order. Removal is a compaction pass (`retain`) run
//! by the pipeline, never a splice in the middle of a frame's iteration.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use gloom::Rect;
//! use nightwatch_core::arena::Arena;
//! use nightwatch_core::config::SoldierConfig;
//!
//! let mut arena = Arena::new(Rect::new(0.0, 36.0, 1280.0, 576.0));
//! let a = arena.spawn_soldier(Vec2::new(100.0, 100.0), &SoldierConfig::default());
//! let b = arena.spawn_soldier(Vec2::new(300.0, 100.0), &SoldierConfig::default());
//!
//! let ids: Vec<_> = arena.soldiers().keys().copied().collect();
//! assert_eq!(ids, vec![a, b]);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use gloom::Rect;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{EnemiesConfig, FlareConfig, GrenadeConfig, ProjectileConfig, SoldierConfig};
use crate::entity::{Enemy, EnemyKind, EntityId, Flare, Grenade, Projectile, Soldier};

/// Container for all entities of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Playable rectangle
    pub(crate) bounds: Rect,
    /// Monotonically increasing entity id counter
    next_id: u64,
    pub(crate) soldiers: BTreeMap<EntityId, Soldier>,
    pub(crate) enemies: BTreeMap<EntityId, Enemy>,
    pub(crate) projectiles: BTreeMap<EntityId, Projectile>,
    pub(crate) flares: BTreeMap<EntityId, Flare>,
    pub(crate) grenades: BTreeMap<EntityId, Grenade>,
}

impl Arena {
    /// Creates an empty arena covering `bounds`.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            next_id: 0,
            soldiers: BTreeMap::new(),
            enemies: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            flares: BTreeMap::new(),
            grenades: BTreeMap::new(),
        }
    }

    /// Playable rectangle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Allocate the next entity id.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Soldiers by id.
    #[must_use]
    pub fn soldiers(&self) -> &BTreeMap<EntityId, Soldier> {
        &self.soldiers
    }

    /// Enemies by id.
    #[must_use]
    pub fn enemies(&self) -> &BTreeMap<EntityId, Enemy> {
        &self.enemies
    }

    /// Projectiles by id.
    #[must_use]
    pub fn projectiles(&self) -> &BTreeMap<EntityId, Projectile> {
        &self.projectiles
    }

    /// Flares by id.
    #[must_use]
    pub fn flares(&self) -> &BTreeMap<EntityId, Flare> {
        &self.flares
    }

    /// Grenades by id.
    #[must_use]
    pub fn grenades(&self) -> &BTreeMap<EntityId, Grenade> {
        &self.grenades
    }

    /// Mutable soldier access.
    pub fn soldier_mut(&mut self, id: EntityId) -> Option<&mut Soldier> {
        self.soldiers.get_mut(&id)
    }

    /// Mutable enemy access.
    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// Mutable projectile access.
    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        self.projectiles.get_mut(&id)
    }

    /// Create a soldier with base stats.
    pub fn spawn_soldier(&mut self, position: Vec2, config: &SoldierConfig) -> EntityId {
        let id = self.next_id();
        self.soldiers.insert(id, Soldier::new(id, position, config));
        id
    }

    /// Roll and add an enemy of `kind`.
    pub fn spawn_enemy<R: Rng + ?Sized>(
        &mut self,
        kind: EnemyKind,
        position: Vec2,
        config: &EnemiesConfig,
        game_time: f32,
        rng: &mut R,
    ) -> EntityId {
        let id = self.next_id();
        self.enemies
            .insert(id, Enemy::spawn(id, kind, position, config, game_time, rng));
        id
    }

    /// Add a prebuilt enemy, keyed by its own id.
    ///
    /// The id should come from [`Arena::next_id`].
    pub fn insert_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = enemy.id();
        self.enemies.insert(id, enemy);
        id
    }

    /// Fire a projectile owned by `owner`.
    pub fn spawn_projectile(
        &mut self,
        owner: EntityId,
        origin: Vec2,
        direction: Vec2,
        damage: f32,
        config: &ProjectileConfig,
    ) -> EntityId {
        let id = self.next_id();
        self.projectiles.insert(
            id,
            Projectile::new(
                id,
                owner,
                origin,
                direction,
                config.speed,
                damage,
                config.radius,
            ),
        );
        id
    }

    /// Light a flare.
    pub fn spawn_flare(&mut self, position: Vec2, config: &FlareConfig) -> EntityId {
        let id = self.next_id();
        self.flares.insert(id, Flare::new(id, position, config));
        id
    }

    /// Throw a grenade.
    pub fn spawn_grenade(&mut self, position: Vec2, config: &GrenadeConfig) -> EntityId {
        let id = self.next_id();
        self.grenades.insert(id, Grenade::new(id, position, config));
        id
    }

    /// Total live entities across all rosters.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.soldiers.len()
            + self.enemies.len()
            + self.projectiles.len()
            + self.flares.len()
            + self.grenades.len()
    }

    /// Drop every entity. The id counter keeps running.
    pub fn clear(&mut self) {
        self.soldiers.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.flares.clear();
        self.grenades.clear();
    }
}
