//! Timed enemy spawning.
//!
//! The spawn interval shrinks geometrically with game time down to a floor.
//! A spawn picks random points in the arena until one is outside every
//! soldier's shooting range and clear of everything in the previous index.
//! Running out of attempts means the arena is full.

use glam::Vec2;
use gloom::Rect;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arena::Arena;
use crate::config::{GameConfig, SpawnConfig};
use crate::entity::{EnemyKind, EntityId};
use crate::index::FrameIndex;

/// Result of one spawn attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// A new enemy was placed.
    Spawned(EntityId),
    /// No free spot after the configured number of attempts.
    ArenaFull {
        /// Placement attempts made
        attempts: u32,
    },
}

/// Seconds since the last spawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnTimer {
    since_last_spawn: f32,
}

impl SpawnTimer {
    /// Create a timer that has just spawned.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn interval at `game_time`: `initial · decay^(minutes)`, floored.
    #[must_use]
    pub fn interval(config: &SpawnConfig, game_time: f32) -> f32 {
        let minutes = game_time / 60.0;
        (config.initial_interval * config.interval_decay.powf(minutes)).max(config.interval_floor)
    }

    /// Advance by `dt`. Returns `true` and restarts when a spawn is due.
    pub fn tick(&mut self, dt: f32, game_time: f32, config: &SpawnConfig) -> bool {
        self.since_last_spawn += dt;
        if self.since_last_spawn < Self::interval(config, game_time) {
            return false;
        }
        self.since_last_spawn = 0.0;
        true
    }
}

/// Try to place one enemy.
///
/// Each attempt rolls a point and a kind; the attempt fails when a soldier
/// could shoot the point or the enemy's box overlaps anything in the
/// previous index.
pub fn spawn_enemy<R: Rng + ?Sized>(
    arena: &mut Arena,
    index: &FrameIndex,
    config: &GameConfig,
    game_time: f32,
    rng: &mut R,
) -> SpawnOutcome {
    let bounds = arena.bounds;
    let max_attempts = config.spawning.max_attempts;

    for _ in 0..max_attempts {
        let position = random_point(bounds, rng);
        if arena
            .soldiers
            .values()
            .any(|soldier| soldier.within_shooting_range(position))
        {
            continue;
        }

        let kind = EnemyKind::pick(&config.enemies, rng);
        let footprint = Rect::from_origin_size(position, config.enemies.get(kind).size);
        if !index.query_previous(&footprint).is_empty() {
            continue;
        }

        let id = arena.spawn_enemy(kind, position, &config.enemies, game_time, rng);
        debug!(%id, ?kind, ?position, "enemy spawned");
        return SpawnOutcome::Spawned(id);
    }

    info!(attempts = max_attempts, "no free spot for an enemy, arena is full");
    SpawnOutcome::ArenaFull {
        attempts: max_attempts,
    }
}

fn random_point<R: Rng + ?Sized>(bounds: Rect, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.gen_range(bounds.x..bounds.right()),
        rng.gen_range(bounds.y..bounds.bottom()),
    )
}
