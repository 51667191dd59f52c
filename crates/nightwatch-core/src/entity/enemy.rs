//! Enemies: Basic, Fast and Tank walkers.
//!
//! All kinds share one struct; the kind only selects the stat ranges rolled
//! at spawn. Stats scale linearly with elapsed game time, one extra base
//! value per minute.

use bitflags::bitflags;
use glam::Vec2;
use gloom::Rect;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::config::{EnemiesConfig, StatRange};

/// Enemy variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline walker with rolled stats
    Basic,
    /// Quick and fragile
    Fast,
    /// Slow and hard-hitting, with a guaranteed minimum reward
    Tank,
}

impl EnemyKind {
    /// All kinds in spawn-roll order.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];

    /// Pick a kind with probability proportional to its spawn weight.
    ///
    /// Falls back to the last kind if every weight is zero.
    pub fn pick<R: Rng + ?Sized>(config: &EnemiesConfig, rng: &mut R) -> Self {
        let total = config.total_weight();
        if total == 0 {
            return EnemyKind::Tank;
        }
        let mut roll = rng.gen_range(0..total);
        for kind in Self::ALL {
            let weight = u64::from(config.get(kind).spawn_weight);
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        EnemyKind::Tank
    }
}

bitflags! {
    /// Per-frame enemy status.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct EnemyFlags: u8 {
        /// Overlapping a flare; soldiers may target it from any distance
        const REVEALED = 0b0000_0001;
        /// Locked in melee with a soldier
        const ENGAGED = 0b0000_0010;
    }
}

/// Roll a stat uniformly in `[from·m, to·m)` with `m = game_time/60 + 1`.
pub fn scaled_stat<R: Rng + ?Sized>(range: StatRange, game_time: f32, rng: &mut R) -> f32 {
    let multiplier = game_time / 60.0 + 1.0;
    let from = range.from * multiplier;
    let to = range.to * multiplier;
    if from < to {
        rng.gen_range(from..to)
    } else {
        from
    }
}

/// Kill reward: `trunc(health·speed) / 10`, never below `min_reward`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn reward_for(health: f32, speed: f32, min_reward: u32) -> u32 {
    let base = (health * speed).max(0.0) as u32 / 10;
    base.max(min_reward)
}

/// A hostile walker that chases the nearest soldier.
///
/// The position is the top-left corner of the bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    id: EntityId,
    kind: EnemyKind,
    /// Top-left corner
    pub position: Vec2,
    /// Bounding box extent
    pub size: Vec2,
    /// Pixels per frame
    pub speed: f32,
    /// Current health
    pub health: f32,
    /// Damage per melee frame
    pub damage: f32,
    /// Status set during the current frame
    pub flags: EnemyFlags,
    reward: u32,
}

impl Enemy {
    /// Roll a new enemy of `kind` scaled to `game_time`.
    ///
    /// The reward is fixed here from the rolled health and speed.
    pub fn spawn<R: Rng + ?Sized>(
        id: EntityId,
        kind: EnemyKind,
        position: Vec2,
        config: &EnemiesConfig,
        game_time: f32,
        rng: &mut R,
    ) -> Self {
        let stats = config.get(kind);
        let speed = scaled_stat(stats.speed, game_time, rng);
        let health = scaled_stat(stats.health, game_time, rng);
        let damage = scaled_stat(stats.damage, game_time, rng);
        Self {
            id,
            kind,
            position,
            size: stats.size,
            speed,
            health,
            damage,
            flags: EnemyFlags::empty(),
            reward: reward_for(health, speed, stats.min_reward),
        }
    }

    /// Build an enemy with explicit stats.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn with_stats(
        id: EntityId,
        kind: EnemyKind,
        position: Vec2,
        size: Vec2,
        speed: f32,
        health: f32,
        damage: f32,
        reward: u32,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            size,
            speed,
            health,
            damage,
            flags: EnemyFlags::empty(),
            reward,
        }
    }

    /// Get the enemy's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Get the enemy's kind.
    #[must_use]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Score and currency granted on death.
    #[must_use]
    pub fn reward(&self) -> u32 {
        self.reward
    }

    /// Bounding box in arena coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Check if a flare touched this enemy this frame.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.flags.contains(EnemyFlags::REVEALED)
    }

    /// Position one step towards `target`. Does not move the enemy.
    #[must_use]
    pub fn move_towards(&self, target: Vec2) -> Vec2 {
        self.position + (target - self.position).normalize_or_zero() * self.speed
    }

    /// Position one step away from `threat`. Does not move the enemy.
    #[must_use]
    pub fn move_away(&self, threat: Vec2) -> Vec2 {
        self.position + (self.position - threat).normalize_or_zero() * self.speed
    }

    /// Subtract `damage` from health.
    pub fn take_damage(&mut self, damage: f32) {
        self.health -= damage;
    }

    /// Check if the enemy has died.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}
