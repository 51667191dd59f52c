//! Game balance and engine tunables.
//!
//! Every number the simulation uses lives here. [`GameConfig::default`]
//! carries the shipped balance; a JSON document can override any subset of
//! it, since every section falls back to its defaults.
//!
//! # Example
//!
//! ```
//! use nightwatch_core::config::GameConfig;
//!
//! let config = GameConfig::from_json(r#"{ "grenade": { "damage": 50.0 } }"#).unwrap();
//! assert_eq!(config.grenade.damage, 50.0);
//! assert_eq!(config.flare.radius, 50.0);
//! ```

use glam::Vec2;
use gloom::{QuadtreeConfig, Rect};
use serde::{Deserialize, Serialize};

use crate::entity::EnemyKind;
use crate::error::ConfigError;

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Spatial index tuning
    pub index: IndexConfig,
    /// Soldier base stats and progression
    pub soldier: SoldierConfig,
    /// Per-kind enemy stats and spawn weights
    pub enemies: EnemiesConfig,
    /// Enemy spawn timer
    pub spawning: SpawnConfig,
    /// Projectile flight
    pub projectile: ProjectileConfig,
    /// Flare area effect
    pub flare: FlareConfig,
    /// Grenade area effect
    pub grenade: GrenadeConfig,
    /// Starting inventory and shop
    pub economy: EconomyConfig,
    /// Squad placement before a run
    pub setup: SetupConfig,
    /// Final score and record submission
    pub scoring: ScoringConfig,
}

impl GameConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every tunable against the range the simulation supports.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.index.quadtree(Rect::new(0.0, 0.0, 1.0, 1.0)).validate()?;

        let s = &self.soldier;
        check(is_size(s.size), "soldier.size", "must be positive")?;
        check(s.health > 0.0, "soldier.health", "must be positive")?;
        check(s.damage >= 0.0, "soldier.damage", "must not be negative")?;
        check(s.shooting_range > 0.0, "soldier.shooting_range", "must be positive")?;
        check(
            s.shooting_interval > 0.0,
            "soldier.shooting_interval",
            "must be positive",
        )?;
        check(
            s.revealed_interval_multiplier >= 1.0,
            "soldier.revealed_interval_multiplier",
            "must be at least 1",
        )?;
        check(
            s.level_stat_percent >= 0.0 && s.level_stat_percent < 100.0,
            "soldier.level_stat_percent",
            "must be in 0..100",
        )?;

        for kind in EnemyKind::ALL {
            self.enemies.get(kind).validate()?;
        }
        check(
            self.enemies.total_weight() > 0,
            "enemies.*.spawn_weight",
            "at least one kind must have a positive weight",
        )?;

        let sp = &self.spawning;
        check(sp.initial_interval > 0.0, "spawning.initial_interval", "must be positive")?;
        check(
            sp.interval_decay > 0.0 && sp.interval_decay <= 1.0,
            "spawning.interval_decay",
            "must be in (0, 1]",
        )?;
        check(sp.interval_floor > 0.0, "spawning.interval_floor", "must be positive")?;
        check(sp.max_attempts > 0, "spawning.max_attempts", "must be positive")?;

        check(self.projectile.speed > 0.0, "projectile.speed", "must be positive")?;
        check(self.projectile.radius > 0.0, "projectile.radius", "must be positive")?;

        let f = &self.flare;
        check(f.radius > 0.0, "flare.radius", "must be positive")?;
        check(
            f.damping > 0.0 && f.damping < 1.0,
            "flare.damping",
            "must be in (0, 1)",
        )?;
        check(
            f.went_out_percent > 0.0 && f.went_out_percent < 100.0,
            "flare.went_out_percent",
            "must be in (0, 100)",
        )?;

        check(self.grenade.radius > 0.0, "grenade.radius", "must be positive")?;
        check(self.grenade.duration > 0.0, "grenade.duration", "must be positive")?;

        check(self.setup.max_soldiers > 0, "setup.max_soldiers", "must be positive")?;
        check(
            self.setup.placement_attempts > 0,
            "setup.placement_attempts",
            "must be positive",
        )?;
        check(
            self.setup.placement_margin >= 0.0,
            "setup.placement_margin",
            "must not be negative",
        )?;
        Ok(())
    }
}

fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}

fn is_size(size: Vec2) -> bool {
    size.x > 0.0 && size.y > 0.0 && size.is_finite()
}

/// Spatial index tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Entries a region holds before subdividing
    pub capacity: usize,
    /// Deepest subdivision level
    pub max_depth: u8,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            max_depth: 12,
        }
    }
}

impl IndexConfig {
    /// Quadtree configuration covering `bounds`.
    #[must_use]
    pub fn quadtree(&self, bounds: Rect) -> QuadtreeConfig {
        QuadtreeConfig {
            bounds,
            capacity: self.capacity,
            max_depth: self.max_depth,
        }
    }
}

/// Soldier base stats and progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoldierConfig {
    /// Sprite size; the bounding box extends right/down from the position
    pub size: Vec2,
    /// Movement speed in pixels per frame. Reserved: carried onto each
    /// soldier's stat sheet, not read by the frame step.
    pub speed: f32,
    /// Starting and maximum health
    pub health: f32,
    /// Damage per melee frame and per projectile
    pub damage: f32,
    /// Shots only at targets strictly closer than this
    pub shooting_range: f32,
    /// Seconds between shots
    pub shooting_interval: f32,
    /// Interval multiplier when firing at a revealed, out-of-range enemy
    pub revealed_interval_multiplier: f32,
    /// Experience needed for the first level
    pub first_level_threshold: u32,
    /// Integer percent added to the threshold on each level
    pub threshold_growth_percent: u32,
    /// Percent applied to health, damage, range and interval on each level
    pub level_stat_percent: f32,
}

impl Default for SoldierConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(32.0, 32.0),
            speed: 2.0,
            health: 100.0,
            damage: 10.0,
            shooting_range: 100.0,
            shooting_interval: 0.5,
            revealed_interval_multiplier: 2.0,
            first_level_threshold: 30,
            threshold_growth_percent: 30,
            level_stat_percent: 10.0,
        }
    }
}

/// Uniform roll range for a stat, before time scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
    /// Inclusive lower bound
    pub from: f32,
    /// Exclusive upper bound; equal to `from` for a fixed stat
    pub to: f32,
}

impl StatRange {
    /// Range that always rolls `value`.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self {
            from: value,
            to: value,
        }
    }

    /// Range rolling uniformly in `from..to`.
    #[must_use]
    pub const fn between(from: f32, to: f32) -> Self {
        Self { from, to }
    }
}

/// Stats and spawn weight for one enemy kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyKindConfig {
    /// Sprite size; the bounding box extends right/down from the position
    pub size: Vec2,
    /// Pixels per frame
    pub speed: StatRange,
    /// Starting health
    pub health: StatRange,
    /// Damage per melee frame
    pub damage: StatRange,
    /// Relative spawn likelihood
    pub spawn_weight: u32,
    /// Lower bound on the kill reward
    pub min_reward: u32,
}

impl EnemyKindConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check(is_size(self.size), "enemies.*.size", "must be positive")?;
        for range in [self.speed, self.health, self.damage] {
            check(
                range.from >= 0.0 && range.from <= range.to && range.to.is_finite(),
                "enemies.*.{speed,health,damage}",
                "ranges need 0 <= from <= to",
            )?;
        }
        check(self.health.from > 0.0, "enemies.*.health", "must be positive")
    }
}

/// Per-kind enemy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemiesConfig {
    /// Baseline walker
    pub basic: EnemyKindConfig,
    /// Quick, fragile runner
    pub fast: EnemyKindConfig,
    /// Slow, hard-hitting brute
    pub tank: EnemyKindConfig,
}

impl Default for EnemiesConfig {
    fn default() -> Self {
        Self {
            basic: EnemyKindConfig {
                size: Vec2::new(32.0, 32.0),
                speed: StatRange::between(0.8, 1.3),
                health: StatRange::between(40.0, 80.0),
                damage: StatRange::between(9.0, 19.0),
                spawn_weight: 50,
                min_reward: 0,
            },
            fast: EnemyKindConfig {
                size: Vec2::new(24.0, 24.0),
                speed: StatRange::fixed(3.0),
                health: StatRange::fixed(10.0),
                damage: StatRange::fixed(5.0),
                spawn_weight: 35,
                min_reward: 0,
            },
            tank: EnemyKindConfig {
                size: Vec2::new(48.0, 48.0),
                speed: StatRange::fixed(0.2),
                health: StatRange::fixed(40.0),
                damage: StatRange::fixed(20.0),
                spawn_weight: 15,
                min_reward: 30,
            },
        }
    }
}

impl EnemiesConfig {
    /// Configuration for one kind.
    #[must_use]
    pub fn get(&self, kind: EnemyKind) -> &EnemyKindConfig {
        match kind {
            EnemyKind::Basic => &self.basic,
            EnemyKind::Fast => &self.fast,
            EnemyKind::Tank => &self.tank,
        }
    }

    /// Sum of all spawn weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        EnemyKind::ALL
            .iter()
            .map(|kind| u64::from(self.get(*kind).spawn_weight))
            .sum()
    }
}

/// Enemy spawn timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between spawns at the start of a run
    pub initial_interval: f32,
    /// Interval multiplier per minute of game time
    pub interval_decay: f32,
    /// Shortest interval
    pub interval_floor: f32,
    /// Placement attempts before the arena counts as full
    pub max_attempts: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_interval: 1.0,
            interval_decay: 0.90,
            interval_floor: 0.1,
            max_attempts: 100,
        }
    }
}

/// Projectile flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Pixels per frame
    pub speed: f32,
    /// Collision radius
    pub radius: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            radius: 5.0,
        }
    }
}

/// Flare area effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlareConfig {
    /// Radius when thrown
    pub radius: f32,
    /// Radius multiplier applied every frame
    pub damping: f32,
    /// Out once the radius drops below this percent of the initial radius
    pub went_out_percent: f32,
}

impl Default for FlareConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            damping: 0.99,
            went_out_percent: 10.0,
        }
    }
}

/// Grenade area effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrenadeConfig {
    /// Blast radius
    pub radius: f32,
    /// Seconds the blast stays active
    pub duration: f32,
    /// Damage per active frame to everything overlapping
    pub damage: f32,
}

impl Default for GrenadeConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            duration: 1.0,
            damage: 100.0,
        }
    }
}

/// A purchasable consumable pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    /// Price in currency
    pub price: u64,
    /// Units added to the inventory
    pub count: u32,
}

/// Starting inventory and shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Flares at the start of a run
    pub starting_flares: u32,
    /// Grenades at the start of a run
    pub starting_grenades: u32,
    /// Flare pack
    pub flare_pack: ShopItem,
    /// Grenade pack
    pub grenade_pack: ShopItem,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_flares: 50,
            starting_grenades: 5,
            flare_pack: ShopItem {
                price: 10,
                count: 10,
            },
            grenade_pack: ShopItem {
                price: 20,
                count: 1,
            },
        }
    }
}

/// Squad placement before a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Largest squad
    pub max_soldiers: usize,
    /// Distance kept from the arena edge by random placement
    pub placement_margin: f32,
    /// Random placement attempts before giving up
    pub placement_attempts: u32,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            max_soldiers: 4,
            placement_margin: 100.0,
            placement_attempts: 1000,
        }
    }
}

/// Final score and record submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Score is multiplied by this to the power of surviving soldiers
    pub alive_soldier_base: u64,
    /// Longest player name kept in a record
    pub max_name_length: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alive_soldier_base: 2,
            max_name_length: 10,
        }
    }
}
