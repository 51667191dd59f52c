//! Soldiers: the player's defenders.

use glam::Vec2;
use gloom::Rect;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::config::SoldierConfig;

/// What a soldier did this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SoldierState {
    /// Neither fighting nor firing
    #[default]
    Idle,
    /// Hitting an overlapping enemy
    Melee,
    /// Fired a projectile this frame
    Shooting,
}

/// A stationary defender that melees overlapping enemies and shoots at
/// enemies in range.
///
/// The position is the top-left corner of the bounding box; distances are
/// measured between positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soldier {
    id: EntityId,
    /// Top-left corner
    pub position: Vec2,
    /// Bounding box extent
    pub size: Vec2,
    /// Behaviour this frame
    pub state: SoldierState,
    /// Movement speed in pixels per frame. Part of the stat sheet shown to
    /// the player; soldiers hold their placed position during a run.
    pub speed: f32,
    /// Current health
    pub health: f32,
    /// Health restored on level-up
    pub max_health: f32,
    /// Damage per melee frame and per projectile
    pub damage: f32,
    /// Targets strictly closer than this can be shot
    pub shooting_range: f32,
    /// Seconds between shots at in-range targets
    pub shooting_interval: f32,
    /// Interval multiplier for revealed targets outside the range
    pub revealed_interval_multiplier: f32,
    since_last_shot: f32,
    experience: u32,
    level_threshold: u32,
    level: u32,
}

impl Soldier {
    /// Create a fresh level-zero soldier, ready to fire immediately.
    #[must_use]
    pub fn new(id: EntityId, position: Vec2, config: &SoldierConfig) -> Self {
        Self {
            id,
            position,
            size: config.size,
            state: SoldierState::Idle,
            speed: config.speed,
            health: config.health,
            max_health: config.health,
            damage: config.damage,
            shooting_range: config.shooting_range,
            shooting_interval: config.shooting_interval,
            revealed_interval_multiplier: config.revealed_interval_multiplier,
            since_last_shot: config.shooting_interval,
            experience: 0,
            level_threshold: config.first_level_threshold,
            level: 0,
        }
    }

    /// Get the soldier's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Bounding box in arena coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Levels gained so far.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Accumulated experience.
    #[must_use]
    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Experience needed for the next level.
    #[must_use]
    pub fn level_threshold(&self) -> u32 {
        self.level_threshold
    }

    /// Seconds since the last shot, capped at the slow-fire interval.
    #[must_use]
    pub fn since_last_shot(&self) -> f32 {
        self.since_last_shot
    }

    /// Strict `<` range check from this soldier's position.
    #[must_use]
    pub fn within_shooting_range(&self, point: Vec2) -> bool {
        self.position.distance(point) < self.shooting_range
    }

    /// Check the cooldown. Slow fire (at a revealed target outside the
    /// range) waits for the longer interval.
    #[must_use]
    pub fn can_shoot(&self, fast: bool) -> bool {
        let interval = if fast {
            self.shooting_interval
        } else {
            self.slow_interval()
        };
        self.since_last_shot >= interval
    }

    /// Restart the cooldown.
    pub fn shoot(&mut self) {
        self.since_last_shot = 0.0;
    }

    /// Advance the cooldown timer by `dt` seconds.
    pub fn progress_time(&mut self, dt: f32) {
        if self.since_last_shot < self.slow_interval() {
            self.since_last_shot += dt;
        }
    }

    fn slow_interval(&self) -> f32 {
        self.shooting_interval * self.revealed_interval_multiplier
    }

    /// Credit experience. Returns `true` when the soldier levelled up.
    ///
    /// At most one level is gained per credit; the threshold grows by an
    /// integer percentage of itself.
    pub fn earn_exp(&mut self, exp: u32, config: &SoldierConfig) -> bool {
        self.experience = self.experience.saturating_add(exp);
        if self.experience < self.level_threshold {
            return false;
        }
        self.level_threshold = self
            .level_threshold
            .saturating_add(self.level_threshold.saturating_mul(config.threshold_growth_percent) / 100);
        self.level_up(config.level_stat_percent);
        true
    }

    /// Raise health, damage and range by `percent`, shorten the shooting
    /// interval by the same percent and restore full health.
    pub fn level_up(&mut self, percent: f32) {
        let factor = percent / 100.0;
        self.max_health += self.max_health * factor;
        self.health = self.max_health;
        self.damage += self.damage * factor;
        self.shooting_range += self.shooting_range * factor;
        self.shooting_interval -= self.shooting_interval * factor;
        self.level += 1;
    }

    /// Subtract `damage` from health.
    pub fn take_damage(&mut self, damage: f32) {
        self.health -= damage;
    }

    /// Check if the soldier has fallen.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soldier() -> Soldier {
        Soldier::new(EntityId::new(1), Vec2::new(100.0, 100.0), &SoldierConfig::default())
    }

    #[test]
    fn new_soldier_can_fire_immediately() {
        let s = soldier();
        assert!(s.can_shoot(true));
        assert!(!s.can_shoot(false));
        assert_eq!(s.state, SoldierState::Idle);
        assert_eq!(s.bounds(), Rect::new(100.0, 100.0, 32.0, 32.0));
        assert_eq!(s.speed, 2.0);
    }

    #[test]
    fn range_check_is_strict() {
        let s = soldier();
        assert!(s.within_shooting_range(Vec2::new(199.0, 100.0)));
        assert!(!s.within_shooting_range(Vec2::new(200.0, 100.0)));
    }

    #[test]
    fn cooldown_and_slow_fire() {
        let mut s = soldier();
        s.shoot();
        assert!(!s.can_shoot(true));

        s.progress_time(0.5);
        assert!(s.can_shoot(true));
        assert!(!s.can_shoot(false));

        s.progress_time(0.5);
        assert!(s.can_shoot(false));

        // Capped once the slow interval has elapsed
        s.progress_time(10.0);
        assert!(s.since_last_shot() <= 1.0 + f32::EPSILON);
    }

    #[test]
    fn level_up_scales_stats() {
        let config = SoldierConfig::default();
        let mut s = soldier();
        s.health = 12.0;

        assert!(!s.earn_exp(29, &config));
        assert!(s.earn_exp(1, &config));

        assert_eq!(s.level(), 1);
        assert_eq!(s.max_health, 110.0);
        assert_eq!(s.health, 110.0);
        assert_eq!(s.damage, 11.0);
        assert_eq!(s.shooting_range, 110.0);
        assert!((s.shooting_interval - 0.45).abs() < 1e-6);
        assert_eq!(s.level_threshold(), 39);
    }

    #[test]
    fn one_level_per_credit() {
        let config = SoldierConfig::default();
        let mut s = soldier();
        assert!(s.earn_exp(1000, &config));
        assert_eq!(s.level(), 1);
        // Experience carries over; the next credit levels again.
        assert!(s.earn_exp(0, &config));
        assert_eq!(s.level(), 2);
    }

    #[test]
    fn death_at_zero_health() {
        let mut s = soldier();
        s.take_damage(99.0);
        assert!(!s.is_dead());
        s.take_damage(1.0);
        assert!(s.is_dead());
    }
}
