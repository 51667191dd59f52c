//! Flares and grenades: stationary area effects placed by the player.

use glam::Vec2;
use gloom::Rect;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::config::{FlareConfig, GrenadeConfig};

/// Consumable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConsumableKind {
    /// Slot 1
    #[default]
    Flare,
    /// Slot 2
    Grenade,
}

impl ConsumableKind {
    /// Map a 1-based input slot to a kind.
    #[must_use]
    pub fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(Self::Flare),
            2 => Some(Self::Grenade),
            _ => None,
        }
    }
}

/// Light that repels and reveals enemies while it dims away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flare {
    id: EntityId,
    /// Centre
    pub position: Vec2,
    /// Current radius
    pub radius: f32,
    initial_radius: f32,
    damping: f32,
    went_out_radius: f32,
}

impl Flare {
    /// Light a flare at `position`.
    #[must_use]
    pub fn new(id: EntityId, position: Vec2, config: &FlareConfig) -> Self {
        Self {
            id,
            position,
            radius: config.radius,
            initial_radius: config.radius,
            damping: config.damping,
            went_out_radius: config.radius * config.went_out_percent / 100.0,
        }
    }

    /// Get the flare's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Radius when lit.
    #[must_use]
    pub fn initial_radius(&self) -> f32 {
        self.initial_radius
    }

    /// Shrink the radius by one frame of damping.
    pub fn dim(&mut self) {
        self.radius *= self.damping;
    }

    /// Check if the radius dropped below the went-out threshold.
    #[must_use]
    pub fn went_out(&self) -> bool {
        self.radius < self.went_out_radius
    }

    /// Square around the lit circle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.position, self.radius)
    }
}

/// Timed blast that damages everything it overlaps each active frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grenade {
    id: EntityId,
    /// Centre
    pub position: Vec2,
    /// Blast radius
    pub radius: f32,
    /// Damage per active frame
    pub damage: f32,
    duration: f32,
    active_for: f32,
}

impl Grenade {
    /// Throw a grenade at `position`.
    #[must_use]
    pub fn new(id: EntityId, position: Vec2, config: &GrenadeConfig) -> Self {
        Self {
            id,
            position,
            radius: config.radius,
            damage: config.damage,
            duration: config.duration,
            active_for: 0.0,
        }
    }

    /// Get the grenade's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Seconds the blast has been running.
    #[must_use]
    pub fn active_for(&self) -> f32 {
        self.active_for
    }

    /// Advance the blast timer by `dt` seconds.
    pub fn progress_time(&mut self, dt: f32) {
        self.active_for += dt;
    }

    /// Check if the blast is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active_for < self.duration
    }

    /// Square around the blast circle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.position, self.radius)
    }
}
