//! Test helper functions for setting up sessions and entities.
//!
//! This module provides factory functions that put a session straight into
//! a run with a known squad, so tests can focus on a single frame.

use glam::Vec2;
use gloom::Rect;

use crate::config::GameConfig;
use crate::entity::{Enemy, EnemyKind, EntityId};
use crate::events::GameEvent;
use crate::input::FrameInput;
use crate::simulation::Simulation;

/// Arena used by session tests: a 1280x720 window minus the HUD strips.
pub const ARENA: Rect = Rect::new(0.0, 36.0, 1280.0, 576.0);

/// One 60 Hz frame.
pub const DT: f32 = 1.0 / 60.0;

// =============================================================================
// Config
// =============================================================================

/// Default balance with spawning pushed far enough out that no enemy
/// appears unless a test adds it.
pub fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.spawning.initial_interval = 1.0e6;
    config
}

// =============================================================================
// Session Setup
// =============================================================================

/// Creates a session already in a run.
///
/// # Arguments
///
/// * `config` - Balance config for the session
/// * `squad` - Top-left corners of the soldiers to place; must not overlap
///
/// # Returns
///
/// The session and the soldier ids in placement order.
pub fn playing_sim(config: GameConfig, squad: &[Vec2]) -> (Simulation, Vec<EntityId>) {
    let mut sim = Simulation::new(config, ARENA, 42).expect("valid session");
    sim.open_setup().expect("setup from the menu");
    let ids = squad
        .iter()
        .map(|position| sim.place_soldier_at(*position).expect("free spot"))
        .collect();
    sim.start_run().expect("squad placed");
    (sim, ids)
}

// =============================================================================
// Entity Factories
// =============================================================================

/// Adds an enemy that never moves.
///
/// # Arguments
///
/// * `sim` - The session to add to
/// * `position` - Top-left corner of the 32x32 enemy
/// * `health` - Starting health
/// * `damage` - Melee damage per frame
/// * `reward` - Score, currency and experience on death
///
/// # Returns
///
/// The new enemy's id.
pub fn add_stationary_enemy(
    sim: &mut Simulation,
    position: Vec2,
    health: f32,
    damage: f32,
    reward: u32,
) -> EntityId {
    let arena = sim.arena_mut();
    let id = arena.next_id();
    arena.insert_enemy(Enemy::with_stats(
        id,
        EnemyKind::Basic,
        position,
        Vec2::splat(32.0),
        0.0,
        health,
        damage,
        reward,
    ))
}

/// Steps `frames` idle frames of [`DT`].
pub fn run_idle(sim: &mut Simulation, frames: usize) {
    for _ in 0..frames {
        sim.step(&FrameInput::idle(DT));
    }
}

// =============================================================================
// Event Queries
// =============================================================================

/// Counts events matching `predicate`.
pub fn count_events(events: &[GameEvent], predicate: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}
