//! Flare and grenade placement and upkeep.

use glam::Vec2;
use tracing::{debug, warn};

use crate::arena::Arena;
use crate::config::GameConfig;
use crate::economy::Inventory;
use crate::entity::{ConsumableKind, EntityId, EntityTag};
use crate::events::GameEvent;
use crate::index::FrameIndex;

/// Place the selected consumable at a clicked point.
///
/// Nothing happens for a click outside the arena or an empty slot.
pub fn use_consumable(
    arena: &mut Arena,
    inventory: &mut Inventory,
    click: Vec2,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    if !arena.bounds.contains_point(click) {
        debug!(?click, "click outside arena ignored");
        return None;
    }
    let kind = inventory.selected;
    if !inventory.take(kind) {
        warn!(?kind, "no consumables left in selected slot");
        return None;
    }

    let id = match kind {
        ConsumableKind::Flare => arena.spawn_flare(click, &config.flare),
        ConsumableKind::Grenade => arena.spawn_grenade(click, &config.grenade),
    };
    debug!(%id, ?kind, ?click, "consumable placed");
    events.push(GameEvent::ConsumableUsed {
        id,
        kind,
        position: click,
    });
    Some(id)
}

/// Dim every flare, drop those that went out and index the rest.
pub fn process_flares(arena: &mut Arena, index: &mut FrameIndex) {
    for flare in arena.flares.values_mut() {
        flare.dim();
    }
    arena.flares.retain(|_, flare| !flare.went_out());
    for (id, flare) in &arena.flares {
        index.insert(*id, flare.bounds(), EntityTag::Flare);
    }
}

/// Advance grenade timers, drop expired blasts and index the rest.
pub fn process_grenades(arena: &mut Arena, index: &mut FrameIndex, dt: f32) {
    for grenade in arena.grenades.values_mut() {
        grenade.progress_time(dt);
    }
    arena.grenades.retain(|_, grenade| grenade.is_active());
    for (id, grenade) in &arena.grenades {
        index.insert(*id, grenade.bounds(), EntityTag::Grenade);
    }
}
