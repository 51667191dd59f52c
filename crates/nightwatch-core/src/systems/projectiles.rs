//! Projectile flight and expiry.

use crate::arena::Arena;
use crate::entity::EntityTag;
use crate::index::FrameIndex;

/// Move every projectile one frame, then drop spent ones and those whose
/// centre left the arena. Survivors go into the current index.
pub fn process_projectiles(arena: &mut Arena, index: &mut FrameIndex) {
    let bounds = arena.bounds;
    for projectile in arena.projectiles.values_mut() {
        projectile.advance();
    }
    arena
        .projectiles
        .retain(|_, p| !p.is_consumed() && bounds.contains_point(p.position));
    for (id, projectile) in &arena.projectiles {
        index.insert(*id, projectile.bounds(), EntityTag::Projectile);
    }
}
