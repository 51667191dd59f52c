//! Soldier melee, shooting and removal.

use glam::Vec2;
use tracing::debug;

use crate::arena::Arena;
use crate::config::ProjectileConfig;
use crate::entity::{EntityId, EntityTag, SoldierState};
use crate::events::GameEvent;
use crate::index::{hit_id, FrameIndex};
use crate::targeting::{find_nearest, nearest_within};

/// Remove fallen soldiers.
pub fn cleanup_dead_soldiers(arena: &mut Arena, events: &mut Vec<GameEvent>) {
    arena.soldiers.retain(|id, soldier| {
        if !soldier.is_dead() {
            return true;
        }
        debug!(%id, "soldier down");
        events.push(GameEvent::SoldierDown { id: *id });
        false
    });
}

struct Shot {
    owner: EntityId,
    target: EntityId,
    origin: Vec2,
    direction: Vec2,
    damage: f32,
}

/// Run every soldier's turn and index it.
///
/// A soldier overlapping an enemy in the current index fights it in melee
/// and does not shoot. An idle soldier fires at the nearest live enemy in
/// range, or failing that at the nearest revealed enemy at the slow rate.
/// Projectiles fired here join the roster but not the index; they are
/// indexed after they first move next frame.
pub fn process_soldiers(
    arena: &mut Arena,
    index: &mut FrameIndex,
    revealed: &[EntityId],
    dt: f32,
    projectile_config: &ProjectileConfig,
    events: &mut Vec<GameEvent>,
) {
    let mut shots = Vec::new();
    {
        let Arena {
            soldiers,
            enemies,
            grenades,
            ..
        } = &mut *arena;

        for (id, soldier) in soldiers.iter_mut() {
            soldier.progress_time(dt);
            soldier.state = SoldierState::Idle;

            let bounds = soldier.bounds();
            for hit in index.query_current(&bounds) {
                let other = hit_id(&hit);
                match hit.payload {
                    EntityTag::Enemy => {
                        if let Some(enemy) = enemies.get_mut(&other) {
                            soldier.state = SoldierState::Melee;
                            enemy.take_damage(soldier.damage);
                        }
                    }
                    EntityTag::Grenade => {
                        if let Some(grenade) = grenades.get(&other) {
                            soldier.take_damage(grenade.damage);
                        }
                    }
                    EntityTag::Soldier | EntityTag::Projectile | EntityTag::Flare => {}
                }
            }

            if soldier.state == SoldierState::Idle {
                let alive = enemies.values().filter(|enemy| !enemy.is_dead());
                let (target, fast) =
                    match nearest_within(alive, soldier.position, soldier.shooting_range) {
                        Some(enemy) => (Some(enemy), true),
                        None => {
                            let flared = revealed
                                .iter()
                                .filter_map(|id| enemies.get(id))
                                .filter(|enemy| !enemy.is_dead());
                            (find_nearest(flared, soldier.position), false)
                        }
                    };

                if let Some(target) = target {
                    if soldier.can_shoot(fast) {
                        soldier.shoot();
                        soldier.state = SoldierState::Shooting;
                        shots.push(Shot {
                            owner: *id,
                            target: target.id(),
                            origin: soldier.position,
                            direction: target.position - soldier.position,
                            damage: soldier.damage,
                        });
                    }
                }
            }

            index.insert(*id, bounds, EntityTag::Soldier);
        }
    }

    for shot in shots {
        let id = arena.spawn_projectile(
            shot.owner,
            shot.origin,
            shot.direction,
            shot.damage,
            projectile_config,
        );
        events.push(GameEvent::ProjectileFired {
            id,
            owner: shot.owner,
            target: shot.target,
        });
    }
}
