//! Enemy movement, damage intake and removal.

use tracing::debug;

use crate::arena::Arena;
use crate::config::SoldierConfig;
use crate::economy::Wallet;
use crate::entity::{EnemyFlags, EntityId, EntityTag};
use crate::events::GameEvent;
use crate::index::{hit_id, FrameIndex};
use crate::targeting::find_nearest;

/// Move every live enemy and resolve what it overlaps.
///
/// Melee against soldiers reads the previous index, so every enemy sees
/// soldiers where they stood at the end of last frame. Flares, projectiles
/// and grenades are read from the current index. Returns the ids of enemies
/// revealed by a flare this frame.
pub fn process_enemies(
    arena: &mut Arena,
    index: &mut FrameIndex,
    soldier_config: &SoldierConfig,
    events: &mut Vec<GameEvent>,
) -> Vec<EntityId> {
    let Arena {
        soldiers,
        enemies,
        projectiles,
        flares,
        grenades,
        ..
    } = arena;
    let mut revealed = Vec::new();

    for (id, enemy) in enemies.iter_mut() {
        enemy.flags = EnemyFlags::empty();
        if enemy.is_dead() {
            continue;
        }

        let bounds = enemy.bounds();
        let mut next = find_nearest(soldiers.values(), enemy.position)
            .map_or(enemy.position, |soldier| enemy.move_towards(soldier.position));

        for hit in index.query_previous(&bounds) {
            if hit.payload != EntityTag::Soldier {
                continue;
            }
            if let Some(soldier) = soldiers.get_mut(&hit_id(&hit)) {
                soldier.take_damage(enemy.damage);
                enemy.flags.insert(EnemyFlags::ENGAGED);
                next = enemy.position;
            }
        }

        for hit in index.query_current(&bounds) {
            let other = hit_id(&hit);
            match hit.payload {
                EntityTag::Flare => {
                    if let Some(flare) = flares.get(&other) {
                        enemy.flags.insert(EnemyFlags::REVEALED);
                        next = enemy.move_away(flare.position);
                    }
                }
                EntityTag::Projectile => {
                    if enemy.is_dead() {
                        continue;
                    }
                    let Some(projectile) = projectiles.get_mut(&other) else {
                        continue;
                    };
                    if !projectile.consume() {
                        continue;
                    }
                    enemy.take_damage(projectile.damage);
                    if !enemy.is_dead() {
                        continue;
                    }
                    let owner = projectile.owner();
                    if let Some(shooter) = soldiers.get_mut(&owner) {
                        if shooter.earn_exp(enemy.reward(), soldier_config) {
                            debug!(soldier = %owner, level = shooter.level(), "soldier levelled up");
                            events.push(GameEvent::LevelUp {
                                id: owner,
                                level: shooter.level(),
                            });
                        }
                    }
                }
                EntityTag::Grenade => {
                    if let Some(grenade) = grenades.get(&other) {
                        enemy.take_damage(grenade.damage);
                    }
                }
                EntityTag::Soldier | EntityTag::Enemy => {}
            }
        }

        if enemy.is_dead() {
            continue;
        }
        if enemy.is_revealed() {
            revealed.push(*id);
        }
        enemy.position = next;
        index.insert(*id, enemy.bounds(), EntityTag::Enemy);
    }

    revealed
}

/// Remove dead enemies, crediting each reward to score and currency.
pub fn cleanup_dead_enemies(arena: &mut Arena, wallet: &mut Wallet, events: &mut Vec<GameEvent>) {
    arena.enemies.retain(|id, enemy| {
        if !enemy.is_dead() {
            return true;
        }
        let reward = enemy.reward();
        wallet.credit(reward);
        debug!(%id, reward, "enemy killed");
        events.push(GameEvent::EnemyKilled { id: *id, reward });
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use gloom::Rect;

    use crate::config::{GameConfig, IndexConfig};
    use crate::entity::{Enemy, EnemyKind};

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    struct Fixture {
        arena: Arena,
        index: FrameIndex,
        config: GameConfig,
        events: Vec<GameEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                arena: Arena::new(BOUNDS),
                index: FrameIndex::new(BOUNDS, &IndexConfig::default()).unwrap(),
                config: GameConfig::default(),
                events: Vec::new(),
            }
        }

        fn enemy(&mut self, position: Vec2, health: f32, reward: u32) -> EntityId {
            let id = self.arena.next_id();
            self.arena.insert_enemy(Enemy::with_stats(
                id,
                EnemyKind::Basic,
                position,
                Vec2::splat(32.0),
                1.0,
                health,
                10.0,
                reward,
            ))
        }

        fn run(&mut self) -> Vec<EntityId> {
            process_enemies(
                &mut self.arena,
                &mut self.index,
                &self.config.soldier,
                &mut self.events,
            )
        }
    }

    #[test]
    fn enemy_walks_towards_nearest_soldier() {
        let mut fx = Fixture::new();
        fx.arena.spawn_soldier(Vec2::new(100.0, 300.0), &fx.config.soldier);
        fx.arena.spawn_soldier(Vec2::new(700.0, 300.0), &fx.config.soldier);
        let e = fx.enemy(Vec2::new(500.0, 300.0), 50.0, 5);

        fx.index.swap();
        fx.run();

        assert_eq!(fx.arena.enemies()[&e].position, Vec2::new(501.0, 300.0));
        assert_eq!(fx.index.current().len(), 1);
    }

    #[test]
    fn melee_uses_previous_positions_and_locks_movement() {
        let mut fx = Fixture::new();
        let s = fx.arena.spawn_soldier(Vec2::new(100.0, 100.0), &fx.config.soldier);
        let e = fx.enemy(Vec2::new(120.0, 100.0), 50.0, 5);

        // Last frame's index has the soldier
        fx.index.insert(s, fx.arena.soldiers()[&s].bounds(), EntityTag::Soldier);
        fx.index.swap();
        fx.run();

        let enemy = &fx.arena.enemies()[&e];
        assert_eq!(enemy.position, Vec2::new(120.0, 100.0));
        assert!(enemy.flags.contains(EnemyFlags::ENGAGED));
        assert_eq!(fx.arena.soldiers()[&s].health, 90.0);
    }

    #[test]
    fn two_projectiles_each_apply_once() {
        let mut fx = Fixture::new();
        let s = fx.arena.spawn_soldier(Vec2::new(700.0, 500.0), &fx.config.soldier);
        let e = fx.enemy(Vec2::new(300.0, 300.0), 40.0, 5);
        let p1 = fx.arena.spawn_projectile(s, Vec2::new(310.0, 310.0), Vec2::X, 10.0, &fx.config.projectile);
        let p2 = fx.arena.spawn_projectile(s, Vec2::new(320.0, 320.0), Vec2::X, 10.0, &fx.config.projectile);

        fx.index.swap();
        for id in [p1, p2] {
            let bounds = fx.arena.projectiles()[&id].bounds();
            fx.index.insert(id, bounds, EntityTag::Projectile);
        }
        fx.run();

        assert_eq!(fx.arena.enemies()[&e].health, 20.0);
        assert!(fx.arena.projectiles()[&p1].is_consumed());
        assert!(fx.arena.projectiles()[&p2].is_consumed());
    }

    #[test]
    fn projectile_overlapping_two_enemies_hits_one() {
        let mut fx = Fixture::new();
        let s = fx.arena.spawn_soldier(Vec2::new(700.0, 500.0), &fx.config.soldier);
        let a = fx.enemy(Vec2::new(300.0, 300.0), 40.0, 5);
        let b = fx.enemy(Vec2::new(320.0, 300.0), 40.0, 5);
        let p = fx.arena.spawn_projectile(s, Vec2::new(330.0, 310.0), Vec2::X, 10.0, &fx.config.projectile);

        fx.index.swap();
        fx.index.insert(p, fx.arena.projectiles()[&p].bounds(), EntityTag::Projectile);
        fx.run();

        let total = fx.arena.enemies()[&a].health + fx.arena.enemies()[&b].health;
        assert_eq!(total, 70.0);
        assert!(fx.arena.projectiles()[&p].is_consumed());
    }

    #[test]
    fn killing_shot_credits_owner_and_removes_enemy() {
        let mut fx = Fixture::new();
        let s = fx.arena.spawn_soldier(Vec2::new(700.0, 500.0), &fx.config.soldier);
        let e = fx.enemy(Vec2::new(300.0, 300.0), 10.0, 30);
        let p = fx.arena.spawn_projectile(s, Vec2::new(310.0, 310.0), Vec2::X, 10.0, &fx.config.projectile);

        fx.index.swap();
        fx.index.insert(p, fx.arena.projectiles()[&p].bounds(), EntityTag::Projectile);
        fx.run();

        // Dead enemies are not re-indexed
        assert!(fx.index.current().query(&BOUNDS).iter().all(|hit| hit.payload != EntityTag::Enemy));
        let soldier = &fx.arena.soldiers()[&s];
        assert_eq!(soldier.experience(), 30);
        assert_eq!(soldier.level(), 1);
        assert!(fx.events.contains(&GameEvent::LevelUp { id: s, level: 1 }));

        let mut wallet = Wallet::default();
        cleanup_dead_enemies(&mut fx.arena, &mut wallet, &mut fx.events);
        assert!(!fx.arena.enemies().contains_key(&e));
        assert_eq!(wallet.score, 30);
        assert_eq!(wallet.money, 30);
    }

    #[test]
    fn flare_repels_and_reveals() {
        let mut fx = Fixture::new();
        fx.arena.spawn_soldier(Vec2::new(100.0, 300.0), &fx.config.soldier);
        let e = fx.enemy(Vec2::new(400.0, 300.0), 50.0, 5);
        let f = fx.arena.spawn_flare(Vec2::new(380.0, 316.0), &fx.config.flare);

        fx.index.swap();
        fx.index.insert(f, fx.arena.flares()[&f].bounds(), EntityTag::Flare);
        let revealed = fx.run();

        assert_eq!(revealed, vec![e]);
        let enemy = &fx.arena.enemies()[&e];
        assert!(enemy.is_revealed());
        // Pushed away from the flare instead of towards the soldier
        assert!(enemy.position.x > 400.0);
    }

    #[test]
    fn grenade_hits_every_frame() {
        let mut fx = Fixture::new();
        let e = fx.enemy(Vec2::new(300.0, 300.0), 250.0, 5);
        let g = fx.arena.spawn_grenade(Vec2::new(316.0, 316.0), &fx.config.grenade);

        for expected in [150.0, 50.0] {
            fx.index.swap();
            fx.index.insert(g, fx.arena.grenades()[&g].bounds(), EntityTag::Grenade);
            fx.run();
            assert_eq!(fx.arena.enemies()[&e].health, expected);
        }
    }
}
