//! Integration tests for the full frame pipeline.
//!
//! These tests drive [`Simulation::step`] end to end:
//! - Soldier targeting and projectile flight
//! - Projectile hits, kills, rewards and level-ups
//! - Flares and grenades placed by clicks
//! - Run end by defeat and by a full arena
//! - Handing the result to a score store

use glam::Vec2;

use crate::config::GameConfig;
use crate::economy::Wallet;
use crate::entity::{ConsumableKind, SoldierState};
use crate::error::StoreError;
use crate::events::GameEvent;
use crate::input::FrameInput;
use crate::scoring::{Leaderboard, ScoreRecord, ScoreStore};
use crate::simulation::{GameScreen, Simulation};

use super::helpers::{
    add_stationary_enemy, count_events, playing_sim, quiet_config, run_idle, DT,
};

// =============================================================================
// Test Stores
// =============================================================================

/// A score store whose backend is always down.
#[derive(Default)]
struct OfflineStore {
    attempts: usize,
}

impl ScoreStore for OfflineStore {
    fn record(&mut self, _record: ScoreRecord) -> Result<(), StoreError> {
        self.attempts += 1;
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn ranked(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

// =============================================================================
// Shooting
// =============================================================================

#[test]
fn soldier_shoots_enemy_in_range() {
    let (mut sim, squad) = playing_sim(quiet_config(), &[Vec2::new(100.0, 100.0)]);
    let enemy = add_stationary_enemy(&mut sim, Vec2::new(150.0, 100.0), 50.0, 10.0, 5);

    sim.step(&FrameInput::idle(DT));

    let soldier = &sim.arena().soldiers()[&squad[0]];
    assert_eq!(soldier.state, SoldierState::Shooting);
    assert_eq!(sim.arena().projectiles().len(), 1);
    let projectile = sim.arena().projectiles().values().next().unwrap();
    assert_eq!(projectile.direction(), Vec2::new(1.0, 0.0));
    assert_eq!(projectile.position, Vec2::new(100.0, 100.0));

    let events = sim.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        GameEvent::ProjectileFired { owner, target, .. } if *owner == squad[0] && *target == enemy
    )));
}

#[test]
fn soldier_holds_fire_until_cooldown() {
    let (mut sim, _) = playing_sim(quiet_config(), &[Vec2::new(100.0, 100.0)]);
    add_stationary_enemy(&mut sim, Vec2::new(150.0, 100.0), 1000.0, 10.0, 5);
    let fired = |events: &[GameEvent]| {
        count_events(events, |e| matches!(e, GameEvent::ProjectileFired { .. }))
    };

    // 0.5 s interval at 60 Hz: one shot on the first frame, the next about 30 frames later
    run_idle(&mut sim, 20);
    assert_eq!(fired(&sim.drain_events()), 1);
    run_idle(&mut sim, 20);
    assert_eq!(fired(&sim.drain_events()), 1);
}

#[test]
fn soldiers_hold_their_placed_position() {
    let (mut sim, squad) = playing_sim(quiet_config(), &[Vec2::new(100.0, 100.0)]);
    add_stationary_enemy(&mut sim, Vec2::new(150.0, 100.0), 1000.0, 10.0, 5);

    run_idle(&mut sim, 60);
    let soldier = &sim.arena().soldiers()[&squad[0]];
    assert_eq!(soldier.position, Vec2::new(100.0, 100.0));
    assert_eq!(soldier.speed, sim.config().soldier.speed);
}

// =============================================================================
// Projectile Hits
// =============================================================================

#[test]
fn two_projectiles_deal_damage_once_each() {
    let (mut sim, squad) = playing_sim(quiet_config(), &[Vec2::new(1100.0, 500.0)]);
    let enemy = add_stationary_enemy(&mut sim, Vec2::new(300.0, 300.0), 40.0, 10.0, 5);
    let config = sim.config().projectile.clone();
    let arena = sim.arena_mut();
    arena.spawn_projectile(squad[0], Vec2::new(305.0, 310.0), Vec2::X, 10.0, &config);
    arena.spawn_projectile(squad[0], Vec2::new(310.0, 315.0), Vec2::X, 10.0, &config);

    sim.step(&FrameInput::idle(DT));
    assert_eq!(sim.arena().enemies()[&enemy].health, 20.0);
    assert!(sim.arena().projectiles().values().all(|p| p.is_consumed()));

    // Spent projectiles are dropped and never hit again
    sim.step(&FrameInput::idle(DT));
    assert_eq!(sim.arena().enemies()[&enemy].health, 20.0);
    assert!(sim.arena().projectiles().is_empty());
}

#[test]
fn projectile_leaving_the_arena_is_dropped() {
    let (mut sim, squad) = playing_sim(quiet_config(), &[Vec2::new(600.0, 300.0)]);
    let config = sim.config().projectile.clone();
    sim.arena_mut()
        .spawn_projectile(squad[0], Vec2::new(1278.0, 300.0), Vec2::X, 10.0, &config);

    sim.step(&FrameInput::idle(DT));
    assert!(sim.arena().projectiles().is_empty());
}

#[test]
fn kill_rewards_wallet_and_levels_up_shooter() {
    let (mut sim, squad) = playing_sim(quiet_config(), &[Vec2::new(100.0, 100.0)]);
    let enemy = add_stationary_enemy(&mut sim, Vec2::new(150.0, 100.0), 10.0, 10.0, 30);

    for _ in 0..60 {
        sim.step(&FrameInput::idle(DT));
        if sim.arena().enemies().is_empty() {
            break;
        }
    }

    assert!(sim.arena().enemies().is_empty());
    let wallet = sim.wallet();
    assert_eq!(wallet.score, 30);
    assert_eq!(wallet.money, 30);

    let soldier = &sim.arena().soldiers()[&squad[0]];
    assert_eq!(soldier.level(), 1);
    assert_eq!(soldier.experience(), 30);
    assert_eq!(soldier.level_threshold(), 39);

    let events = sim.drain_events();
    assert!(events.contains(&GameEvent::EnemyKilled { id: enemy, reward: 30 }));
    assert!(events.contains(&GameEvent::LevelUp { id: squad[0], level: 1 }));

    // The reward buys a flare pack
    let flares = sim.inventory().flares;
    sim.step(&FrameInput::idle(DT).with_buy(ConsumableKind::Flare));
    assert_eq!(sim.inventory().flares, flares + 10);
    assert_eq!(sim.wallet().money, 20);
    assert_eq!(sim.wallet().score, 30);
}

// =============================================================================
// Consumables
// =============================================================================

#[test]
fn flare_dims_until_it_goes_out() {
    let (mut sim, _) = playing_sim(quiet_config(), &[Vec2::new(100.0, 100.0)]);
    let starting = sim.inventory().flares;

    sim.step(&FrameInput::idle(DT).with_click(Vec2::new(640.0, 300.0)));
    assert_eq!(sim.inventory().flares, starting - 1);
    let flare = sim.arena().flares().values().next().unwrap();
    assert!((flare.radius - 49.5).abs() < 1e-4);

    let mut frames = 1;
    while !sim.arena().flares().is_empty() {
        sim.step(&FrameInput::idle(DT));
        frames += 1;
        assert!(frames < 1000, "flare never went out");
    }
    // 50 * 0.99^n drops under 5 after about 230 frames
    assert!((228..=232).contains(&frames));
}

#[test]
fn click_outside_arena_is_ignored() {
    let (mut sim, _) = playing_sim(quiet_config(), &[Vec2::new(100.0, 100.0)]);
    let starting = sim.inventory().clone();

    sim.step(&FrameInput::idle(DT).with_click(Vec2::new(300.0, 10.0)));

    assert!(sim.arena().flares().is_empty());
    assert_eq!(sim.inventory(), &starting);
}

#[test]
fn grenade_damages_only_while_active() {
    let (mut sim, _) = playing_sim(quiet_config(), &[Vec2::new(100.0, 100.0)]);
    let enemy = add_stationary_enemy(&mut sim, Vec2::new(600.0, 300.0), 1000.0, 10.0, 5);
    let grenades = sim.inventory().grenades;

    sim.step(
        &FrameInput::idle(0.5)
            .with_select(ConsumableKind::Grenade)
            .with_click(Vec2::new(616.0, 316.0)),
    );
    assert_eq!(sim.inventory().grenades, grenades - 1);
    assert_eq!(sim.arena().enemies()[&enemy].health, 900.0);

    // A full second has passed: the blast is over
    sim.step(&FrameInput::idle(0.5));
    assert!(sim.arena().grenades().is_empty());
    assert_eq!(sim.arena().enemies()[&enemy].health, 900.0);
}

#[test]
fn flare_reveals_enemy_for_slow_fire() {
    let (mut sim, squad) = playing_sim(quiet_config(), &[Vec2::new(100.0, 100.0)]);
    add_stationary_enemy(&mut sim, Vec2::new(800.0, 300.0), 1000.0, 10.0, 5);

    // Out of range and dark: nothing to shoot at
    run_idle(&mut sim, 40);
    assert!(sim.arena().projectiles().is_empty());

    // Lit by a flare, the enemy becomes a target at the slow rate
    sim.step(&FrameInput::idle(DT).with_click(Vec2::new(816.0, 316.0)));
    assert_eq!(sim.arena().soldiers()[&squad[0]].state, SoldierState::Shooting);
    assert_eq!(sim.arena().projectiles().len(), 1);

    // The next revealed shot waits a full second
    run_idle(&mut sim, 40);
    let events = sim.drain_events();
    assert_eq!(
        count_events(&events, |e| matches!(e, GameEvent::ProjectileFired { .. })),
        1
    );
}

// =============================================================================
// Run End
// =============================================================================

#[test]
fn defeat_when_enemy_overruns_the_squad() {
    let (mut sim, squad) = playing_sim(quiet_config(), &[Vec2::new(600.0, 300.0)]);
    add_stationary_enemy(&mut sim, Vec2::new(610.0, 300.0), 1000.0, 200.0, 5);

    sim.step(&FrameInput::idle(DT));
    assert!(sim.arena().soldiers().is_empty());
    assert_eq!(sim.screen(), GameScreen::Playing);

    sim.step(&FrameInput::idle(DT));
    assert_eq!(sim.screen(), GameScreen::GameOver);
    let outcome = sim.outcome().unwrap();
    assert!(!outcome.victory);
    assert_eq!(outcome.final_score, 0);

    let events = sim.drain_events();
    assert!(events.contains(&GameEvent::SoldierDown { id: squad[0] }));
    assert_eq!(
        count_events(&events, |e| matches!(e, GameEvent::RunOver { victory: false, .. })),
        1
    );
}

#[test]
fn full_arena_ends_the_run_in_victory_once() {
    let mut config = GameConfig::default();
    // Every point is in range, so no spawn point is ever valid
    config.soldier.shooting_range = 1.0e6;
    let (mut sim, _) = playing_sim(config, &[Vec2::new(600.0, 300.0)]);

    sim.step(&FrameInput::idle(1.0));
    assert_eq!(sim.screen(), GameScreen::GameOver);
    assert!(sim.arena().enemies().is_empty());
    let outcome = sim.outcome().unwrap();
    assert!(outcome.victory);
    assert_eq!(outcome.alive_soldiers, 1);

    // Further frames are ignored off the Playing screen
    sim.step(&FrameInput::idle(1.0));
    let events = sim.drain_events();
    assert_eq!(count_events(&events, |e| *e == GameEvent::ArenaFull), 1);
    assert_eq!(
        count_events(&events, |e| matches!(e, GameEvent::RunOver { victory: true, .. })),
        1
    );
}

#[test]
fn finished_run_is_recorded_on_the_leaderboard() {
    let mut config = GameConfig::default();
    config.soldier.shooting_range = 1.0e6;
    let (mut sim, _) = playing_sim(config, &[Vec2::new(600.0, 300.0)]);
    sim.step(&FrameInput::idle(1.0));

    let mut board = Leaderboard::new();
    let record = sim
        .finish_run("  Ada Lovelace  ", &mut board)
        .unwrap()
        .unwrap();
    assert_eq!(record.name, "Ada Lovela");
    assert!(record.victory);
    assert_eq!(board.ranked().unwrap(), vec![record]);
    assert_eq!(sim.screen(), GameScreen::MainMenu);
}

#[test]
fn store_failure_still_resets_to_menu() {
    let mut config = GameConfig::default();
    config.soldier.shooting_range = 1.0e6;
    let (mut sim, _) = playing_sim(config, &[Vec2::new(600.0, 300.0)]);
    sim.step(&FrameInput::idle(1.0).with_click(Vec2::new(300.0, 300.0)));
    assert_eq!(sim.screen(), GameScreen::GameOver);
    assert_eq!(sim.arena().flares().len(), 1);

    let mut store = OfflineStore::default();
    let record = sim.finish_run("Ada", &mut store).unwrap();
    assert_eq!(store.attempts, 1);
    assert_eq!(record.map(|r| r.name), Some("Ada".to_string()));

    assert_eq!(sim.screen(), GameScreen::MainMenu);
    assert_eq!(sim.arena().entity_count(), 0);
    assert_eq!(sim.wallet(), Wallet::default());
    assert_eq!(sim.inventory().flares, sim.config().economy.starting_flares);
    assert!(sim.outcome().is_none());
    assert!(sim.drain_events().is_empty());
}

#[test]
fn blank_name_skips_the_store() {
    let (mut sim, squad) = playing_sim(quiet_config(), &[Vec2::new(600.0, 300.0)]);
    sim.arena_mut().soldier_mut(squad[0]).unwrap().health = 0.0;
    run_idle(&mut sim, 2);
    assert_eq!(sim.screen(), GameScreen::GameOver);

    let mut board = Leaderboard::new();
    assert_eq!(sim.finish_run("   ", &mut board).unwrap(), None);
    assert!(board.is_empty());
    assert_eq!(sim.screen(), GameScreen::MainMenu);
}

#[test]
fn new_run_after_reset_starts_clean() {
    let (mut sim, squad) = playing_sim(quiet_config(), &[Vec2::new(600.0, 300.0)]);
    sim.step(&FrameInput::idle(DT).with_click(Vec2::new(300.0, 300.0)));
    sim.arena_mut().soldier_mut(squad[0]).unwrap().health = 0.0;
    run_idle(&mut sim, 2);
    sim.finish_run("", &mut Leaderboard::new()).unwrap();

    sim.open_setup().unwrap();
    sim.place_soldier_at(Vec2::new(600.0, 300.0)).unwrap();
    sim.start_run().unwrap();
    assert_eq!(sim.frame(), 0);
    assert!(sim.arena().flares().is_empty());
    assert_eq!(sim.inventory().flares, sim.config().economy.starting_flares);
    assert!(sim.drain_events().is_empty());
}

#[test]
fn off_screen_step_is_a_no_op() {
    let mut sim = Simulation::new(quiet_config(), super::helpers::ARENA, 3).unwrap();
    sim.step(&FrameInput::idle(DT).with_pause_toggle());
    assert_eq!(sim.frame(), 0);
    assert!(!sim.is_paused());
}
