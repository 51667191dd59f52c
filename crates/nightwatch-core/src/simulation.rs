//! Session orchestrator and frame loop.
//!
//! `Simulation` owns everything a session needs: balance config, rosters,
//! the double-buffered index, inventory, wallet, the seeded RNG and the
//! current screen. The host drives it with one [`FrameInput`] per frame and
//! calls the setup and menu actions as the player navigates.
//!
//! # Frame order
//!
//! While [`GameScreen::Playing`] and not paused, [`Simulation::step`]:
//!
//! 1. swaps the index generations and clears the new current one
//! 2. places the selected consumable at a click
//! 3. dims flares, ages grenades, flies projectiles
//! 4. spawns an enemy when the timer is due
//! 5. moves enemies and resolves their overlaps
//! 6. removes dead enemies (crediting rewards) and dead soldiers
//! 7. runs soldier melee and shooting
//!
//! # Determinism
//!
//! All randomness comes from one `ChaCha8Rng` seeded in [`Simulation::new`],
//! ids are monotonic and rosters iterate in id order. The same seed and the
//! same inputs give the same session.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use gloom::Rect;
//! use nightwatch_core::config::GameConfig;
//! use nightwatch_core::input::FrameInput;
//! use nightwatch_core::simulation::{GameScreen, Simulation};
//!
//! let arena = Rect::new(0.0, 36.0, 1280.0, 576.0);
//! let mut sim = Simulation::new(GameConfig::default(), arena, 42).unwrap();
//!
//! sim.open_setup().unwrap();
//! sim.place_soldiers_randomly(2).unwrap();
//! sim.start_run().unwrap();
//!
//! for _ in 0..120 {
//!     sim.step(&FrameInput::idle(1.0 / 60.0));
//! }
//!
//! assert!(matches!(sim.screen(), GameScreen::Playing | GameScreen::GameOver));
//! assert!(sim.frame() <= 120);
//! ```

use std::fmt;

use glam::Vec2;
use gloom::{Quadtree, Rect};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::arena::Arena;
use crate::config::GameConfig;
use crate::economy::{self, Inventory, Wallet};
use crate::entity::{ConsumableKind, EntityId, EntityTag};
use crate::error::{ConfigError, SessionError};
use crate::events::GameEvent;
use crate::index::FrameIndex;
use crate::input::FrameInput;
use crate::scoring::{self, ScoreRecord, ScoreStore};
use crate::systems::{self, SpawnOutcome, SpawnTimer};

/// Screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameScreen {
    /// Title menu
    #[default]
    MainMenu,
    /// Choosing and placing the squad
    SetupGame,
    /// A run in progress
    Playing,
    /// A run has ended and awaits the player's name
    GameOver,
    /// Ranked records
    Leaderboard,
    /// Instructions
    HowToPlay,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// True when the arena filled up
    pub victory: bool,
    /// Score before the survivor multiplier
    pub score: u64,
    /// Score after the survivor multiplier
    pub final_score: u64,
    /// Soldiers alive at the end
    pub alive_soldiers: usize,
}

/// One game session.
pub struct Simulation {
    config: GameConfig,
    seed: u64,
    rng: ChaCha8Rng,
    screen: GameScreen,
    arena: Arena,
    index: FrameIndex,
    spawn_timer: SpawnTimer,
    inventory: Inventory,
    wallet: Wallet,
    game_time: f32,
    frame: u64,
    paused: bool,
    victory: bool,
    outcome: Option<RunOutcome>,
    events: Vec<GameEvent>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("seed", &self.seed)
            .field("screen", &self.screen)
            .field("frame", &self.frame)
            .field("game_time", &self.game_time)
            .field("soldiers", &self.arena.soldiers().len())
            .field("enemies", &self.arena.enemies().len())
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a session on the main menu.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config fails validation or the arena
    /// rectangle cannot back a spatial index.
    pub fn new(config: GameConfig, arena: Rect, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let index = FrameIndex::new(arena, &config.index)?;
        info!(seed, ?arena, "session created");
        Ok(Self {
            inventory: Inventory::starting(&config.economy),
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            screen: GameScreen::MainMenu,
            arena: Arena::new(arena),
            index,
            spawn_timer: SpawnTimer::new(),
            wallet: Wallet::default(),
            game_time: 0.0,
            frame: 0,
            paused: false,
            victory: false,
            outcome: None,
            events: Vec::new(),
        })
    }

    /// Returns the seed the session was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Balance config.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current screen.
    #[must_use]
    pub fn screen(&self) -> GameScreen {
        self.screen
    }

    /// Entity rosters.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable entity rosters.
    ///
    /// Entities added here take part from the next frame on.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The double-buffered spatial index.
    #[must_use]
    pub fn index(&self) -> &FrameIndex {
        &self.index
    }

    /// Consumables on hand.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Score and currency.
    #[must_use]
    pub fn wallet(&self) -> Wallet {
        self.wallet
    }

    /// Seconds of unpaused play this run.
    #[must_use]
    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    /// Simulated frames this run.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Check if the run is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Outcome of the last finished run, until the session is reset.
    #[must_use]
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn expect_screen(&self, expected: GameScreen) -> Result<(), SessionError> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(SessionError::WrongScreen {
                expected,
                actual: self.screen,
            })
        }
    }

    // -------------------------------------------------------------------------
    // Menus
    // -------------------------------------------------------------------------

    /// Main menu → squad setup.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongScreen`] off the main menu.
    pub fn open_setup(&mut self) -> Result<(), SessionError> {
        self.expect_screen(GameScreen::MainMenu)?;
        self.screen = GameScreen::SetupGame;
        Ok(())
    }

    /// Main menu → leaderboard.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongScreen`] off the main menu.
    pub fn open_leaderboard(&mut self) -> Result<(), SessionError> {
        self.expect_screen(GameScreen::MainMenu)?;
        self.screen = GameScreen::Leaderboard;
        Ok(())
    }

    /// Main menu → instructions.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongScreen`] off the main menu.
    pub fn open_how_to_play(&mut self) -> Result<(), SessionError> {
        self.expect_screen(GameScreen::MainMenu)?;
        self.screen = GameScreen::HowToPlay;
        Ok(())
    }

    /// Return to the main menu from setup, leaderboard or instructions.
    ///
    /// Leaving setup discards the placed squad.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongScreen`] during or after a run; a run is
    /// left through [`Simulation::finish_run`].
    pub fn back_to_menu(&mut self) -> Result<(), SessionError> {
        match self.screen {
            GameScreen::SetupGame => {
                self.arena.clear();
                self.screen = GameScreen::MainMenu;
                Ok(())
            }
            GameScreen::Leaderboard | GameScreen::HowToPlay | GameScreen::MainMenu => {
                self.screen = GameScreen::MainMenu;
                Ok(())
            }
            GameScreen::Playing | GameScreen::GameOver => Err(SessionError::WrongScreen {
                expected: GameScreen::MainMenu,
                actual: self.screen,
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Replace the squad with `count` soldiers at random non-overlapping
    /// positions inside the arena, keeping the configured margin from the
    /// edges.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSoldierCount`] for a count outside the
    /// allowed range and [`SessionError::NoRoom`] when the attempts run out;
    /// in that case no soldiers are left placed.
    pub fn place_soldiers_randomly(&mut self, count: usize) -> Result<Vec<EntityId>, SessionError> {
        self.expect_screen(GameScreen::SetupGame)?;
        let max = self.config.setup.max_soldiers;
        if count == 0 || count > max {
            return Err(SessionError::InvalidSoldierCount {
                requested: count,
                max,
            });
        }

        let bounds = self.arena.bounds();
        let area = bounds
            .inset(self.config.setup.placement_margin)
            .unwrap_or(bounds);
        let mut scratch: Quadtree<EntityTag> =
            Quadtree::new(self.config.index.quadtree(bounds))?;
        let size = self.config.soldier.size;

        self.arena.soldiers.clear();
        let mut placed = Vec::with_capacity(count);
        let mut attempts = 0;
        while placed.len() < count {
            if attempts >= self.config.setup.placement_attempts {
                self.arena.soldiers.clear();
                warn!(placed = placed.len(), requested = count, "ran out of room placing soldiers");
                return Err(SessionError::NoRoom {
                    placed: placed.len(),
                    requested: count,
                });
            }
            attempts += 1;

            let position = Vec2::new(
                self.rng.gen_range(area.x..area.right()),
                self.rng.gen_range(area.y..area.bottom()),
            );
            let footprint = Rect::from_origin_size(position, size);
            if scratch.any_intersecting(&footprint) {
                continue;
            }
            let id = self.arena.spawn_soldier(position, &self.config.soldier);
            scratch.insert(id.as_u64(), footprint, EntityTag::Soldier);
            placed.push(id);
        }

        debug!(count, attempts, "squad placed");
        Ok(placed)
    }

    /// Add one soldier at a clicked point.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SquadFull`], [`SessionError::OutsideArena`] or
    /// [`SessionError::Occupied`] when the soldier cannot go there.
    pub fn place_soldier_at(&mut self, position: Vec2) -> Result<EntityId, SessionError> {
        self.expect_screen(GameScreen::SetupGame)?;
        let max = self.config.setup.max_soldiers;
        if self.arena.soldiers().len() >= max {
            return Err(SessionError::SquadFull(max));
        }
        if !self.arena.bounds().contains_point(position) {
            return Err(SessionError::OutsideArena(position));
        }
        let footprint = Rect::from_origin_size(position, self.config.soldier.size);
        if self
            .arena
            .soldiers()
            .values()
            .any(|soldier| soldier.bounds().intersects(&footprint))
        {
            return Err(SessionError::Occupied(position));
        }
        Ok(self.arena.spawn_soldier(position, &self.config.soldier))
    }

    /// Begin a run with the placed squad.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSoldiers`] without a squad.
    pub fn start_run(&mut self) -> Result<(), SessionError> {
        self.expect_screen(GameScreen::SetupGame)?;
        if self.arena.soldiers().is_empty() {
            return Err(SessionError::NoSoldiers);
        }

        self.reset_run_state();
        // The first swap turns this into the previous generation, so the
        // first frame's spawn and melee checks see the squad.
        for (id, soldier) in self.arena.soldiers() {
            self.index.insert(*id, soldier.bounds(), EntityTag::Soldier);
        }
        self.screen = GameScreen::Playing;
        info!(soldiers = self.arena.soldiers().len(), "run started");
        Ok(())
    }

    fn reset_run_state(&mut self) {
        self.arena.enemies.clear();
        self.arena.projectiles.clear();
        self.arena.flares.clear();
        self.arena.grenades.clear();
        self.index.clear();
        self.spawn_timer = SpawnTimer::new();
        self.inventory = Inventory::starting(&self.config.economy);
        self.wallet = Wallet::default();
        self.game_time = 0.0;
        self.frame = 0;
        self.paused = false;
        self.victory = false;
        self.outcome = None;
    }

    // -------------------------------------------------------------------------
    // Frame loop
    // -------------------------------------------------------------------------

    /// Run one frame.
    ///
    /// Does nothing off the Playing screen. Selection, quick-buy and pause
    /// are handled even while paused; a paused frame skips the whole
    /// pipeline, including the index swap.
    pub fn step(&mut self, input: &FrameInput) {
        if self.screen != GameScreen::Playing {
            return;
        }

        if input.toggle_pause {
            self.paused = !self.paused;
            debug!(paused = self.paused, "pause toggled");
        }
        if let Some(kind) = input.select {
            self.inventory.select(kind);
        }
        if let Some(kind) = input.buy {
            self.buy(kind);
        }

        if self.arena.soldiers().is_empty() {
            self.end_run(false);
            return;
        }
        if self.paused {
            return;
        }

        self.index.swap();
        self.game_time += input.dt;
        self.frame += 1;

        if let Some(click) = input.click {
            systems::use_consumable(
                &mut self.arena,
                &mut self.inventory,
                click,
                &self.config,
                &mut self.events,
            );
        }
        systems::process_flares(&mut self.arena, &mut self.index);
        systems::process_grenades(&mut self.arena, &mut self.index, input.dt);
        systems::process_projectiles(&mut self.arena, &mut self.index);

        if self
            .spawn_timer
            .tick(input.dt, self.game_time, &self.config.spawning)
        {
            self.spawn();
        }

        let revealed = systems::process_enemies(
            &mut self.arena,
            &mut self.index,
            &self.config.soldier,
            &mut self.events,
        );
        systems::cleanup_dead_enemies(&mut self.arena, &mut self.wallet, &mut self.events);
        systems::cleanup_dead_soldiers(&mut self.arena, &mut self.events);
        systems::process_soldiers(
            &mut self.arena,
            &mut self.index,
            &revealed,
            input.dt,
            &self.config.projectile,
            &mut self.events,
        );

        if self.victory {
            self.end_run(true);
        }
    }

    fn spawn(&mut self) {
        match systems::spawn_enemy(
            &mut self.arena,
            &self.index,
            &self.config,
            self.game_time,
            &mut self.rng,
        ) {
            SpawnOutcome::Spawned(id) => {
                if let Some(enemy) = self.arena.enemies().get(&id) {
                    self.events.push(GameEvent::EnemySpawned {
                        id,
                        kind: enemy.kind(),
                        position: enemy.position,
                    });
                }
            }
            SpawnOutcome::ArenaFull { .. } => {
                if !self.victory {
                    self.victory = true;
                    self.events.push(GameEvent::ArenaFull);
                }
            }
        }
    }

    fn end_run(&mut self, victory: bool) {
        let alive_soldiers = self.arena.soldiers().len();
        let outcome = RunOutcome {
            victory,
            score: self.wallet.score,
            final_score: scoring::final_score(
                self.wallet.score,
                alive_soldiers,
                self.config.scoring.alive_soldier_base,
            ),
            alive_soldiers,
        };
        self.outcome = Some(outcome);
        self.screen = GameScreen::GameOver;
        self.events.push(GameEvent::RunOver {
            victory,
            elapsed: self.game_time,
        });
        info!(
            victory,
            score = outcome.final_score,
            elapsed = self.game_time,
            "run over"
        );
    }

    /// Buy one pack of `kind` from the shop.
    ///
    /// Returns `false` when the wallet cannot cover it or no run is active.
    pub fn buy(&mut self, kind: ConsumableKind) -> bool {
        if self.screen != GameScreen::Playing {
            return false;
        }
        economy::buy(
            kind,
            &mut self.wallet,
            &mut self.inventory,
            &self.config.economy,
        )
    }

    /// Score with the survivor multiplier applied to the current squad.
    #[must_use]
    pub fn final_score(&self) -> u64 {
        scoring::final_score(
            self.wallet.score,
            self.arena.soldiers().len(),
            self.config.scoring.alive_soldier_base,
        )
    }

    // -------------------------------------------------------------------------
    // Run end and arena changes
    // -------------------------------------------------------------------------

    /// Submit the finished run under `name`, reset and return to the menu.
    ///
    /// A blank name skips saving. A store failure is logged and does not
    /// keep the session on the game-over screen. Returns the record handed
    /// to the store, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongScreen`] unless a run has just ended.
    pub fn finish_run(
        &mut self,
        name: &str,
        store: &mut dyn ScoreStore,
    ) -> Result<Option<ScoreRecord>, SessionError> {
        self.expect_screen(GameScreen::GameOver)?;

        let record = scoring::sanitize_name(name, self.config.scoring.max_name_length).map(|name| {
            ScoreRecord {
                name,
                score: self.final_score(),
                elapsed: self.game_time,
                victory: self.victory,
            }
        });

        if let Some(record) = &record {
            match store.record(record.clone()) {
                Ok(()) => info!(name = %record.name, score = record.score, "score saved"),
                Err(err) => error!(%err, name = %record.name, "failed to save score"),
            }
        }

        self.reset();
        Ok(record)
    }

    /// Drop every entity and run statistic and go back to the main menu.
    pub fn reset(&mut self) {
        self.reset_run_state();
        self.arena.clear();
        self.events.clear();
        self.screen = GameScreen::MainMenu;
    }

    /// Move the arena to `bounds` and rebuild the index for it.
    ///
    /// Entities keep their positions; anything now outside the arena is
    /// dropped by the index until it moves back in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Index`] and keeps the old arena when the
    /// new rectangle is unusable.
    pub fn resize_arena(&mut self, bounds: Rect) -> Result<(), SessionError> {
        self.index.rebuild(bounds)?;
        self.arena.bounds = bounds;
        if self.screen == GameScreen::Playing {
            for (id, soldier) in self.arena.soldiers() {
                self.index.insert(*id, soldier.bounds(), EntityTag::Soldier);
            }
        }
        info!(?bounds, "arena resized");
        Ok(())
    }
}
