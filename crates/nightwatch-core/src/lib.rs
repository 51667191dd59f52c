//! # Nightwatch Core
//!
//! Simulation core for Nightwatch, a real-time arena defense game.
//!
//! A small squad of soldiers holds a dark arena against waves of enemies.
//! The player lights flares to reveal and repel enemies, throws grenades,
//! and spends kill rewards on more of both. The run is lost when every
//! soldier falls and won when the arena is so crowded no enemy can spawn.
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): soldiers, enemies, projectiles, flares, grenades
//! - **Arena** ([`arena`]): per-family rosters in id order
//! - **Index** ([`index`]): two quadtree generations, swapped every frame
//! - **Systems** ([`systems`]): the per-frame pipeline steps
//! - **Simulation** ([`simulation`]): screens, setup, the frame loop, scoring
//!
//! Rendering, input polling, menus and persistent storage belong to the
//! host. It feeds one [`FrameInput`] per frame, reads the rosters to draw
//! and drains [`GameEvent`]s for effects.
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use gloom::Rect;
//! use nightwatch_core::{FrameInput, GameConfig, Simulation};
//!
//! let mut sim = Simulation::new(GameConfig::default(), Rect::new(0.0, 36.0, 1280.0, 576.0), 1)
//!     .unwrap();
//! sim.open_setup().unwrap();
//! sim.place_soldier_at(Vec2::new(600.0, 300.0)).unwrap();
//! sim.start_run().unwrap();
//!
//! sim.step(&FrameInput::idle(1.0 / 60.0).with_click(Vec2::new(400.0, 300.0)));
//! assert_eq!(sim.arena().flares().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export gloom for spatial queries
pub use gloom;

pub mod arena;
pub mod config;
pub mod economy;
pub mod entity;
pub mod error;
pub mod events;
pub mod index;
pub mod input;
pub mod scoring;
pub mod simulation;
pub mod systems;
pub mod targeting;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use config::GameConfig;
pub use entity::{EntityId, EntityTag};
pub use error::{ConfigError, SessionError, StoreError};
pub use events::GameEvent;
pub use index::FrameIndex;
pub use input::FrameInput;
pub use scoring::{Leaderboard, ScoreRecord, ScoreStore};
pub use simulation::{GameScreen, RunOutcome, Simulation};
