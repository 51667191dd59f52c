//! Error types for the session surface.
//!
//! The frame step itself never fails: dropped index entries and empty target
//! searches are ordinary outcomes there. Errors only come from configuration,
//! setup actions issued on the wrong screen, and the score store.

use glam::Vec2;
use gloom::QuadtreeError;
use thiserror::Error;

use crate::simulation::GameScreen;

/// Configuration could not be loaded or is out of range.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON did not parse into a [`crate::config::GameConfig`].
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A tunable is outside the range the simulation can run with.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What the value must satisfy
        reason: &'static str,
    },
    /// The spatial index rejected its configuration.
    #[error("spatial index: {0}")]
    Index(#[from] QuadtreeError),
}

/// A session action was not valid in the current state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The action belongs to another screen.
    #[error("action requires the {expected:?} screen, but the session is on {actual:?}")]
    WrongScreen {
        /// Screen the action needs
        expected: GameScreen,
        /// Screen the session is on
        actual: GameScreen,
    },
    /// Soldier count outside `1..=max`.
    #[error("soldier count {requested} is outside 1..={max}")]
    InvalidSoldierCount {
        /// Requested count
        requested: usize,
        /// Largest allowed count
        max: usize,
    },
    /// Random placement ran out of attempts.
    #[error("placed only {placed} of {requested} soldiers before running out of room")]
    NoRoom {
        /// Soldiers placed before giving up
        placed: usize,
        /// Soldiers asked for
        requested: usize,
    },
    /// A click placement landed on another soldier.
    #[error("position {0} overlaps an existing soldier")]
    Occupied(Vec2),
    /// A click placement landed outside the arena.
    #[error("position {0} is outside the arena")]
    OutsideArena(Vec2),
    /// The squad is already at its maximum size.
    #[error("squad already has the maximum of {0} soldiers")]
    SquadFull(usize),
    /// A run cannot start without soldiers.
    #[error("a run needs at least one soldier")]
    NoSoldiers,
    /// The new arena rectangle is unusable.
    #[error("arena resize rejected: {0}")]
    Index(#[from] QuadtreeError),
}

/// The score store could not complete a request.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store is not reachable.
    #[error("score store unavailable: {0}")]
    Unavailable(String),
    /// The record could not be encoded or decoded.
    #[error("score record encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}
