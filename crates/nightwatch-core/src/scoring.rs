//! Run records and the score store seam.
//!
//! The session hands a [`ScoreRecord`] to whatever [`ScoreStore`] the host
//! provides. [`Leaderboard`] is the in-memory store used by tests and the
//! soak driver; a host with real persistence implements the trait itself.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Outcome of one finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Player name
    pub name: String,
    /// Final score, survivor multiplier applied
    pub score: u64,
    /// Game time in seconds
    pub elapsed: f32,
    /// True when the run ended with a full arena
    pub victory: bool,
}

/// Where finished runs go.
pub trait ScoreStore {
    /// Save a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record could not be saved.
    fn record(&mut self, record: ScoreRecord) -> Result<(), StoreError>;

    /// All records, highest score first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the records could not be read.
    fn ranked(&self) -> Result<Vec<ScoreRecord>, StoreError>;
}

/// In-memory store kept sorted by score, descending.
///
/// Equal scores keep submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    /// Create an empty leaderboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records, highest score first.
    #[must_use]
    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    /// Check if the leaderboard is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest recorded score.
    #[must_use]
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore a leaderboard from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encoding`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let mut board: Self = serde_json::from_str(json)?;
        board.entries.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(board)
    }

    /// Serialize the leaderboard to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encoding`] if serialization fails.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl ScoreStore for Leaderboard {
    fn record(&mut self, record: ScoreRecord) -> Result<(), StoreError> {
        let pos = self
            .entries
            .iter()
            .position(|e| record.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, record);
        Ok(())
    }

    fn ranked(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(self.entries.clone())
    }
}

/// Score multiplied by `base` once per surviving soldier.
#[must_use]
pub fn final_score(score: u64, alive_soldiers: usize, base: u64) -> u64 {
    let exponent = u32::try_from(alive_soldiers).unwrap_or(u32::MAX);
    score.saturating_mul(base.saturating_pow(exponent))
}

/// Trim a player name and cap it at `max_chars` characters.
///
/// Returns `None` for a blank name; such runs are not recorded.
#[must_use]
pub fn sanitize_name(name: &str, max_chars: usize) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_chars).collect())
}
