//! High score leaderboard
//!
//! Ranks finished runs by the level reached. Kept as JSON on disk; top 10.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Level the run ended on
    pub level: u32,
    /// Seed the run was played with
    pub seed: u64,
    /// Unix timestamp (seconds) when recorded
    pub timestamp: u64,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a level qualifies for the leaderboard
    pub fn qualifies(&self, level: u32) -> bool {
        if level == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| level > e.level).unwrap_or(true)
    }

    /// Rank a level would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, level: u32) -> Option<usize> {
        if !self.qualifies(level) {
            return None;
        }
        let rank = self.entries.iter().position(|e| level > e.level);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_run(&mut self, level: u32, seed: u64, timestamp: u64) -> Option<usize> {
        let rank = self.potential_rank(level)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                level,
                seed,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best level reached (if any)
    pub fn best_level(&self) -> Option<u32> {
        self.entries.first().map(|e| e.level)
    }

    /// Load the leaderboard; a missing or unreadable file starts fresh
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<HighScores>(path) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("{}; starting fresh", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_json(path, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
