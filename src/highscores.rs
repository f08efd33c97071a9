//! Square Shooter leaderboard
//!
//! Top 10 scores plus the highest level ever reached, persisted through a
//! [`KeyValueStore`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::storage::{KeyValueStore, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level the run ended on
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    /// Highest level reached in any run
    #[serde(default)]
    pub max_level: u32,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "shooter_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Record a finished run
    ///
    /// The level record is kept even when the score doesn't make the table.
    /// Returns the rank achieved (1-indexed).
    pub fn record(&mut self, score: u64, level: u32, timestamp: f64) -> Option<usize> {
        self.max_level = self.max_level.max(level);
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp,
        };

        // Sorted descending by score; ties keep the older entry first
        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from the store; missing or unreadable data gives an empty table
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<HighScores>(store, Self::STORAGE_KEY) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Ignoring saved high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
    }

    #[test]
    fn test_record_sorts_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(10, 2, 1.0), Some(1));
        assert_eq!(scores.record(30, 4, 2.0), Some(1));
        assert_eq!(scores.record(20, 3, 3.0), Some(2));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![30, 20, 10]);
        assert_eq!(scores.top_score(), Some(30));
        assert_eq!(scores.max_level, 4);
    }

    #[test]
    fn test_table_is_capped() {
        let mut scores = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u64 {
            scores.record(s * 10, 1, 0.0);
        }
        assert!(!scores.qualifies(10));
        assert!(scores.qualifies(15));
        assert_eq!(scores.record(5, 9, 0.0), None);
        assert_eq!(scores.max_level, 9, "level record survives a low score");
        scores.record(1000, 1, 0.0);
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().unwrap().score, 20);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_save_and_load() {
        use crate::platform::storage::FileStore;

        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::with_root(dir.path());
        assert!(HighScores::load(&store).is_empty());

        let mut scores = HighScores::new();
        scores.record(42, 5, 123.0);
        scores.save(&store).unwrap();

        let loaded = HighScores::load(&store);
        assert_eq!(loaded, scores);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_corrupt_file_starts_fresh() {
        use crate::platform::storage::FileStore;

        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::with_root(dir.path());
        store.set(HighScores::STORAGE_KEY, "[1, 2").unwrap();
        assert!(HighScores::load(&store).is_empty());
    }
}
