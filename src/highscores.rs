//! High score leaderboard
//!
//! Two records are kept: the best score as a bare integer and the top 10
//! finished runs as a JSON list.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage, StorageError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Storage key of the leaderboard list
pub const SCORES_KEY: &str = "spaceShooterScores";
/// Storage key of the best score
pub const BEST_SCORE_KEY: &str = "spaceShooterHighScore";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Wave reached
    pub wave: u32,
    /// Unix timestamp (ms) of the run's end
    pub timestamp: f64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a finished run. Every run is inserted, zero scores included;
    /// ties land after the existing entries.
    /// Returns the rank achieved (1-indexed) or None if it fell off the board.
    pub fn record(&mut self, score: u64, wave: u32, timestamp: f64) -> Option<usize> {
        let entry = HighScoreEntry {
            score,
            wave,
            timestamp,
        };

        let index = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        (index < MAX_HIGH_SCORES).then_some(index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard. A missing or malformed value yields an empty board.
    pub fn load(storage: &dyn Storage) -> Self {
        match persistence::load_json::<HighScores>(storage, SCORES_KEY) {
            Ok(Some(mut scores)) => {
                scores.normalize();
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => Self::new(),
            Err(e) => {
                log::warn!("Discarding stored high scores: {e}");
                Self::new()
            }
        }
    }

    pub fn save(&self, storage: &dyn Storage) -> Result<(), StorageError> {
        persistence::save_json(storage, SCORES_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Sort and cap a list that came from outside
    fn normalize(&mut self) {
        // Stable: equal scores keep their stored order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}

/// Best score on record, 0 when missing or unreadable
pub fn best_score(storage: &dyn Storage) -> u64 {
    match storage.get_item(BEST_SCORE_KEY) {
        Ok(Some(value)) => value.trim().parse().unwrap_or(0),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Could not read best score: {e}");
            0
        }
    }
}

pub fn save_best_score(storage: &dyn Storage, score: u64) -> Result<(), StorageError> {
    storage.set_item(BEST_SCORE_KEY, &score.to_string())
}

/// Persist a finished run: the leaderboard always, the best score when beaten.
/// Returns the leaderboard rank.
pub fn record_run(
    storage: &dyn Storage,
    score: u64,
    wave: u32,
    timestamp: f64,
) -> Result<Option<usize>, StorageError> {
    if score > best_score(storage) {
        save_best_score(storage, score)?;
    }
    let mut scores = HighScores::load(storage);
    let rank = scores.record(score, wave, timestamp);
    scores.save(storage)?;
    Ok(rank)
}

/// Calendar label for a leaderboard row, `month` 1-based
pub fn date_label(year: u32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Local calendar date of a timestamp (ms)
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
    date_label(date.get_full_year(), date.get_month() + 1, date.get_date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_record_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(100, 2, 0.0), Some(1));
        assert_eq!(scores.record(300, 4, 1.0), Some(1));
        assert_eq!(scores.record(200, 3, 2.0), Some(2));
        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_ties_go_after_existing() {
        let mut scores = HighScores::new();
        scores.record(50, 1, 1.0);
        assert_eq!(scores.record(50, 2, 2.0), Some(2));
        assert_eq!(scores.entries[0].timestamp, 1.0);
    }

    #[test]
    fn test_zero_score_is_recorded() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(0, 1, 0.0), Some(1));
        assert_eq!(scores.entries.len(), 1);
    }

    #[test]
    fn test_truncates_to_ten() {
        let mut scores = HighScores::new();
        for i in 1..=10 {
            scores.record(i * 10, 1, 0.0);
        }
        assert_eq!(scores.record(5, 1, 0.0), None);
        assert_eq!(scores.record(55, 1, 0.0), Some(6));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let storage = MemoryStorage::new();
        let mut scores = HighScores::new();
        for (i, s) in [40, 90, 10, 70].into_iter().enumerate() {
            scores.record(s, i as u32 + 1, i as f64);
        }
        scores.save(&storage).unwrap();

        let loaded = HighScores::load(&storage);
        assert_eq!(loaded, scores);
        let values: Vec<u64> = loaded.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![90, 70, 40, 10]);
    }

    #[test]
    fn test_stored_format_is_plain_list() {
        let storage = MemoryStorage::new();
        let mut scores = HighScores::new();
        scores.record(10, 2, 5.0);
        scores.save(&storage).unwrap();
        let json = storage.get_item(SCORES_KEY).unwrap().unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"wave\":2"));
    }

    #[test]
    fn test_load_sorts_and_caps_foreign_list() {
        let storage = MemoryStorage::new();
        let list: Vec<HighScoreEntry> = (0..15)
            .map(|i| HighScoreEntry {
                score: i,
                wave: 1,
                timestamp: 0.0,
            })
            .collect();
        persistence::save_json(&storage, SCORES_KEY, &list).unwrap();

        let loaded = HighScores::load(&storage);
        assert_eq!(loaded.entries.len(), 10);
        assert_eq!(loaded.top_score(), Some(14));
    }

    #[test]
    fn test_malformed_list_degrades_to_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(SCORES_KEY, "not json").unwrap();
        assert!(HighScores::load(&storage).is_empty());
        assert!(HighScores::load(&MemoryStorage::new()).is_empty());
    }

    #[test]
    fn test_best_score() {
        let storage = MemoryStorage::new();
        assert_eq!(best_score(&storage), 0);
        storage.set_item(BEST_SCORE_KEY, "garbage").unwrap();
        assert_eq!(best_score(&storage), 0);
        save_best_score(&storage, 1234).unwrap();
        assert_eq!(best_score(&storage), 1234);
    }

    #[test]
    fn test_date_label_is_zero_padded() {
        assert_eq!(date_label(2026, 3, 7), "2026-03-07");
        assert_eq!(date_label(1999, 12, 31), "1999-12-31");
    }

    #[test]
    fn test_record_run_updates_both_keys() {
        let storage = MemoryStorage::new();
        assert_eq!(record_run(&storage, 500, 4, 1.0).unwrap(), Some(1));
        assert_eq!(record_run(&storage, 200, 2, 2.0).unwrap(), Some(2));
        assert_eq!(best_score(&storage), 500);
        assert_eq!(HighScores::load(&storage).entries.len(), 2);
    }
}
