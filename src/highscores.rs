//! High score persistence
//!
//! A single best score, durable across sessions. Native builds keep it in a
//! JSON file; wasm32 builds keep it in LocalStorage.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::persistence;

/// Persistence service for the best score
pub trait HighScoreStore {
    fn high_score(&self) -> u64;
    fn set_high_score(&mut self, score: u64);
}

/// Persisted high-score payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub best: u64,
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    record: HighScoreRecord,
}

impl MemoryHighScores {
    pub fn with_score(best: u64) -> Self {
        Self {
            record: HighScoreRecord { best },
        }
    }
}

impl HighScoreStore for MemoryHighScores {
    fn high_score(&self) -> u64 {
        self.record.best
    }

    fn set_high_score(&mut self, score: u64) {
        self.record.best = score;
    }
}

/// JSON file store (versioned envelope with backup rotation)
#[derive(Debug, Clone)]
pub struct FileHighScores {
    path: PathBuf,
    record: HighScoreRecord,
}

impl FileHighScores {
    /// Open the store at `path`; a missing or unreadable file starts at 0
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = match persistence::load::<HighScoreRecord>(&path) {
            Ok(record) => {
                log::info!("Loaded high score {} from {}", record.best, path.display());
                record
            }
            Err(err) => {
                log::info!("No high score at {} ({err}), starting fresh", path.display());
                HighScoreRecord::default()
            }
        };
        Self { path, record }
    }
}

impl HighScoreStore for FileHighScores {
    fn high_score(&self) -> u64 {
        self.record.best
    }

    fn set_high_score(&mut self, score: u64) {
        self.record.best = score;
        if let Err(err) = persistence::save(&self.path, &self.record) {
            log::warn!("Failed to save high score: {err}");
        }
    }
}

/// LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageHighScores {
    record: HighScoreRecord,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageHighScores {
    const STORAGE_KEY: &'static str = "slice_rush_hiscore";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    pub fn load() -> Self {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(record) = persistence::decode::<HighScoreRecord>(&json) {
                    log::info!("Loaded high score {}", record.best);
                    return Self { record };
                }
            }
        }

        log::info!("No high score found, starting fresh");
        Self::default()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageHighScores {
    fn high_score(&self) -> u64 {
        self.record.best
    }

    fn set_high_score(&mut self, score: u64) {
        self.record.best = score;
        if let (Some(storage), Ok(json)) = (Self::storage(), persistence::encode(&self.record)) {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryHighScores::default();
        assert_eq!(store.high_score(), 0);
        store.set_high_score(120);
        assert_eq!(store.high_score(), 120);
        assert_eq!(MemoryHighScores::with_score(7).high_score(), 7);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("slice-rush-hs-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("hiscore.json");

        let mut store = FileHighScores::open(&path);
        assert_eq!(store.high_score(), 0);
        store.set_high_score(345);

        let reopened = FileHighScores::open(&path);
        assert_eq!(reopened.high_score(), 345);
    }
}
