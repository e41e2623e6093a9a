//! High-score persistence
//!
//! The simulation only decides *whether* a record occurred; reading and
//! writing the stored value lives behind `HighScoreStore` so storage
//! failures can never affect an episode.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Narrow interface the game loop talks to
pub trait HighScoreStore {
    /// The best score on record
    fn high_score(&self) -> u32;

    /// Accept a new score; returns true if it set a new record.
    /// Storage failures are non-fatal and only logged.
    fn update(&mut self, score: u32) -> bool;
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// File-backed store keeping the record in a small JSON file.
/// A missing or unreadable file reads as zero.
pub struct FileHighScoreStore {
    path: PathBuf,
    cached: u32,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = match Self::load(&path) {
            Ok(score) => score,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read high score, starting at 0");
                0
            }
        };
        Self { path, cached }
    }

    fn load(path: &Path) -> Result<u32> {
        if !path.exists() {
            return Ok(0);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let record: HighScoreRecord =
            serde_json::from_str(&contents).context("failed to parse high score file")?;
        Ok(record.high_score)
    }

    fn save(&self) -> Result<()> {
        let record = HighScoreRecord {
            high_score: self.cached,
        };
        let json = serde_json::to_string_pretty(&record).context("failed to serialize record")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn high_score(&self) -> u32 {
        self.cached
    }

    fn update(&mut self, score: u32) -> bool {
        if score <= self.cached {
            return false;
        }
        self.cached = score;
        if let Err(err) = self.save() {
            warn!(error = %err, "failed to persist high score");
        }
        true
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    best: u32,
}

impl MemoryHighScoreStore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn high_score(&self) -> u32 {
        self.best
    }

    fn update(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}
