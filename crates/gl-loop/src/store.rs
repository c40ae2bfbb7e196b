//! File-backed high score store
//!
//! Stores `{ "high_score": n }` as JSON. All I/O errors are logged and
//! swallowed at the `HighScoreStore` boundary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collab::HighScoreStore;
use crate::error::StoreError;

const APP_DIR: &str = "Gem Loop";
const FILE_NAME: &str = "high_score.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// High score kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory
    pub fn in_data_dir() -> Result<Self, StoreError> {
        let dir = dirs::data_local_dir().ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(dir.join(APP_DIR).join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<u64, StoreError> {
        let text = fs::read_to_string(&self.path)?;
        let record: HighScoreRecord = serde_json::from_str(&text)?;
        Ok(record.high_score)
    }

    fn write(&self, score: u64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn load_high_score(&self) -> Option<u64> {
        match self.read() {
            Ok(score) => Some(score),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Failed to load high score from {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        if let Err(e) = self.write(score) {
            log::warn!("Failed to save high score to {:?}: {}", self.path, e);
        }
    }
}
