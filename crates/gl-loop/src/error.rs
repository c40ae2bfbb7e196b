//! Error types for the gem loop engine

use thiserror::Error;

/// Reason an engine operation was refused.
///
/// A rejected operation leaves the session untouched apart from the
/// advisory status message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("A spin is in progress")]
    Spinning,

    #[error("Game over, restart required")]
    GameOver,

    #[error("No bet placed")]
    NoBet,

    #[error("Not enough coins: need {required}, have {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Tile {index} is outside the ring of {ring_len}")]
    InvalidTile { index: usize, ring_len: usize },

    #[error("No tile at ({x}, {y})")]
    NoTileAt { x: f64, y: f64 },
}

/// High score store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed high score file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No data directory available")]
    NoDataDir,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, Rejection>;
