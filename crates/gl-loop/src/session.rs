//! Coins, score and streak across rounds

use serde::{Deserialize, Serialize};

/// Engine mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    Spinning,
}

/// Outcome tone shown by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Neutral,
    Win,
    Lose,
}

/// Per-session counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub coins: u64,
    pub score: u64,
    /// Best score seen, never decreases
    pub high_score: u64,
    pub win_streak: u32,
    /// Play time feeding the score time bonus (ms)
    pub play_duration_ms: f64,
    pub rounds_played: u64,
    /// Bet debited for the spin in progress, 0 while idle
    pub round_bet: u64,
    pub game_over: bool,
}

impl SessionState {
    pub fn new(starting_coins: u64, high_score: u64) -> Self {
        Self {
            coins: starting_coins,
            score: 0,
            high_score,
            win_streak: 0,
            play_duration_ms: 0.0,
            rounds_played: 0,
            round_bet: 0,
            game_over: false,
        }
    }

    /// Back to a fresh session, keeping the high score
    pub fn reset(&mut self, starting_coins: u64) {
        *self = Self::new(starting_coins, self.high_score);
    }

    /// Raise the high score to the current score. Returns true if it grew.
    pub fn record_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}
