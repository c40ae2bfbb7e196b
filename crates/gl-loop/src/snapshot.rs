//! Serialized engine state for renderers, tests and logs

use serde::{Deserialize, Serialize};

use crate::session::{Mode, Tone};

/// One active bet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetEntry {
    pub tile_index: usize,
    pub gem: String,
    pub units: u32,
}

/// Point-in-time view of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub coins: u64,
    pub score: u64,
    /// Round bet while spinning, pending bet while idle
    pub current_bet: u64,
    pub high_score: u64,
    pub win_streak: u32,
    pub active_bets: Vec<BetEntry>,
    pub pointer_index: usize,
    pub pointer_gem: Option<String>,
    pub spinning: bool,
    pub game_over: bool,
    pub status_message: String,
    pub tone: Tone,
    pub rounds_played: u64,
}

impl EngineSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let snapshot = EngineSnapshot {
            mode: Mode::Spinning,
            coins: 280,
            score: 0,
            current_bet: 20,
            high_score: 0,
            win_streak: 0,
            active_bets: vec![BetEntry {
                tile_index: 3,
                gem: "Diamond".into(),
                units: 2,
            }],
            pointer_index: 5,
            pointer_gem: Some("Topaz".into()),
            spinning: true,
            game_over: false,
            status_message: ".".into(),
            tone: Tone::Neutral,
            rounds_played: 0,
        };
        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json()).unwrap();
        assert_eq!(value["mode"], "spinning");
        assert_eq!(value["current_bet"], 20);
        assert_eq!(value["active_bets"][0]["tile_index"], 3);
        assert_eq!(value["tone"], "neutral");

        let back: EngineSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snapshot);
    }
}
