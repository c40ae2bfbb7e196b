//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Edge tile counts, in clockwise traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCounts {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl EdgeCounts {
    /// Wide board: long top/bottom rows
    pub fn landscape() -> Self {
        Self {
            top: 8,
            right: 4,
            bottom: 8,
            left: 4,
        }
    }

    /// Tall board: top/bottom density swapped with the sides
    pub fn portrait() -> Self {
        Self {
            top: 4,
            right: 8,
            bottom: 4,
            left: 8,
        }
    }

    /// Total ring length
    pub fn total(&self) -> usize {
        self.top + self.right + self.bottom + self.left
    }
}

/// Coin economy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Coins at session start and after a restart
    pub starting_coins: u64,
    /// Cost of one bet unit
    pub unit_value: u64,
    /// Payout multiplier for a win with no streak
    pub base_win_multiplier: u64,
    /// Raised to the current streak and applied on top of the base multiplier
    pub streak_multiplier_base: u64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_coins: 300,
            unit_value: 10,
            base_win_multiplier: 10,
            streak_multiplier_base: 2,
        }
    }
}

/// Score awarded on wins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Flat score per win
    pub base_win: u64,
    /// Length of one play-time bonus step (seconds)
    pub time_step_seconds: u64,
    /// Bonus per completed play-time step
    pub time_bonus_per_step: u64,
    /// Bonus per previous consecutive win
    pub streak_bonus: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_win: 100,
            time_step_seconds: 30,
            time_bonus_per_step: 15,
            streak_bonus: 40,
        }
    }
}

/// Spin timing curve and randomisation bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Raw duration of the first (fastest) step (ms)
    pub min_step_ms: f64,
    /// Raw duration of the last step before the tail boost (ms)
    pub max_step_ms: f64,
    /// Ease-out exponent
    pub ease_exponent: f64,
    /// Extra slowdown reached by the final step of the terminal loop
    pub tail_boost: f64,
    /// Minimum whole loops around the ring
    pub min_loops: u32,
    /// Maximum whole loops around the ring (inclusive)
    pub max_loops: u32,
    /// Shortest spin (ms)
    pub min_duration_ms: f64,
    /// Random extension added on top of `min_duration_ms` (ms, exclusive)
    pub duration_spread_ms: f64,
    /// Idle delay before the landing tone is revealed (ms)
    pub tone_reveal_ms: f64,
}

impl SpinTiming {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            min_step_ms: 58.0,
            max_step_ms: 340.0,
            ease_exponent: 2.2,
            tail_boost: 1.1,
            min_loops: 4,
            max_loops: 6,
            min_duration_ms: 7800.0,
            duration_spread_ms: 3000.0,
            tone_reveal_ms: 220.0,
        }
    }

    /// Scale wall-clock durations by factor (< 1.0 = faster).
    ///
    /// The curve shape and loop counts are untouched.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            min_step_ms: self.min_step_ms * factor,
            max_step_ms: self.max_step_ms * factor,
            min_duration_ms: self.min_duration_ms * factor,
            duration_spread_ms: self.duration_spread_ms * factor,
            tone_reveal_ms: self.tone_reveal_ms * factor,
            ..self.clone()
        }
    }

    /// Longest possible spin (ms, exclusive)
    pub fn max_duration_ms(&self) -> f64 {
        self.min_duration_ms + self.duration_spread_ms
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::normal()
    }
}

/// Board geometry constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Fixed board size outside handheld portrait (width, height)
    pub landscape_size: (f64, f64),
    /// Board width used for handheld portrait
    pub portrait_base_width: f64,
    /// Clamp for the derived portrait board height
    pub portrait_height_range: (f64, f64),
    /// Viewport floors applied before deriving the portrait aspect
    pub min_viewport: (f64, f64),
    /// Horizontal padding on each side
    pub padding_x: f64,
    /// Vertical padding on each side
    pub padding_y: f64,
    /// Gap between stacked side tiles (non-packed layouts)
    pub side_tile_gap: f64,
    /// Inset between side tiles and the corner rows
    pub side_inset: f64,
    /// Absolute tile size cap
    pub max_tile_size: f64,
    /// Horizontal spacing fraction kept as tile size
    pub horizontal_fill: f64,
    /// Viewports at most this wide count as narrow
    pub handheld_max_width: f64,
    /// Edge counts for wide boards
    pub landscape_counts: EdgeCounts,
    /// Edge counts for handheld portrait boards
    pub portrait_counts: EdgeCounts,
    /// Tiles carrying the cosmetic multiplier
    pub bonus_indices: Vec<usize>,
    /// Cosmetic multiplier value (not used in payout)
    pub bonus_multiplier: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            landscape_size: (960.0, 680.0),
            portrait_base_width: 680.0,
            portrait_height_range: (900.0, 1600.0),
            min_viewport: (320.0, 480.0),
            padding_x: 56.0,
            padding_y: 24.0,
            side_tile_gap: 8.0,
            side_inset: 2.0,
            max_tile_size: 96.0,
            horizontal_fill: 0.95,
            handheld_max_width: 1024.0,
            landscape_counts: EdgeCounts::landscape(),
            portrait_counts: EdgeCounts::portrait(),
            bonus_indices: vec![4, 9, 16, 21],
            bonus_multiplier: 1.5,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub timing: SpinTiming,
    #[serde(default)]
    pub board: BoardConfig,
}

impl EngineConfig {
    /// Check that the configuration can drive a session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.economy.unit_value == 0 {
            return Err(ConfigError::Invalid("unit_value must be positive".into()));
        }
        let t = &self.timing;
        if !(t.min_step_ms > 0.0 && t.max_step_ms >= t.min_step_ms) {
            return Err(ConfigError::Invalid(
                "step bounds must satisfy 0 < min_step_ms <= max_step_ms".into(),
            ));
        }
        if !(t.ease_exponent > 0.0) || t.tail_boost < 0.0 {
            return Err(ConfigError::Invalid("curve parameters out of range".into()));
        }
        if t.max_loops < t.min_loops {
            return Err(ConfigError::Invalid("max_loops < min_loops".into()));
        }
        if !(t.min_duration_ms > 0.0) || t.duration_spread_ms < 0.0 {
            return Err(ConfigError::Invalid("spin duration must be positive".into()));
        }
        for counts in [&self.board.landscape_counts, &self.board.portrait_counts] {
            if counts.top == 0 || counts.right == 0 || counts.bottom == 0 || counts.left == 0 {
                return Err(ConfigError::Invalid("every edge needs at least one tile".into()));
            }
        }
        Ok(())
    }

    /// Export as JSON
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Import and validate from JSON
    pub fn import_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.economy.starting_coins, 300);
        assert_eq!(config.economy.unit_value, 10);
        assert_eq!(config.board.landscape_counts.total(), 24);
        assert_eq!(config.board.portrait_counts.total(), 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scaled_timing() {
        let normal = SpinTiming::normal();
        let fast = normal.scaled(0.1);
        assert!(fast.min_duration_ms < normal.min_duration_ms);
        assert_eq!(fast.min_loops, normal.min_loops);
        assert_eq!(fast.ease_exponent, normal.ease_exponent);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = EngineConfig::default();
        config.economy.starting_coins = 1000;
        let json = config.export_json();
        let back = EngineConfig::import_json(&json).unwrap();
        assert_eq!(back.economy.starting_coins, 1000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::import_json(r#"{"economy":{"starting_coins":50,"unit_value":5,"base_win_multiplier":10,"streak_multiplier_base":2}}"#).unwrap();
        assert_eq!(config.economy.starting_coins, 50);
        assert_eq!(config.scoring.base_win, 100);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.timing.max_loops = 2;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.board.portrait_counts.left = 0;
        assert!(config.validate().is_err());

        assert!(EngineConfig::import_json("not json").is_err());
    }
}
