//! Collaborator seams: randomness, audio cues and high score persistence

use rand::prelude::*;
use rand::rngs::StdRng;

/// Uniform random source
pub trait RandomSource {
    /// Next draw in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

/// `StdRng`-backed source
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        // Keep draws inside [0, 1)
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Audio cues emitted by the engine. Implementations must not block.
pub trait SpinAudio {
    fn on_spin_start(&mut self);

    /// Once per advancement batch, with the last completed step's duration
    fn on_tick(&mut self, step_ms: f64);

    fn on_landing(&mut self, is_win: bool);

    fn on_bet_placed(&mut self) {}
}

/// Silent audio
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl SpinAudio for NullAudio {
    fn on_spin_start(&mut self) {}
    fn on_tick(&mut self, _step_ms: f64) {}
    fn on_landing(&mut self, _is_win: bool) {}
}

/// Best-effort high score persistence.
///
/// Failures never reach the engine: `load_high_score` returns `None` and
/// `save_high_score` does nothing.
pub trait HighScoreStore {
    fn load_high_score(&self) -> Option<u64>;
    fn save_high_score(&mut self, score: u64);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u64) -> Self {
        Self { value: Some(value) }
    }

    pub fn value(&self) -> Option<u64> {
        self.value
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> Option<u64> {
        self.value
    }

    fn save_high_score(&mut self, score: u64) {
        self.value = Some(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = StdRandom::seeded(42);
        let mut b = StdRandom::seeded(42);
        for _ in 0..10 {
            let x = a.next_unit();
            assert_eq!(x, b.next_unit());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_sequence_random_cycles_and_clamps() {
        let mut rng = SequenceRandom::new(vec![0.25, 1.0, -3.0]);
        assert_eq!(rng.next_unit(), 0.25);
        assert!(rng.next_unit() < 1.0);
        assert_eq!(rng.next_unit(), 0.0);
        assert_eq!(rng.next_unit(), 0.25);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_high_score(), None);
        store.save_high_score(120);
        assert_eq!(store.load_high_score(), Some(120));
    }
}
