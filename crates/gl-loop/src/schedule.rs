//! Per-step durations for one decelerating spin
//!
//! A spin is a fixed number of discrete pointer steps. Step durations follow
//! a single ease-out curve from `min_step_ms` to `max_step_ms`; the final loop
//! around the ring is stretched further by a quadratic tail boost, and the
//! whole sequence is then scaled to the requested wall-clock duration.

use serde::{Deserialize, Serialize};

use crate::config::SpinTiming;

/// One-phase ease-out, `1 - (1 - t)^exponent`, clamped to `[0, 1]`
pub fn spin_easing(t: f64, exponent: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    1.0 - (1.0 - t).powf(exponent)
}

/// Ordered step durations for one spin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinSchedule {
    steps: Vec<f64>,
    duration_ms: f64,
}

impl SpinSchedule {
    /// Generate a schedule of `total_steps` durations summing to `duration_ms`.
    ///
    /// The last `min(ring_len, total_steps)` steps form the terminal loop.
    /// Identical inputs always yield an identical schedule.
    pub fn generate(
        total_steps: usize,
        duration_ms: f64,
        ring_len: usize,
        timing: &SpinTiming,
    ) -> Self {
        let duration_ms = if duration_ms.is_finite() {
            duration_ms.max(0.0)
        } else {
            0.0
        };
        if total_steps == 0 {
            return Self {
                steps: Vec::new(),
                duration_ms: 0.0,
            };
        }

        let final_loop_steps = ring_len.min(total_steps);
        let final_loop_start = total_steps - final_loop_steps;
        let span = timing.max_step_ms - timing.min_step_ms;

        let raw: Vec<f64> = (0..total_steps)
            .map(|i| {
                let t = if total_steps <= 1 {
                    1.0
                } else {
                    i as f64 / (total_steps - 1) as f64
                };
                let mut step_ms = timing.min_step_ms + span * spin_easing(t, timing.ease_exponent);
                if i >= final_loop_start {
                    let tail_t = if final_loop_steps <= 1 {
                        1.0
                    } else {
                        (i - final_loop_start) as f64 / (final_loop_steps - 1) as f64
                    };
                    step_ms *= 1.0 + timing.tail_boost * tail_t * tail_t;
                }
                step_ms
            })
            .collect();

        let raw_total: f64 = raw.iter().sum();
        let scale = if raw_total > 0.0 {
            duration_ms / raw_total
        } else {
            0.0
        };

        Self {
            steps: raw.into_iter().map(|ms| ms * scale).collect(),
            duration_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Duration of step `index`
    pub fn step_ms(&self, index: usize) -> Option<f64> {
        self.steps.get(index).copied()
    }

    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Requested wall-clock duration
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Sum of all step durations
    pub fn total_ms(&self) -> f64 {
        self.steps.iter().sum()
    }

    /// Elapsed time at which `steps` steps have completed
    pub fn elapsed_after(&self, steps: usize) -> f64 {
        self.steps.iter().take(steps).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(spin_easing(0.0, 2.2), 0.0);
        assert_eq!(spin_easing(1.0, 2.2), 1.0);
        assert_eq!(spin_easing(-0.5, 2.2), 0.0);
        assert_eq!(spin_easing(1.5, 2.2), 1.0);
        assert!(spin_easing(0.25, 2.2) < spin_easing(0.5, 2.2));
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = SpinSchedule::generate(0, 9000.0, 24, &SpinTiming::normal());
        assert!(schedule.is_empty());
        assert_eq!(schedule.total_ms(), 0.0);
    }

    #[test]
    fn test_single_step_takes_whole_duration() {
        let schedule = SpinSchedule::generate(1, 500.0, 24, &SpinTiming::normal());
        assert_eq!(schedule.len(), 1);
        assert_relative_eq!(schedule.steps()[0], 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sum_matches_duration() {
        let timing = SpinTiming::normal();
        for &(steps, duration) in &[(2, 100.0), (24, 7800.0), (113, 9123.4), (167, 10799.9)] {
            let schedule = SpinSchedule::generate(steps, duration, 24, &timing);
            assert_eq!(schedule.len(), steps);
            assert_relative_eq!(schedule.total_ms(), duration, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_monotonic_deceleration() {
        let schedule = SpinSchedule::generate(120, 9000.0, 24, &SpinTiming::normal());
        for pair in schedule.steps().windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_terminal_loop_is_slower() {
        let timing = SpinTiming::normal();
        let boosted = SpinSchedule::generate(120, 9000.0, 24, &timing);
        let mut flat = timing.clone();
        flat.tail_boost = 0.0;
        let plain = SpinSchedule::generate(120, 9000.0, 24, &flat);

        // Last step ratio to first step grows by the full boost factor
        let boosted_ratio = boosted.steps()[119] / boosted.steps()[0];
        let plain_ratio = plain.steps()[119] / plain.steps()[0];
        assert_relative_eq!(boosted_ratio / plain_ratio, 2.1, max_relative = 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let timing = SpinTiming::normal();
        let a = SpinSchedule::generate(130, 8500.0, 24, &timing);
        let b = SpinSchedule::generate(130, 8500.0, 24, &timing);
        assert_eq!(a, b);
    }

    #[test]
    fn test_elapsed_after() {
        let schedule = SpinSchedule::generate(10, 1000.0, 4, &SpinTiming::normal());
        assert_eq!(schedule.elapsed_after(0), 0.0);
        assert_relative_eq!(schedule.elapsed_after(10), 1000.0, max_relative = 1e-12);
    }
}
