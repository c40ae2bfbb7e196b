//! Spin driver: walks the pointer through a schedule over real time
//!
//! The driver is clocked externally: each `advance` call supplies the
//! milliseconds elapsed since the previous call. Any number of steps may
//! complete in one call and leftover time carries over, so the landing point
//! does not depend on how time is chunked.

use serde::{Deserialize, Serialize};

use crate::collab::RandomSource;
use crate::config::SpinTiming;
use crate::schedule::SpinSchedule;

/// Slack for accumulated floating-point error when comparing the step timer
const STEP_EPSILON_MS: f64 = 1e-6;

/// Randomised parameters of one spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    /// Whole loops before the final partial loop
    pub loops: u32,
    /// Landing tile
    pub target_index: usize,
    /// `loops * ring_len + target_index`
    pub total_steps: usize,
    pub duration_ms: f64,
}

impl SpinPlan {
    /// Draw loops, target and duration, in that order
    pub fn draw(rng: &mut dyn RandomSource, ring_len: usize, timing: &SpinTiming) -> Self {
        let loop_choices = timing.max_loops.saturating_sub(timing.min_loops) + 1;
        let loops = timing.min_loops
            + ((rng.next_unit() * loop_choices as f64).floor() as u32).min(loop_choices - 1);
        let target_index = if ring_len == 0 {
            0
        } else {
            ((rng.next_unit() * ring_len as f64).floor() as usize).min(ring_len - 1)
        };
        let duration_ms = timing.min_duration_ms + rng.next_unit() * timing.duration_spread_ms;
        Self::new(loops, target_index, ring_len, duration_ms)
    }

    pub fn new(loops: u32, target_index: usize, ring_len: usize, duration_ms: f64) -> Self {
        Self {
            loops,
            target_index,
            total_steps: loops as usize * ring_len + target_index,
            duration_ms,
        }
    }
}

/// Result of one `advance` call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepBatch {
    /// Steps completed during this call
    pub steps: usize,
    /// Duration of the most recently completed step
    pub last_step_ms: Option<f64>,
    /// The spin completed during this call
    pub landed: bool,
}

/// Pointer state for one active spin
#[derive(Debug, Clone)]
pub struct SpinDriver {
    plan: SpinPlan,
    schedule: SpinSchedule,
    ring_len: usize,
    elapsed_ms: f64,
    step_timer_ms: f64,
    step_index: usize,
    pointer_index: usize,
    landed: bool,
}

impl SpinDriver {
    /// Start a spin with the pointer at `start_index`
    pub fn new(plan: SpinPlan, start_index: usize, ring_len: usize, timing: &SpinTiming) -> Self {
        let schedule =
            SpinSchedule::generate(plan.total_steps, plan.duration_ms, ring_len, timing);
        Self::with_schedule(plan, schedule, start_index, ring_len)
    }

    /// Start a spin over a precomputed schedule
    pub fn with_schedule(
        plan: SpinPlan,
        schedule: SpinSchedule,
        start_index: usize,
        ring_len: usize,
    ) -> Self {
        Self {
            plan,
            schedule,
            ring_len,
            elapsed_ms: 0.0,
            step_timer_ms: 0.0,
            step_index: 0,
            pointer_index: start_index,
            landed: false,
        }
    }

    /// Feed elapsed time. Negative or non-finite deltas count as zero.
    ///
    /// A step completes once the carried timer reaches its duration less
    /// `STEP_EPSILON_MS` (1e-6 ms), so rounding in the normalized schedule
    /// cannot leave the final step pending when the full duration was fed.
    pub fn advance(&mut self, elapsed_ms: f64) -> StepBatch {
        let mut batch = StepBatch::default();
        if self.landed {
            return batch;
        }

        let dt = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        self.elapsed_ms += dt;
        self.step_timer_ms += dt;

        let total = self.total_steps();
        while self.step_index < total {
            let step_ms = self.schedule.step_ms(self.step_index).unwrap_or(0.0);
            if self.step_timer_ms + STEP_EPSILON_MS < step_ms {
                break;
            }
            self.step_timer_ms -= step_ms;
            self.step_index += 1;
            self.pointer_index = if self.ring_len == 0 {
                0
            } else {
                (self.pointer_index + 1) % self.ring_len
            };
            batch.steps += 1;
            batch.last_step_ms = Some(step_ms);
        }

        if self.step_index >= total {
            self.pointer_index = self.plan.target_index;
            self.landed = true;
            batch.landed = true;
        }
        batch
    }

    pub fn plan(&self) -> &SpinPlan {
        &self.plan
    }

    pub fn schedule(&self) -> &SpinSchedule {
        &self.schedule
    }

    pub fn pointer_index(&self) -> usize {
        self.pointer_index
    }

    pub fn target_index(&self) -> usize {
        self.plan.target_index
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn total_steps(&self) -> usize {
        self.schedule.len()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn is_landed(&self) -> bool {
        self.landed
    }

    /// Fraction of steps completed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        let total = self.total_steps();
        if total == 0 {
            1.0
        } else {
            self.step_index as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::SequenceRandom;

    fn driver(loops: u32, target: usize, duration: f64) -> SpinDriver {
        let plan = SpinPlan::new(loops, target, 24, duration);
        SpinDriver::new(plan, 0, 24, &SpinTiming::normal())
    }

    #[test]
    fn test_plan_draw_bounds() {
        let timing = SpinTiming::normal();
        let mut low = SequenceRandom::new(vec![0.0, 0.0, 0.0]);
        let plan = SpinPlan::draw(&mut low, 24, &timing);
        assert_eq!(plan.loops, 4);
        assert_eq!(plan.target_index, 0);
        assert_eq!(plan.total_steps, 96);
        assert_eq!(plan.duration_ms, 7800.0);

        let mut high = SequenceRandom::new(vec![0.999, 0.999, 0.999]);
        let plan = SpinPlan::draw(&mut high, 24, &timing);
        assert_eq!(plan.loops, 6);
        assert_eq!(plan.target_index, 23);
        assert_eq!(plan.total_steps, 6 * 24 + 23);
        assert!(plan.duration_ms < 10800.0);
    }

    #[test]
    fn test_lands_on_target_in_one_call() {
        let mut d = driver(4, 7, 9000.0);
        let batch = d.advance(9000.0);
        assert!(batch.landed);
        assert_eq!(batch.steps, 4 * 24 + 7);
        assert_eq!(d.pointer_index(), 7);
        assert_eq!(d.progress(), 1.0);
    }

    #[test]
    fn test_small_increments_match_schedule() {
        let mut d = driver(5, 3, 8000.0);
        let first = d.schedule().steps()[0];

        let batch = d.advance(first * 0.5);
        assert_eq!(batch.steps, 0);
        assert_eq!(batch.last_step_ms, None);
        assert_eq!(d.pointer_index(), 0);

        let batch = d.advance(first * 0.5);
        assert_eq!(batch.steps, 1);
        assert_eq!(d.pointer_index(), 1);
        assert!(!batch.landed);
    }

    #[test]
    fn test_step_slack_is_sub_microsecond() {
        let mut near = driver(4, 0, 8000.0);
        let first = near.schedule().steps()[0];
        assert_eq!(near.advance(first - 1e-9).steps, 1);

        let mut short = driver(4, 0, 8000.0);
        assert_eq!(short.advance(first - 1e-3).steps, 0);
    }

    #[test]
    fn test_catch_up_reports_last_step() {
        let mut d = driver(4, 0, 8000.0);
        let three = d.schedule().elapsed_after(3);
        let batch = d.advance(three);
        assert_eq!(batch.steps, 3);
        assert_eq!(batch.last_step_ms, d.schedule().step_ms(2));
        assert_eq!(d.pointer_index(), 3);
    }

    #[test]
    fn test_landing_reported_once() {
        let mut d = driver(4, 2, 7800.0);
        assert!(d.advance(10_000.0).landed);
        let again = d.advance(100.0);
        assert!(!again.landed);
        assert_eq!(again.steps, 0);
    }

    #[test]
    fn test_bad_deltas_ignored() {
        let mut d = driver(4, 2, 7800.0);
        d.advance(-50.0);
        d.advance(f64::NAN);
        assert_eq!(d.elapsed_ms(), 0.0);
        assert_eq!(d.step_index(), 0);
    }

    #[test]
    fn test_zero_step_spin_lands_immediately() {
        let plan = SpinPlan::new(0, 0, 24, 7800.0);
        let mut d = SpinDriver::new(plan, 5, 24, &SpinTiming::normal());
        let batch = d.advance(0.0);
        assert!(batch.landed);
        assert_eq!(d.pointer_index(), 0);
    }
}
