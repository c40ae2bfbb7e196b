//! Payout: settles a landed spin against the locked bets

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::ledger::BetLedger;
use crate::session::SessionState;

/// Settlement of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub landing_index: usize,
    /// Units that were on the landing tile
    pub landed_units: u32,
    pub is_win: bool,
    /// `landed_units * unit_value`
    pub winning_bet: u64,
    /// `streak_multiplier_base ^ streak_before`
    pub streak_factor: u64,
    /// `base_win_multiplier * streak_factor`
    pub effective_multiplier: u64,
    pub payout: u64,
    pub score_gain: u64,
    /// Streak after settlement
    pub win_streak: u32,
    /// The session high score grew this round
    pub new_high_score: bool,
}

/// Completed play-time bonus steps
pub fn time_steps(play_duration_ms: f64, step_seconds: u64) -> u64 {
    if step_seconds == 0 || !(play_duration_ms > 0.0) {
        return 0;
    }
    (play_duration_ms / 1000.0 / step_seconds as f64).floor() as u64
}

/// Settle the landing tile against `bets` and update the session.
///
/// Coins are credited on a win; the round bet was already debited at spin
/// start. Rounds played is incremented either way.
pub fn settle(
    landing_index: usize,
    bets: &BetLedger,
    session: &mut SessionState,
    config: &EngineConfig,
) -> RoundOutcome {
    let economy = &config.economy;
    let scoring = &config.scoring;
    let landed_units = bets.units_for(landing_index);

    let mut outcome = RoundOutcome {
        landing_index,
        landed_units,
        is_win: landed_units > 0,
        winning_bet: 0,
        streak_factor: 1,
        effective_multiplier: 0,
        payout: 0,
        score_gain: 0,
        win_streak: 0,
        new_high_score: false,
    };

    if outcome.is_win {
        let winning_bet = (landed_units as u64).saturating_mul(economy.unit_value);
        let streak_factor = economy
            .streak_multiplier_base
            .saturating_pow(session.win_streak);
        let effective_multiplier = economy.base_win_multiplier.saturating_mul(streak_factor);
        let payout = winning_bet.saturating_mul(effective_multiplier);

        session.coins = session.coins.saturating_add(payout);
        session.win_streak = session.win_streak.saturating_add(1);

        let steps = time_steps(session.play_duration_ms, scoring.time_step_seconds);
        let previous_streak = (session.win_streak - 1) as u64;
        let score_gain = scoring.base_win
            + steps.saturating_mul(scoring.time_bonus_per_step)
            + previous_streak.saturating_mul(scoring.streak_bonus);
        session.score = session.score.saturating_add(score_gain);

        outcome.winning_bet = winning_bet;
        outcome.streak_factor = streak_factor;
        outcome.effective_multiplier = effective_multiplier;
        outcome.payout = payout;
        outcome.score_gain = score_gain;
        outcome.new_high_score = session.record_score();
    } else {
        session.win_streak = 0;
    }

    outcome.win_streak = session.win_streak;
    session.rounds_played += 1;
    outcome
}
