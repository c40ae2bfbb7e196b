//! Gem Loop Engine
//!
//! Ties the ring, bets, spin driver and payout together.
//!
//! The engine is single-threaded and clocked by the host through
//! [`GemLoopEngine::advance`]. Requests that are not valid in the current
//! state are refused with a [`Rejection`] and leave the session unchanged
//! (only the advisory status message may change).

use crate::collab::{HighScoreStore, MemoryStore, NullAudio, RandomSource, SpinAudio, StdRandom};
use crate::config::EngineConfig;
use crate::driver::{SpinDriver, SpinPlan};
use crate::error::{ConfigError, EngineResult, Rejection};
use crate::layout::{BoardLayout, Viewport};
use crate::ledger::BetLedger;
use crate::payout::{self, RoundOutcome};
use crate::ring::Ring;
use crate::session::{Mode, SessionState, Tone};
use crate::snapshot::{BetEntry, EngineSnapshot};

/// Status shown while idle with no bets
pub const IDLE_HINT: &str = "Click on gems and press START";
/// Status while the session is over
pub const GAME_OVER_TEXT: &str = "GAME OVER";
/// Status while the pointer is moving
pub const SPINNING_TEXT: &str = ".";
/// Status after a losing round
pub const LOSE_TEXT: &str = "YOU LOST. Try again.";

/// What the start control did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartAction {
    /// A spin began with this plan
    Spin(SpinPlan),
    /// The session was over and has been restarted
    Restarted,
}

/// Spin in flight, with the bets locked at spin start
struct ActiveSpin {
    driver: SpinDriver,
    bets: BetLedger,
}

/// Gem Loop engine
///
/// Owns the session; randomness, audio and persistence are injected.
pub struct GemLoopEngine {
    /// Economy, scoring, timing and board constants
    config: EngineConfig,
    /// Viewport the ring was last built for
    viewport: Viewport,
    /// Current tile ring
    ring: Ring,
    /// Bets for the next spin
    ledger: BetLedger,
    /// Coins, score, streak and play time
    session: SessionState,
    /// Spin in flight (None while idle)
    spin: Option<ActiveSpin>,
    /// Pointer position shown by renderers
    pointer_index: usize,
    /// Advisory status line
    status_message: String,
    /// Tone currently shown
    tone: Tone,
    /// Tone to show once the reveal delay has elapsed
    pending_tone: Option<Tone>,
    /// Remaining reveal delay (ms)
    tone_reveal_ms: f64,
    /// Outcome of the most recent landing
    last_outcome: Option<RoundOutcome>,
    /// Spin draws
    rng: Box<dyn RandomSource>,
    /// Audio cues
    audio: Box<dyn SpinAudio>,
    /// High score persistence
    store: Box<dyn HighScoreStore>,
}

impl GemLoopEngine {
    /// Engine with default config on a desktop viewport
    pub fn new() -> Self {
        Self::build(EngineConfig::default(), Viewport::default())
    }

    /// Engine with specific config and viewport. The config is validated first.
    pub fn with_config(config: EngineConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, viewport))
    }

    fn build(config: EngineConfig, viewport: Viewport) -> Self {
        let ring = Ring::build(&viewport, &config.board);
        let session = SessionState::new(config.economy.starting_coins, 0);
        let mut engine = Self {
            config,
            viewport,
            ring,
            ledger: BetLedger::new(),
            session,
            spin: None,
            pointer_index: 0,
            status_message: IDLE_HINT.to_string(),
            tone: Tone::Neutral,
            pending_tone: None,
            tone_reveal_ms: 0.0,
            last_outcome: None,
            rng: Box::new(StdRandom::new()),
            audio: Box::new(NullAudio),
            store: Box::new(MemoryStore::new()),
        };
        engine.sync_game_over();
        engine.update_selection_message();
        engine
    }

    /// Replace the random source
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replace the audio collaborator
    pub fn with_audio(mut self, audio: impl SpinAudio + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Replace the high score store and load the stored value.
    /// The session high score never drops below what it already holds.
    pub fn with_store(mut self, store: impl HighScoreStore + 'static) -> Self {
        self.store = Box::new(store);
        let loaded = self.store.load_high_score().unwrap_or(0);
        self.session.high_score = self.session.high_score.max(loaded);
        self
    }

    // ═══════════════════════════════════════════════════════════════════════
    // BETTING
    // ═══════════════════════════════════════════════════════════════════════

    /// Add one unit to a tile. Returns the tile's new unit count.
    pub fn place_bet(&mut self, tile_index: usize) -> EngineResult<u32> {
        self.sync_game_over();
        self.ensure_idle()?;
        if !self.ring.contains_index(tile_index) {
            return Err(Rejection::InvalidTile {
                index: tile_index,
                ring_len: self.ring.len(),
            });
        }

        let unit = self.config.economy.unit_value;
        let next_bet = self.pending_bet().saturating_add(unit);
        if next_bet > self.session.coins {
            self.status_message = format!("Not enough coins for this bet ({}).", next_bet);
            log::debug!("Bet on tile {} refused: {} > {}", tile_index, next_bet, self.session.coins);
            return Err(Rejection::InsufficientFunds {
                required: next_bet,
                available: self.session.coins,
            });
        }

        let units = self.ledger.add_unit(tile_index);
        self.audio.on_bet_placed();
        log::debug!("Bet placed on tile {} ({} units)", tile_index, units);
        self.update_selection_message();
        Ok(units)
    }

    /// Bet on the tile under a board-space point. Returns the tile index.
    pub fn place_bet_at(&mut self, x: f64, y: f64) -> EngineResult<usize> {
        self.sync_game_over();
        self.ensure_idle()?;
        let index = self
            .ring
            .tile_at(x, y)
            .map(|tile| tile.index)
            .ok_or(Rejection::NoTileAt { x, y })?;
        self.place_bet(index)?;
        Ok(index)
    }

    /// Remove every bet
    pub fn clear_bets(&mut self) -> EngineResult<()> {
        self.sync_game_over();
        self.ensure_idle()?;
        self.ledger.clear();
        self.last_outcome = None;
        self.reset_tone();
        self.update_selection_message();
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════

    /// Start a spin. The pending bet is debited immediately.
    pub fn start_spin(&mut self) -> EngineResult<SpinPlan> {
        self.sync_game_over();
        if self.is_spinning() {
            return Err(Rejection::Spinning);
        }
        if self.session.game_over {
            self.status_message = GAME_OVER_TEXT.to_string();
            return Err(Rejection::GameOver);
        }

        let round_bet = self.pending_bet();
        if round_bet == 0 {
            return Err(Rejection::NoBet);
        }
        if round_bet > self.session.coins {
            self.status_message = format!(
                "Not enough coins. Need {}, have {}.",
                round_bet, self.session.coins
            );
            return Err(Rejection::InsufficientFunds {
                required: round_bet,
                available: self.session.coins,
            });
        }

        self.session.coins -= round_bet;
        self.session.round_bet = round_bet;

        let ring_len = self.ring.len();
        let plan = SpinPlan::draw(self.rng.as_mut(), ring_len, &self.config.timing);
        let driver = SpinDriver::new(plan, 0, ring_len, &self.config.timing);
        self.spin = Some(ActiveSpin {
            driver,
            bets: self.ledger.clone(),
        });

        self.pointer_index = 0;
        self.last_outcome = None;
        self.reset_tone();
        self.status_message = SPINNING_TEXT.to_string();
        self.audio.on_spin_start();

        log::info!(
            "Spin started: bet {}, {} loops to tile {} over {:.0} ms ({} steps)",
            round_bet,
            plan.loops,
            plan.target_index,
            plan.duration_ms,
            plan.total_steps
        );
        Ok(plan)
    }

    /// Start control: restart when the session is over, otherwise spin
    pub fn press_start(&mut self) -> EngineResult<StartAction> {
        self.sync_game_over();
        if self.session.game_over && !self.is_spinning() {
            self.reset()?;
            return Ok(StartAction::Restarted);
        }
        self.start_spin().map(StartAction::Spin)
    }

    /// Feed elapsed clock time. Returns the outcome if the spin landed.
    pub fn advance(&mut self, elapsed_ms: f64) -> Option<RoundOutcome> {
        let dt = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        if !self.session.game_over {
            self.session.play_duration_ms += dt;
        }

        let Some(active) = self.spin.as_mut() else {
            self.reveal_tone(dt);
            return None;
        };

        let batch = active.driver.advance(dt);
        self.pointer_index = active.driver.pointer_index();
        if let Some(step_ms) = batch.last_step_ms {
            log::debug!("Advanced {} steps, pointer at {}", batch.steps, self.pointer_index);
            self.audio.on_tick(step_ms);
        }
        if !batch.landed {
            return None;
        }

        let active = self.spin.take()?;
        Some(self.finalize_spin(active))
    }

    fn finalize_spin(&mut self, active: ActiveSpin) -> RoundOutcome {
        let landing = active.driver.target_index();
        let outcome = payout::settle(landing, &active.bets, &mut self.session, &self.config);

        if outcome.new_high_score {
            self.store.save_high_score(self.session.high_score);
        }

        if outcome.is_win {
            let high_score_note = if outcome.new_high_score {
                format!(" New High Score: {}.", self.session.high_score)
            } else {
                String::new()
            };
            self.status_message = format!(
                "YOU WIN! {} x {} = {} (streak x{}). Score +{}.{}",
                format_coins(outcome.winning_bet),
                outcome.effective_multiplier,
                format_coins(outcome.payout),
                outcome.streak_factor,
                outcome.score_gain,
                high_score_note
            );
            self.pending_tone = Some(Tone::Win);
        } else {
            self.status_message = LOSE_TEXT.to_string();
            self.pending_tone = Some(Tone::Lose);
        }
        self.tone = Tone::Neutral;
        self.tone_reveal_ms = self.config.timing.tone_reveal_ms;

        self.pointer_index = landing;
        self.session.round_bet = 0;

        self.sync_game_over();
        if self.session.game_over {
            self.ledger.clear();
            self.status_message = GAME_OVER_TEXT.to_string();
            self.pending_tone = Some(Tone::Lose);
            log::info!("Game over after {} rounds", self.session.rounds_played);
        }

        self.audio.on_landing(outcome.is_win);
        log::info!(
            "Landed on tile {}: {} (payout {}, coins {}, streak {})",
            landing,
            if outcome.is_win { "win" } else { "loss" },
            outcome.payout,
            self.session.coins,
            self.session.win_streak
        );

        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Restart the session: starting coins, no bets, no streak
    pub fn reset(&mut self) -> EngineResult<()> {
        self.ensure_not_spinning()?;
        self.session.reset(self.config.economy.starting_coins);
        self.ledger.clear();
        self.pointer_index = 0;
        self.last_outcome = None;
        self.reset_tone();
        self.sync_game_over();
        self.status_message = IDLE_HINT.to_string();
        self.update_selection_message();
        log::info!("Session reset with {} coins", self.session.coins);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // LAYOUT
    // ═══════════════════════════════════════════════════════════════════════

    /// Rebuild the ring for a viewport, clearing bets and the pointer
    pub fn rebuild(&mut self, viewport: Viewport) -> EngineResult<()> {
        self.ensure_not_spinning()?;
        self.viewport = viewport;
        self.ring = Ring::build(&viewport, &self.config.board);
        self.ledger.clear();
        self.pointer_index = 0;
        self.last_outcome = None;
        self.reset_tone();
        self.update_selection_message();
        let layout = self.ring.layout();
        log::info!(
            "Ring rebuilt: {} tiles on {}x{} board, tile size {:.1}",
            self.ring.len(),
            layout.size.width,
            layout.size.height,
            layout.tile_size
        );
        Ok(())
    }

    /// Rebuild only if the board size or edge counts change.
    /// Returns whether a rebuild happened.
    pub fn on_viewport_change(&mut self, viewport: Viewport) -> EngineResult<bool> {
        self.ensure_not_spinning()?;
        let next = BoardLayout::for_viewport(&viewport, &self.config.board);
        if next.same_shape(self.ring.layout()) {
            self.viewport = viewport;
            return Ok(false);
        }
        self.rebuild(viewport)?;
        Ok(true)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn ledger(&self) -> &BetLedger {
        &self.ledger
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        if self.spin.is_some() {
            Mode::Spinning
        } else {
            Mode::Idle
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.session.game_over
    }

    pub fn pointer_index(&self) -> usize {
        self.pointer_index
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn units_for(&self, tile_index: usize) -> u32 {
        self.ledger.units_for(tile_index)
    }

    pub fn pending_bet(&self) -> u64 {
        self.ledger.pending_bet_amount(self.config.economy.unit_value)
    }

    /// Round bet while spinning, pending bet while idle
    pub fn current_bet(&self) -> u64 {
        if self.is_spinning() {
            self.session.round_bet
        } else {
            self.pending_bet()
        }
    }

    /// Active spin driver, if any
    pub fn active_spin(&self) -> Option<&SpinDriver> {
        self.spin.as_ref().map(|active| &active.driver)
    }

    /// Fraction of the active spin completed; 0 while idle
    pub fn spin_progress(&self) -> f64 {
        self.active_spin().map_or(0.0, |driver| driver.progress())
    }

    /// Outcome of the most recent landing, until bets or layout change
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> EngineSnapshot {
        let gem_name = |index: usize| self.ring.get(index).map(|tile| tile.gem.to_string());
        EngineSnapshot {
            mode: self.mode(),
            coins: self.session.coins,
            score: self.session.score,
            current_bet: self.current_bet(),
            high_score: self.session.high_score,
            win_streak: self.session.win_streak,
            active_bets: self
                .ledger
                .entries()
                .map(|(tile_index, units)| BetEntry {
                    tile_index,
                    gem: gem_name(tile_index).unwrap_or_else(|| tile_index.to_string()),
                    units,
                })
                .collect(),
            pointer_index: self.pointer_index,
            pointer_gem: gem_name(self.pointer_index),
            spinning: self.is_spinning(),
            game_over: self.session.game_over,
            status_message: self.status_message.clone(),
            tone: self.tone,
            rounds_played: self.session.rounds_played,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INTERNALS
    // ═══════════════════════════════════════════════════════════════════════

    fn ensure_not_spinning(&self) -> EngineResult<()> {
        if self.is_spinning() {
            return Err(Rejection::Spinning);
        }
        Ok(())
    }

    fn ensure_idle(&mut self) -> EngineResult<()> {
        self.ensure_not_spinning()?;
        if self.session.game_over {
            self.status_message = GAME_OVER_TEXT.to_string();
            return Err(Rejection::GameOver);
        }
        Ok(())
    }

    fn sync_game_over(&mut self) {
        if !self.is_spinning() && self.session.coins == 0 {
            self.session.game_over = true;
        }
    }

    fn reset_tone(&mut self) {
        self.tone = Tone::Neutral;
        self.pending_tone = None;
        self.tone_reveal_ms = 0.0;
    }

    fn reveal_tone(&mut self, dt: f64) {
        let Some(pending) = self.pending_tone else {
            return;
        };
        self.tone_reveal_ms -= dt;
        if self.tone_reveal_ms <= 0.0 {
            self.tone = pending;
            self.pending_tone = None;
            self.tone_reveal_ms = 0.0;
        }
    }

    fn update_selection_message(&mut self) {
        if self.is_spinning() {
            return;
        }
        if self.session.game_over {
            self.status_message = GAME_OVER_TEXT.to_string();
            return;
        }
        let count = self.ledger.active_tile_count();
        let units = self.ledger.total_units();
        let pending = self.pending_bet();
        self.status_message = if units == 0 {
            IDLE_HINT.to_string()
        } else if pending > self.session.coins {
            format!("Not enough coins for this bet ({}).", pending)
        } else {
            format!(
                "{} gem{}, {} total bet{}.",
                count,
                if count == 1 { "" } else { "s" },
                units,
                if units == 1 { "" } else { "s" }
            )
        };
    }
}

impl Default for GemLoopEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// `$1,234` style coin amount
pub fn format_coins(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
