//! # gl-loop — Gem Loop spin sequencing and payout engine
//!
//! Headless core of a "wheel of tiles" game: a ring of gem tiles laid out
//! around a rectangular board, a pointer that walks the ring on an eased
//! schedule, and a payout rule that rewards consecutive wins.
//!
//! ## Features
//!
//! - **Board Layout**: Ring geometry for landscape and handheld portrait boards
//! - **Bet Ledger**: Unit bets per tile, locked for the duration of a spin
//! - **Spin Schedule**: Ease-out step timing with a tail slowdown
//! - **Spin Driver**: Frame-rate independent pointer advancement
//! - **Payout**: Streak-compounding multiplier and score bonuses
//!
//! ## Architecture
//!
//! ```text
//! GemLoopEngine
//!     │
//!     ├── Ring (BoardLayout → Tiles)
//!     ├── BetLedger (tile → units)
//!     ├── SpinDriver (SpinPlan + SpinSchedule)
//!     └── SessionState (coins, score, streak)
//!           │
//!           v
//!     RoundOutcome → EngineSnapshot
//! ```
//!
//! Randomness, audio cues and high score persistence are injected through
//! [`RandomSource`], [`SpinAudio`] and [`HighScoreStore`].

pub mod collab;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod layout;
pub mod ledger;
pub mod payout;
pub mod ring;
pub mod schedule;
pub mod session;
pub mod snapshot;
pub mod store;

pub use collab::*;
pub use config::*;
pub use driver::*;
pub use engine::*;
pub use error::*;
pub use layout::*;
pub use ledger::*;
pub use payout::*;
pub use ring::*;
pub use schedule::*;
pub use session::*;
pub use snapshot::*;
pub use store::*;
