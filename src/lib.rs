//! Moola - Biased Coin-Flip Bankroll Engine
//!
//! Game-simulation core for an educational bankroll game: a player starts
//! with a small balance, stakes it on a coin that favors one side, and tries
//! to reach a target before the clock runs out.
//!
//! This library provides:
//! - Biased outcome generation over an injectable entropy source
//! - Wager validation and single-flip balance transitions
//! - Betting-pattern analysis (consistency score, behavioral bias flags)
//! - A capped Kelly-criterion reference player for comparison baselines
//!
//! # Example
//!
//! ```no_run
//! use moola::config::GameConfig;
//! use moola::games::{analyze, OsEntropy, Side};
//! use moola::session::GameSession;
//! use rust_decimal_macros::dec;
//!
//! let mut session = GameSession::new(GameConfig::default(), OsEntropy)?;
//! let result = session.place_wager(dec!(2.50), Side::A)?;
//! println!("balance now {}", result.balance());
//!
//! let stats = analyze(session.history());
//! println!("consistency {:.0}", stats.consistency_score);
//! # Ok::<(), moola::errors::EngineError>(())
//! ```

pub mod config;
pub mod errors;
pub mod format;
pub mod games;
pub mod session;
pub mod simulation;

pub use config::GameConfig;
pub use errors::{EngineError, EngineResult};
pub use games::{
    analyze, generate_outcome, is_valid_wager, process_wager, simulate_optimal_play,
    BehavioralPattern, BettingStatistics, EntropySource, FlipResult, OptimalPlayResult, Side,
    WagerOutcome, WagerRecord,
};
pub use session::{GameSession, SessionStatus, SessionSummary};
