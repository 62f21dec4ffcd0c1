//! In-memory game session
//!
//! A `GameSession` owns one player's balance, timer and append-only wager
//! history, and drives the flip processor. Sessions share nothing, so any
//! number of them can run side by side.

use crate::config::GameConfig;
use crate::errors::{EngineError, EngineResult};
use crate::games::{
    analyze, BettingStatistics, EntropySource, FlipProcessor, FlipResult, Money, Side, WagerRecord,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    /// Balance reached the target
    Won,
    /// Balance fell below the minimum wager
    Lost,
    /// Timer ran out first
    #[serde(rename = "timeout")]
    TimedOut,
}

impl SessionStatus {
    pub fn is_active(self) -> bool {
        self == SessionStatus::Active
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Won => write!(f, "won"),
            SessionStatus::Lost => write!(f, "lost"),
            SessionStatus::TimedOut => write!(f, "timeout"),
        }
    }
}

/// End-of-session report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub initial_balance: Money,
    pub final_balance: Money,
    pub total_flips: u64,
    pub win_count: u64,
    pub loss_count: u64,
    pub largest_wager: Money,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub statistics: BettingStatistics,
}

pub struct GameSession<E: EntropySource> {
    id: Uuid,
    processor: FlipProcessor<E>,
    balance: Money,
    history: Vec<WagerRecord>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    status: SessionStatus,
}

impl<E: EntropySource> GameSession<E> {
    /// Start a session now
    pub fn new(config: GameConfig, source: E) -> EngineResult<Self> {
        Self::start_at(config, source, Utc::now())
    }

    /// Start a session with an explicit start time
    pub fn start_at(
        config: GameConfig,
        source: E,
        started_at: DateTime<Utc>,
    ) -> EngineResult<Self> {
        config.validate()?;

        let id = Uuid::new_v4();
        let balance = config.initial_balance;
        tracing::info!(
            "Session {} started: balance {} target {}",
            id,
            balance,
            config.target_balance
        );

        Ok(Self {
            id,
            processor: FlipProcessor::new(config, source),
            balance,
            history: Vec::new(),
            started_at,
            ended_at: None,
            status: SessionStatus::Active,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        self.processor.config()
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Wager history in flip order
    pub fn history(&self) -> &[WagerRecord] {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time left on the session clock at `now`, never negative
    pub fn time_remaining_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        let deadline = self.started_at + self.config().session_duration();
        (deadline - now).max(chrono::Duration::zero())
    }

    pub fn time_remaining(&self) -> chrono::Duration {
        self.time_remaining_at(Utc::now())
    }

    /// Close the session if the clock has run out at `now`
    pub fn check_timeout_at(&mut self, now: DateTime<Utc>) -> SessionStatus {
        if self.status.is_active() && self.time_remaining_at(now).is_zero() {
            let status = if self.balance >= self.config().target_balance {
                SessionStatus::Won
            } else {
                SessionStatus::TimedOut
            };
            self.close(status, now);
        }
        self.status
    }

    pub fn place_wager(&mut self, amount: Money, side: Side) -> EngineResult<FlipResult> {
        self.place_wager_at(amount, side, Utc::now())
    }

    /// Resolve a wager at `now`. Invalid wagers leave balance and history
    /// untouched; wagers on a closed session are errors.
    pub fn place_wager_at(
        &mut self,
        amount: Money,
        side: Side,
        now: DateTime<Utc>,
    ) -> EngineResult<FlipResult> {
        let status = self.check_timeout_at(now);
        if !status.is_active() {
            return Err(EngineError::SessionClosed { status });
        }

        let result = self.processor.process(amount, side, self.balance)?;

        if let FlipResult::Resolved(outcome) = result {
            let flip_number = self.history.len() as u64 + 1;
            self.history.push(WagerRecord::new(flip_number, side, outcome, now));
            self.balance = outcome.balance_after;

            if self.balance >= self.config().target_balance {
                self.close(SessionStatus::Won, now);
            } else if self.balance < self.config().min_wager {
                self.close(SessionStatus::Lost, now);
            }
        }

        Ok(result)
    }

    /// Current statistics over the full history
    pub fn statistics(&self) -> BettingStatistics {
        analyze(&self.history)
    }

    pub fn summary(&self) -> SessionSummary {
        let win_count = self.history.iter().filter(|r| r.won()).count() as u64;
        let largest_wager = self
            .history
            .iter()
            .map(|r| r.wager_amount())
            .max()
            .unwrap_or(Decimal::ZERO);

        SessionSummary {
            session_id: self.id,
            status: self.status,
            initial_balance: self.config().initial_balance,
            final_balance: self.balance,
            total_flips: self.history.len() as u64,
            win_count,
            loss_count: self.history.len() as u64 - win_count,
            largest_wager,
            started_at: self.started_at,
            ended_at: self.ended_at,
            statistics: self.statistics(),
        }
    }

    fn close(&mut self, status: SessionStatus, now: DateTime<Utc>) {
        self.status = status;
        self.ended_at = Some(now);
        tracing::info!(
            "Session {} finished ({}) after {} flips with balance {}",
            self.id,
            status,
            self.history.len(),
            self.balance
        );
    }
}
