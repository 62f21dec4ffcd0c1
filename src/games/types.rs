use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency amount. Exact decimal, non-negative, in whole cents.
pub type Money = Decimal;

/// Truncate an amount to whole cents
pub fn floor_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Coin side. `A` is the favored side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side {
    #[serde(rename = "heads")]
    A,
    #[serde(rename = "tails")]
    B,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "heads"),
            Side::B => write!(f, "tails"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heads" | "h" | "a" => Ok(Side::A),
            "tails" | "t" | "b" => Ok(Side::B),
            other => Err(format!("Unknown side '{}', expected heads or tails", other)),
        }
    }
}

/// Result of resolving one valid wager
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WagerOutcome {
    /// Side the coin landed on
    pub side: Side,
    pub won: bool,
    pub balance_before: Money,
    pub balance_after: Money,
    pub wager_amount: Money,
}

/// Flip processor result: either a resolved wager or a rejected one
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FlipResult {
    Resolved(WagerOutcome),
    /// The wager failed validation; balance is unchanged
    Invalid { balance: Money },
}

impl FlipResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, FlipResult::Resolved(_))
    }

    /// Balance after the flip (unchanged for an invalid wager)
    pub fn balance(&self) -> Money {
        match self {
            FlipResult::Resolved(outcome) => outcome.balance_after,
            FlipResult::Invalid { balance } => *balance,
        }
    }

    pub fn outcome(&self) -> Option<&WagerOutcome> {
        match self {
            FlipResult::Resolved(outcome) => Some(outcome),
            FlipResult::Invalid { .. } => None,
        }
    }
}

/// One entry of a session's append-only wager history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WagerRecord {
    /// 1-based, contiguous within a session
    pub flip_number: u64,
    pub chosen_side: Side,
    #[serde(flatten)]
    pub outcome: WagerOutcome,
    pub timestamp: DateTime<Utc>,
}

impl WagerRecord {
    pub fn new(
        flip_number: u64,
        chosen_side: Side,
        outcome: WagerOutcome,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            flip_number,
            chosen_side,
            outcome,
            timestamp,
        }
    }

    pub fn wager_amount(&self) -> Money {
        self.outcome.wager_amount
    }

    pub fn won(&self) -> bool {
        self.outcome.won
    }

    /// Side the coin landed on
    pub fn result_side(&self) -> Side {
        self.outcome.side
    }
}

/// Behavioral bias flags derived from a wager history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BehavioralPattern {
    /// Switching sides after an outcome streak
    GamblersFallacy,
    /// Betting much more right after a win
    Overconfidence,
    /// Raising the stake right after a loss
    LossChasing,
    /// Sticking with the side that just won. Not detected yet.
    HotHand,
    /// Sticking to the opening bet size. Not detected yet.
    Anchoring,
}

impl fmt::Display for BehavioralPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BehavioralPattern::GamblersFallacy => "gamblers_fallacy",
            BehavioralPattern::Overconfidence => "overconfidence",
            BehavioralPattern::LossChasing => "loss_chasing",
            BehavioralPattern::HotHand => "hot_hand",
            BehavioralPattern::Anchoring => "anchoring",
        };
        write!(f, "{}", name)
    }
}

/// Aggregate statistics over a wager history, recomputed on every call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BettingStatistics {
    pub average_wager_percentage: f64,
    /// Population standard deviation of the per-wager balance percentage
    pub wager_percentage_std_dev: f64,
    pub switch_rate: f64,
    pub gamblers_fallacy_count: u32,
    /// 0..=100, higher means steadier stake sizing
    pub consistency_score: f64,
    /// Each pattern at most once, in the order first detected
    pub behavioral_flags: Vec<BehavioralPattern>,
}

impl BettingStatistics {
    /// Neutral result for an empty history
    pub fn baseline() -> Self {
        Self {
            average_wager_percentage: 0.0,
            wager_percentage_std_dev: 0.0,
            switch_rate: 0.0,
            gamblers_fallacy_count: 0,
            consistency_score: 100.0,
            behavioral_flags: Vec::new(),
        }
    }

    pub fn has_flag(&self, pattern: BehavioralPattern) -> bool {
        self.behavioral_flags.contains(&pattern)
    }
}
