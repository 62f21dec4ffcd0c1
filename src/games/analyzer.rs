//! Betting pattern analysis over a wager history
//!
//! Everything here is a pure function of the record slice. Statistics are
//! recomputed from scratch on every call; nothing is cached between calls.

use crate::games::types::{BehavioralPattern, BettingStatistics, Money, WagerRecord};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Consistency points lost per percentage point of stake std dev
const CONSISTENCY_PENALTY: f64 = 4.0;

/// Gambler's-fallacy switches needed before the flag is raised
const GAMBLERS_FALLACY_THRESHOLD: u32 = 2;

/// Stake growth after a loss that counts as chasing
const LOSS_CHASING_MULTIPLIER: Money = dec!(1.5);

/// Stake growth after a win that counts as overconfidence
const OVERCONFIDENCE_MULTIPLIER: Money = dec!(2);

/// Derive betting statistics and behavioral flags from an ordered history
pub fn analyze(history: &[WagerRecord]) -> BettingStatistics {
    if history.is_empty() {
        return BettingStatistics::baseline();
    }

    let percentages: Vec<f64> = history.iter().map(wager_percentage).collect();
    let count = percentages.len() as f64;

    let average = percentages.iter().sum::<f64>() / count;
    let variance = percentages
        .iter()
        .map(|pct| (pct - average).powi(2))
        .sum::<f64>()
        / count;
    let std_dev = variance.sqrt();

    let consistency_score = (100.0 - CONSISTENCY_PENALTY * std_dev).clamp(0.0, 100.0);

    let (gamblers_fallacy_count, behavioral_flags) = detect_patterns(history);

    BettingStatistics {
        average_wager_percentage: average,
        wager_percentage_std_dev: std_dev,
        switch_rate: switch_rate(history),
        gamblers_fallacy_count,
        consistency_score,
        behavioral_flags,
    }
}

/// Stake as a percentage of the balance it was placed against.
/// A zero balance yields 0 instead of dividing by zero.
fn wager_percentage(record: &WagerRecord) -> f64 {
    (record.outcome.wager_amount * Decimal::ONE_HUNDRED)
        .checked_div(record.outcome.balance_before)
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}

/// Percentage of adjacent pairs where the chosen side changed
fn switch_rate(history: &[WagerRecord]) -> f64 {
    if history.len() <= 1 {
        return 0.0;
    }

    let switches = history
        .windows(2)
        .filter(|pair| pair[0].chosen_side != pair[1].chosen_side)
        .count();

    switches as f64 / (history.len() - 1) as f64 * 100.0
}

/// Scan every consecutive triple. The gambler's-fallacy counter never resets
/// and the scan always covers the whole history.
fn detect_patterns(history: &[WagerRecord]) -> (u32, Vec<BehavioralPattern>) {
    let mut flags = Vec::new();
    let mut gamblers_fallacy_count = 0u32;

    for triple in history.windows(3) {
        let (before_previous, previous, current) = (&triple[0], &triple[1], &triple[2]);

        if previous.result_side() == before_previous.result_side()
            && current.chosen_side != previous.chosen_side
        {
            gamblers_fallacy_count += 1;
            if gamblers_fallacy_count >= GAMBLERS_FALLACY_THRESHOLD {
                raise(&mut flags, BehavioralPattern::GamblersFallacy);
            }
        }

        if !previous.won()
            && current.wager_amount() > previous.wager_amount() * LOSS_CHASING_MULTIPLIER
        {
            raise(&mut flags, BehavioralPattern::LossChasing);
        }

        if previous.won()
            && current.wager_amount() > previous.wager_amount() * OVERCONFIDENCE_MULTIPLIER
        {
            raise(&mut flags, BehavioralPattern::Overconfidence);
        }
    }

    (gamblers_fallacy_count, flags)
}

fn raise(flags: &mut Vec<BehavioralPattern>, pattern: BehavioralPattern) {
    if !flags.contains(&pattern) {
        flags.push(pattern);
    }
}
