//! Kelly criterion reference strategy
//!
//! For an even-money bet the Kelly fraction is
//!     f* = (b*p - q) / b = p - q
//! where b = 1 (net odds), p = probability of winning, q = 1 - p.
//!
//! The reference player always backs the favored side and never stakes more
//! than 15% of the current balance, whatever Kelly recommends. Stakes are
//! truncated to whole cents, and the run ends once the stake would fall below
//! the minimum wager.

use crate::config::GameConfig;
use crate::errors::EngineResult;
use crate::games::entropy::{generate_outcome, EntropySource};
use crate::games::types::{floor_cents, Money, Side};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Default step budget for one simulated run
pub const DEFAULT_MAX_STEPS: u32 = 100;

/// Hard cap on a single stake as a fraction of the balance
pub const MAX_STAKE_FRACTION: Decimal = dec!(0.15);

/// Even-money odds
const NET_ODDS: Decimal = Decimal::ONE;

/// Terminal state of one optimal-play run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OptimalPlayResult {
    pub final_balance: Money,
    pub steps_used: u32,
    pub reached_target: bool,
}

/// Full Kelly fraction for an even-money bet won with probability `bias`.
/// Negative when the bet has no edge.
pub fn kelly_fraction(bias: f64) -> Decimal {
    let p = Decimal::from_f64(bias).unwrap_or(Decimal::ZERO);
    let q = Decimal::ONE - p;
    (NET_ODDS * p - q) / NET_ODDS
}

/// Raw Kelly stake for `balance`
pub fn kelly_stake(balance: Money, bias: f64) -> Money {
    balance * kelly_fraction(bias)
}

/// Stake the reference strategy actually places: Kelly capped at 15%,
/// never negative, in whole cents
pub fn capped_stake(balance: Money, bias: f64) -> Money {
    let stake = kelly_stake(balance, bias)
        .min(balance * MAX_STAKE_FRACTION)
        .max(Decimal::ZERO);
    floor_cents(stake)
}

/// Play the capped-Kelly strategy until the target is reached, the balance
/// or the next stake drops below `min_wager`, or `max_steps` flips have been
/// made. Stops before drawing when the stake is too small.
pub fn simulate_optimal_play<E: EntropySource + ?Sized>(
    initial_balance: Money,
    target_balance: Money,
    bias: f64,
    min_wager: Money,
    max_steps: u32,
    source: &mut E,
) -> EngineResult<OptimalPlayResult> {
    let mut balance = initial_balance;
    let mut steps = 0u32;

    while balance >= min_wager && balance < target_balance && steps < max_steps {
        let stake = capped_stake(balance, bias);
        if stake < min_wager {
            break;
        }

        let won = generate_outcome(source, bias)? == Side::A;
        balance = (if won { balance + stake } else { balance - stake }).max(Decimal::ZERO);
        steps += 1;
    }

    Ok(OptimalPlayResult {
        final_balance: balance,
        steps_used: steps,
        reached_target: balance >= target_balance,
    })
}

/// [`simulate_optimal_play`] with the session parameters from `config`
pub fn simulate_with_config<E: EntropySource + ?Sized>(
    config: &GameConfig,
    max_steps: u32,
    source: &mut E,
) -> EngineResult<OptimalPlayResult> {
    simulate_optimal_play(
        config.initial_balance,
        config.target_balance,
        config.side_a_bias,
        config.min_wager,
        max_steps,
        source,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::entropy::{SeededEntropy, SequenceEntropy};

    #[test]
    fn test_kelly_fraction() {
        assert!((kelly_fraction(0.6) - dec!(0.2)).abs() < dec!(0.000001));
        assert!(kelly_fraction(0.5).is_zero());
        assert!(kelly_fraction(0.4) < Decimal::ZERO);
        assert!((kelly_stake(dec!(50), 0.6) - dec!(10)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_stake_cap_applies() {
        // Kelly says 20%, cap is 15%
        assert_eq!(capped_stake(dec!(100), 0.6), dec!(15));
        // Below the cap Kelly wins
        assert_eq!(capped_stake(dec!(100), 0.55), dec!(10));
        // No edge, no bet
        assert_eq!(capped_stake(dec!(100), 0.45), Decimal::ZERO);
        // Truncated to cents
        assert_eq!(capped_stake(dec!(21.25), 0.6), dec!(3.18));
    }

    #[test]
    fn test_always_winning_reaches_target() {
        let mut source = SequenceEntropy::constant(0.0);
        let result =
            simulate_optimal_play(dec!(25), dec!(150), 0.6, dec!(0.01), 100, &mut source).unwrap();

        assert!(result.reached_target);
        assert_eq!(result.steps_used, 13);
        assert_eq!(result.final_balance, dec!(153.67));
        assert_eq!(source.draws(), 13);
    }

    #[test]
    fn test_always_losing_stops_on_step_budget() {
        let mut source = SequenceEntropy::constant(0.99);
        let result =
            simulate_optimal_play(dec!(25), dec!(150), 0.6, dec!(0.01), 10, &mut source).unwrap();

        assert!(!result.reached_target);
        assert_eq!(result.steps_used, 10);
        assert_eq!(result.final_balance, dec!(4.95));
    }

    #[test]
    fn test_always_losing_stops_when_stake_rounds_to_nothing() {
        let mut source = SequenceEntropy::constant(0.99);
        let result =
            simulate_optimal_play(dec!(25), dec!(150), 0.6, dec!(0.01), 100, &mut source).unwrap();

        // At 0.06 the 15% stake truncates to 0.00
        assert_eq!(result.steps_used, 41);
        assert_eq!(result.final_balance, dec!(0.06));
        assert_eq!(source.draws(), 41);
    }

    #[test]
    fn test_stake_below_min_wager_stops_early() {
        let mut source = SequenceEntropy::constant(0.99);
        let result =
            simulate_optimal_play(dec!(10), dec!(150), 0.6, dec!(1), 100, &mut source).unwrap();

        // 10.00 -> 8.50 -> 7.23 -> 6.15, then the stake would be 0.92
        assert_eq!(result.steps_used, 3);
        assert_eq!(result.final_balance, dec!(6.15));
        assert!(result.final_balance >= dec!(1));
        assert!(!result.reached_target);
    }

    #[test]
    fn test_no_edge_places_no_bets() {
        let mut source = SequenceEntropy::constant(0.9);
        let result =
            simulate_optimal_play(dec!(25), dec!(150), 0.45, dec!(0.01), 100, &mut source).unwrap();

        assert_eq!(result.steps_used, 0);
        assert_eq!(result.final_balance, dec!(25));
        assert!(!result.reached_target);
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_random_runs_terminate() {
        let config = GameConfig::default();
        let mut source = SeededEntropy::new(2024);
        for _ in 0..200 {
            let result = simulate_with_config(&config, DEFAULT_MAX_STEPS, &mut source).unwrap();
            assert!(result.steps_used <= DEFAULT_MAX_STEPS);
            assert!(result.final_balance >= Decimal::ZERO);
            assert_eq!(result.reached_target, result.final_balance >= config.target_balance);
        }
    }

    #[test]
    fn test_already_at_target_takes_no_steps() {
        let mut source = SequenceEntropy::new(Vec::new());
        let result =
            simulate_optimal_play(dec!(200), dec!(150), 0.6, dec!(0.01), 100, &mut source).unwrap();
        assert_eq!(result.steps_used, 0);
        assert!(result.reached_target);
    }
}
