use crate::config::GameConfig;
use crate::errors::EngineResult;
use crate::games::entropy::{generate_outcome, EntropySource};
use crate::games::types::{FlipResult, Money, Side, WagerOutcome};
use crate::games::validator::is_valid_wager;
use rust_decimal::Decimal;

/// Resolve one wager against a fresh outcome draw.
///
/// An invalid wager returns `FlipResult::Invalid` with the balance unchanged
/// and leaves the entropy source untouched.
pub fn process_wager<E: EntropySource + ?Sized>(
    amount: Money,
    chosen_side: Side,
    balance: Money,
    config: &GameConfig,
    source: &mut E,
) -> EngineResult<FlipResult> {
    if !is_valid_wager(amount, balance, config.min_wager) {
        tracing::debug!("Rejected wager of {} against balance {}", amount, balance);
        return Ok(FlipResult::Invalid { balance });
    }

    let side = generate_outcome(source, config.side_a_bias)?;
    let won = side == chosen_side;
    let new_balance = if won { balance + amount } else { balance - amount };

    let outcome = WagerOutcome {
        side,
        won,
        balance_before: balance,
        balance_after: new_balance.max(Decimal::ZERO),
        wager_amount: amount,
    };

    tracing::debug!(
        "Flip landed {} ({}): {} -> {}",
        side,
        if won { "win" } else { "loss" },
        outcome.balance_before,
        outcome.balance_after
    );

    Ok(FlipResult::Resolved(outcome))
}

/// Flip processor bound to one configuration and entropy source
pub struct FlipProcessor<E: EntropySource> {
    config: GameConfig,
    source: E,
}

impl<E: EntropySource> FlipProcessor<E> {
    pub fn new(config: GameConfig, source: E) -> Self {
        Self { config, source }
    }

    /// Process a wager at the given balance
    pub fn process(
        &mut self,
        amount: Money,
        chosen_side: Side,
        balance: Money,
    ) -> EngineResult<FlipResult> {
        process_wager(amount, chosen_side, balance, &self.config, &mut self.source)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn source(&self) -> &E {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use crate::games::entropy::{SeededEntropy, SequenceEntropy};
    use crate::games::types::floor_cents;
    use rust_decimal_macros::dec;

    #[test]
    fn test_win_adds_stake() {
        let config = GameConfig::default();
        let mut source = SequenceEntropy::constant(0.1);

        let result = process_wager(dec!(5), Side::A, dec!(25), &config, &mut source).unwrap();
        let outcome = result.outcome().unwrap();
        assert_eq!(outcome.side, Side::A);
        assert!(outcome.won);
        assert_eq!(outcome.balance_before, dec!(25));
        assert_eq!(outcome.balance_after, dec!(30));
        assert_eq!(outcome.wager_amount, dec!(5));
    }

    #[test]
    fn test_loss_subtracts_stake() {
        let config = GameConfig::default();
        let mut source = SequenceEntropy::constant(0.9);

        let result = process_wager(dec!(5), Side::A, dec!(25), &config, &mut source).unwrap();
        let outcome = result.outcome().unwrap();
        assert_eq!(outcome.side, Side::B);
        assert!(!outcome.won);
        assert_eq!(result.balance(), dec!(20));
    }

    #[test]
    fn test_fractional_loss_leaves_exact_cents() {
        let config = GameConfig::default();
        let mut source = SequenceEntropy::constant(0.9);

        let first = process_wager(dec!(24.30), Side::A, dec!(25.00), &config, &mut source).unwrap();
        assert_eq!(first.balance(), dec!(0.70));

        let balance = first.balance();
        let all_in = process_wager(dec!(0.70), Side::A, balance, &config, &mut source).unwrap();
        assert!(all_in.is_valid());
        assert_eq!(all_in.balance(), Decimal::ZERO);
    }

    #[test]
    fn test_invalid_wager_consumes_no_entropy() {
        let config = GameConfig::default();
        let mut source = SequenceEntropy::constant(0.1);

        for amount in [dec!(0), dec!(-1), dec!(25.01), dec!(0.001)] {
            let result = process_wager(amount, Side::A, dec!(25), &config, &mut source).unwrap();
            assert_eq!(result, FlipResult::Invalid { balance: dec!(25) });
        }
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_all_in_loss_floors_at_zero() {
        let config = GameConfig::default();
        let mut source = SequenceEntropy::constant(0.9);

        let result = process_wager(dec!(25), Side::A, dec!(25), &config, &mut source).unwrap();
        assert_eq!(result.balance(), Decimal::ZERO);
    }

    #[test]
    fn test_balance_bound_holds() {
        let config = GameConfig::default();
        let mut source = SeededEntropy::new(11);
        let mut balance = dec!(25);

        for i in 0..500 {
            let side = if i % 3 == 0 { Side::B } else { Side::A };
            let amount = floor_cents(balance * dec!(0.2)).max(config.min_wager);
            match process_wager(amount, side, balance, &config, &mut source).unwrap() {
                FlipResult::Resolved(outcome) => {
                    let expected = if outcome.won {
                        outcome.balance_before + outcome.wager_amount
                    } else {
                        outcome.balance_before - outcome.wager_amount
                    };
                    assert!(outcome.balance_after >= Decimal::ZERO);
                    assert_eq!(outcome.balance_after, expected.max(Decimal::ZERO));
                    assert_eq!(outcome.balance_after, floor_cents(outcome.balance_after));
                    assert_eq!(outcome.won, outcome.side == side);
                    balance = outcome.balance_after;
                }
                FlipResult::Invalid { balance: unchanged } => {
                    assert_eq!(unchanged, balance);
                    break;
                }
            }
        }
    }

    #[test]
    fn test_entropy_failure_propagates() {
        let config = GameConfig::default();
        let mut processor = FlipProcessor::new(config, SequenceEntropy::new(Vec::new()));

        match processor.process(dec!(1), Side::A, dec!(25)) {
            Err(EngineError::RandomnessUnavailable(_)) => {}
            other => panic!("expected RandomnessUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_processor_is_deterministic_for_fixed_stream() {
        let run = || {
            let mut processor = FlipProcessor::new(GameConfig::default(), SeededEntropy::new(3));
            (0..20)
                .map(|_| processor.process(dec!(1), Side::A, dec!(25)).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
