use crate::config::GameConfig;
use crate::games::types::{floor_cents, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether `amount` may be staked: positive, at least the minimum, at most the balance
pub fn is_valid_wager(amount: Money, balance: Money, min_wager: Money) -> bool {
    amount > Decimal::ZERO && amount >= min_wager && amount <= balance
}

/// How a quick-bet chip derives its amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ChipKind {
    Percentage(u32),
    Fixed(Money),
}

/// One quick-bet shortcut offered for the current balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QuickChip {
    pub kind: ChipKind,
    pub amount: Money,
}

/// Quick-bet chips valid at `balance`: percentage chips first, then fixed ones
pub fn quick_chips(config: &GameConfig, balance: Money) -> Vec<QuickChip> {
    let percentage = config.quick_chip_percentages.iter().map(|pct| QuickChip {
        kind: ChipKind::Percentage(*pct),
        amount: floor_cents(balance * Decimal::from(*pct) / Decimal::ONE_HUNDRED),
    });
    let fixed = config.quick_chip_amounts.iter().map(|amount| QuickChip {
        kind: ChipKind::Fixed(*amount),
        amount: *amount,
    });

    percentage
        .chain(fixed)
        .filter(|chip| is_valid_wager(chip.amount, balance, config.min_wager))
        .collect()
}
