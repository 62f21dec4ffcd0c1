//! Display helpers for amounts, the session clock and flip messages

use crate::games::Money;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const WIN_MESSAGES: [&str; 5] = ["Nice one!", "Winner!", "You got it!", "Great call!", "Boom!"];

const LOSS_MESSAGES: [&str; 5] = [
    "Not this time!",
    "Close one!",
    "Next flip!",
    "Keep going!",
    "Almost!",
];

/// US-dollar formatting with thousands separators, e.g. `$1,234.56`
pub fn format_currency(amount: Money) -> String {
    let cents = (amount.abs() * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u128()
        .unwrap_or(0);
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// `M:SS`, rounding partial seconds up so the clock never shows 0:00 early
pub fn format_time_remaining(milliseconds: i64) -> String {
    let total_seconds = (milliseconds.max(0) + 999) / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Short message for a resolved flip, rotating with the flip number
pub fn outcome_message(won: bool, flip_number: u64) -> &'static str {
    let messages = if won { &WIN_MESSAGES } else { &LOSS_MESSAGES };
    messages[(flip_number as usize) % messages.len()]
}
