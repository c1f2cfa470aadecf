//! Money rounding.
//!
//! Amounts are `Decimal` end to end, in memory and in the store. Everything that
//! is written gets rounded to cents first.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for money values.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to cents, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
