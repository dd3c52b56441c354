//! Monetary rounding at the fixed 2-decimal scale.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`.
//!
//! Reports and journal totals use commercial rounding (round half away from
//! zero), not the banker's rounding used for currency conversion.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to [`MONEY_SCALE`] using round-half-up.
///
/// ```
/// use rust_decimal_macros::dec;
/// use contab_shared::types::round_money;
///
/// assert_eq!(round_money(dec!(2.345)), dec!(2.35));
/// assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
/// ```
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Returns true if both amounts are equal at the monetary scale.
#[must_use]
pub fn same_money(a: Decimal, b: Decimal) -> bool {
    round_money(a) == round_money(b)
}
