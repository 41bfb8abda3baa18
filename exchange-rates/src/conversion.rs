//! Multiplier arithmetic between two quotes.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{Operation, RateQuote};

/// Decimal places kept on a conversion multiplier.
pub const MULTIPLIER_SCALE: u32 = 6;

/// Decimal places of a converted amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Units of `target` paid for one unit of `source` under `operation`.
///
/// Both legs use the same side of their quote. Returns `None` when either
/// side has no rate for the operation or the target rate is zero. The
/// multiplier is rounded to [`MULTIPLIER_SCALE`] places and that rounded
/// value is what [`convert`] expects.
pub fn cross_rate(source: &RateQuote, target: &RateQuote, operation: Operation) -> Option<Decimal> {
    let from = source.for_operation(operation)?;
    let to = target.for_operation(operation)?;
    if to.is_zero() {
        return None;
    }
    from.checked_div(to)
        .map(|m| m.round_dp_with_strategy(MULTIPLIER_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Applies a multiplier to an amount, rounded to [`AMOUNT_SCALE`] places.
///
/// Returns `None` when the product does not fit in a `Decimal`.
pub fn convert(amount: Decimal, multiplier: Decimal) -> Option<Decimal> {
    amount.checked_mul(multiplier).map(round_amount)
}

pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
