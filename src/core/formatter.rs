use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::period::BillingPeriod;

/// Round a USD amount to cents, half away from zero.
///
/// Result always has exactly two decimal places and never carries a negative
/// sign on zero.
pub fn round_usd(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Returns "123.46" for 123.456.
pub fn format_usd(amount: Decimal) -> String {
    round_usd(amount).to_string()
}

/// Returns "06/01～06/14" for the period [06/01, 06/15).
pub fn format_period(period: &BillingPeriod) -> String {
    format!(
        "{}～{}",
        period.start.format("%m/%d"),
        period.last_day().format("%m/%d")
    )
}

/// Returns "10.0 GB". The quantity text is not reparsed.
pub fn format_quantity(quantity: &str, unit: &str) -> String {
    format!("{} {}", quantity, unit)
}
