//! Money
//!
//! Storefront amounts are whole rupiah carried as [`Decimal`] so that backend
//! prices such as `"10000.00"` round-trip without float error.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso};

/// Amount in rupiah (currency units, not cents).
pub type Amount = Decimal;

/// Wrap an amount as IDR money.
pub fn rupiah(amount: Amount) -> Money<'static, iso::Currency> {
    Money::from_decimal(amount, iso::IDR)
}

/// Format an amount the way the storefront displays it, e.g. `Rp 35.000`.
///
/// Amounts are rounded to whole rupiah and grouped with `.` separators.
pub fn format_rupiah(amount: Amount) -> String {
    let money = rupiah(amount);
    let rounded = money
        .amount()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().to_string();
    let whole = digits.split('.').next().unwrap_or_default();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{} {sign}{grouped}", money.currency().symbol)
}
