//! Turkish-locale display formatting for amounts and rates.
//!
//! Thousands are grouped with `.`, the decimal mark is `,`, percentages put
//! the sign first (`%3,50`). Rounding is half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// Currency suffix for Turkish lira.
pub const CURRENCY_SUFFIX: &str = "TL";

/// Round to kuruş (2 dp).
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `1234567.891` with 2 dp becomes `1.234.567,89`.
pub fn format_amount(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// `1234.5` becomes `1.234,50 TL`.
pub fn format_currency(value: Money) -> String {
    format!("{} {CURRENCY_SUFFIX}", format_amount(value, 2))
}

/// Fraction to percentage: `0.035` becomes `%3,50`.
pub fn format_percent(rate: Rate, decimals: u32) -> String {
    let pct = rate * dec!(100);
    let body = format_amount(pct, decimals);
    match body.strip_prefix('-') {
        Some(abs) => format!("-%{abs}"),
        None => format!("%{body}"),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
