use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::TaksitError;
use crate::types::{Money, Rate};
use crate::TaksitResult;

/// Compound growth factor (1 + r)^n by repeated checked multiplication.
///
/// Integer exponents only; the result stays exact to Decimal precision
/// instead of going through exp/ln.
pub fn growth_factor(rate: Rate, nper: u32) -> TaksitResult<Decimal> {
    if rate <= dec!(-1) {
        return Err(TaksitError::invalid(
            "rate",
            "Periodic rate must be greater than -100%",
        ));
    }

    let base = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..nper {
        factor = factor.checked_mul(base).ok_or_else(|| TaksitError::Overflow {
            context: format!("growth factor (1 + {rate})^{nper}"),
        })?;
    }
    Ok(factor)
}

/// Level payment that repays `principal` over `nper` periods at `rate`.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> TaksitResult<Money> {
    if nper == 0 {
        return Err(TaksitError::invalid(
            "nper",
            "Number of periods must be > 0",
        ));
    }
    let factor = growth_factor(rate, nper)?;
    annuity_from_factor(principal, rate, factor)
}

/// Level payment given a precomputed growth factor (1+r)^n.
///
/// P·r·(1+r)^n / ((1+r)^n − 1), evaluated as P·r / (1 − (1+r)^−n) so the
/// numerator never grows with n.
pub fn annuity_from_factor(principal: Money, rate: Rate, factor: Decimal) -> TaksitResult<Money> {
    if rate.is_zero() {
        return Err(TaksitError::invalid(
            "rate",
            "Annuity formula is undefined at a zero rate",
        ));
    }

    let complement = discount_complement(rate, factor)?;
    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_div(complement))
        .ok_or_else(|| TaksitError::Overflow {
            context: format!("annuity payment on {principal} at {rate}"),
        })
}

/// Present value of `nper` level payments discounted at `rate`.
pub fn present_value_of_annuity(payment: Money, rate: Rate, nper: u32) -> TaksitResult<Money> {
    if rate.is_zero() {
        return Ok(payment * Decimal::from(nper));
    }

    let factor = growth_factor(rate, nper)?;
    let complement = discount_complement(rate, factor)?;
    Ok(payment * complement / rate)
}

/// 1 − 1/factor, rejected when it collapses to zero.
fn discount_complement(rate: Rate, factor: Decimal) -> TaksitResult<Decimal> {
    if factor.is_zero() {
        return Err(TaksitError::Overflow {
            context: format!("discount factor at rate {rate}"),
        });
    }
    let complement = Decimal::ONE - Decimal::ONE / factor;
    if complement.is_zero() {
        return Err(TaksitError::invalid(
            "rate",
            "Rate is too small to resolve at Decimal precision",
        ));
    }
    Ok(complement)
}
