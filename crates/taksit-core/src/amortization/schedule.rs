//! Fixed-payment (annuity) amortization schedules.
//!
//! One constant payment per period, split into interest on the opening
//! balance and principal that reduces it. All math in `rust_decimal::Decimal`,
//! so identical terms always produce bit-identical schedules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaksitError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::TaksitResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest schedule accepted (300 years of monthly payments).
pub const MAX_PERIOD_COUNT: u32 = 3600;

/// Final-period residue tolerance, as a fraction of principal.
const SETTLEMENT_TOLERANCE: Decimal = dec!(0.000001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Terms of a level-payment loan, with the rate already per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed.
    pub principal: Money,
    /// Interest per period as a fraction (0.035 = 3.5%).
    pub periodic_rate: Rate,
    /// Number of equal payment periods.
    pub period_count: u32,
    /// Accept `periodic_rate == 0` as an interest-free loan.
    #[serde(default)]
    pub allow_zero_rate: bool,
}

impl LoanTerms {
    pub fn new(principal: Money, periodic_rate: Rate, period_count: u32) -> Self {
        Self {
            principal,
            periodic_rate,
            period_count,
            allow_zero_rate: false,
        }
    }

    /// Opt into the interest-free edge case.
    pub fn allowing_zero_rate(mut self) -> Self {
        self.allow_zero_rate = true;
        self
    }
}

/// A single row of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEntry {
    /// 1-based period number.
    pub period_index: u32,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Balance after this period, never negative.
    pub remaining_balance: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub periodic_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub schedule: Vec<PeriodEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the level payment and full schedule for `terms`.
///
/// Fails with `InvalidInput` naming the offending field before any
/// computation starts; there is no partial result.
pub fn compute_amortization(terms: &LoanTerms) -> TaksitResult<AmortizationResult> {
    amortize(terms).map(|(result, _)| result)
}

/// Same as [`compute_amortization`], wrapped in the standard output envelope.
pub fn build_amortization_schedule(
    terms: &LoanTerms,
) -> TaksitResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let (result, final_residue) = amortize(terms)?;

    let mut warnings: Vec<String> = Vec::new();
    if terms.periodic_rate.is_zero() {
        warnings.push("Zero periodic rate: schedule is straight-line with no interest".into());
    }
    if final_residue.abs() > terms.principal * SETTLEMENT_TOLERANCE {
        warnings.push(format!(
            "Final-period residue of {final_residue} exceeded tolerance and was settled to zero"
        ));
    }

    let methodology = if terms.periodic_rate.is_zero() {
        "Straight-line repayment (zero interest)"
    } else {
        "Level-payment annuity amortization"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "periodic_rate": terms.periodic_rate.to_string(),
            "period_count": terms.period_count,
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn validate(terms: &LoanTerms) -> TaksitResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(TaksitError::invalid(
            "principal",
            "Loan principal must be positive",
        ));
    }
    if terms.periodic_rate < Decimal::ZERO {
        return Err(TaksitError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }
    if terms.periodic_rate.is_zero() && !terms.allow_zero_rate {
        return Err(TaksitError::invalid(
            "periodic_rate",
            "Periodic rate must be positive (set allow_zero_rate for interest-free loans)",
        ));
    }
    if terms.period_count == 0 {
        return Err(TaksitError::invalid(
            "period_count",
            "Number of periods must be at least 1",
        ));
    }
    if terms.period_count > MAX_PERIOD_COUNT {
        return Err(TaksitError::invalid(
            "period_count",
            format!("Number of periods must not exceed {MAX_PERIOD_COUNT}"),
        ));
    }
    Ok(())
}

fn periodic_payment(terms: &LoanTerms) -> TaksitResult<Money> {
    let n = terms.period_count;
    let rate = terms.periodic_rate;

    if rate.is_zero() {
        return Ok(terms.principal / Decimal::from(n));
    }

    let factor = time_value::growth_factor(rate, n).map_err(|_| {
        TaksitError::invalid(
            "period_count",
            "(1 + periodic_rate)^period_count exceeds Decimal range",
        )
    })?;

    time_value::annuity_from_factor(terms.principal, rate, factor).map_err(|e| match e {
        TaksitError::InvalidInput { reason, .. } => TaksitError::invalid("periodic_rate", reason),
        _ => TaksitError::invalid("principal", "Payment exceeds Decimal range"),
    })
}

/// Run the schedule. Also returns the raw final-period balance that was
/// settled to zero.
fn amortize(terms: &LoanTerms) -> TaksitResult<(AmortizationResult, Money)> {
    validate(terms)?;

    let payment = periodic_payment(terms)?;
    let total_payment = payment
        .checked_mul(Decimal::from(terms.period_count))
        .ok_or_else(|| TaksitError::invalid("principal", "Total repayment exceeds Decimal range"))?;

    let rate = terms.periodic_rate;
    let mut schedule = Vec::with_capacity(terms.period_count as usize);
    let mut balance = terms.principal;
    let mut final_residue = Decimal::ZERO;

    for period_index in 1..=terms.period_count {
        let interest_portion = balance * rate;
        let principal_portion = payment - interest_portion;
        let unclamped = balance - principal_portion;

        balance = if period_index == terms.period_count {
            final_residue = unclamped;
            Decimal::ZERO
        } else {
            unclamped.max(Decimal::ZERO)
        };

        schedule.push(PeriodEntry {
            period_index,
            payment_amount: payment,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
            due_date: None,
        });
    }

    Ok((
        AmortizationResult {
            periodic_payment: payment,
            total_payment,
            total_interest: total_payment - terms.principal,
            schedule,
        },
        final_residue,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.0001);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        assert!(
            (actual - expected).abs() <= tol,
            "{msg}: expected ~{expected}, got {actual}"
        );
    }

    fn short_terms() -> LoanTerms {
        LoanTerms::new(dec!(1000), dec!(0.05), 2)
    }

    #[test]
    fn test_short_loan_payment() {
        let result = compute_amortization(&short_terms()).unwrap();
        assert_close(result.periodic_payment, dec!(537.8049), TOL, "payment");
        assert_eq!(result.schedule.len(), 2);
    }

    #[test]
    fn test_short_loan_rows() {
        let result = compute_amortization(&short_terms()).unwrap();
        let first = &result.schedule[0];
        assert_eq!(first.period_index, 1);
        assert_eq!(first.interest_portion, dec!(50));
        assert_close(first.principal_portion, dec!(487.8049), TOL, "p1 principal");
        assert_close(first.remaining_balance, dec!(512.1951), TOL, "p1 balance");

        let second = &result.schedule[1];
        assert_close(second.interest_portion, dec!(25.6098), TOL, "p2 interest");
        assert_close(second.principal_portion, dec!(512.1951), TOL, "p2 principal");
        assert_eq!(second.remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_interest_on_previous_balance() {
        let terms = LoanTerms::new(dec!(50000), dec!(0.02), 24);
        let result = compute_amortization(&terms).unwrap();
        let mut opening = terms.principal;
        for entry in &result.schedule {
            assert_eq!(entry.interest_portion, opening * terms.periodic_rate);
            opening = entry.remaining_balance;
        }
    }

    #[test]
    fn test_totals_are_derived() {
        let terms = LoanTerms::new(dec!(120000), dec!(0.015), 36);
        let result = compute_amortization(&terms).unwrap();
        assert_eq!(result.total_payment, result.periodic_payment * dec!(36));
        assert_eq!(result.total_interest, result.total_payment - dec!(120000));
    }

    #[test]
    fn test_single_period_loan() {
        let result = compute_amortization(&LoanTerms::new(dec!(1000), dec!(0.1), 1)).unwrap();
        assert_close(result.periodic_payment, dec!(1100), TOL, "payment");
        assert_eq!(result.schedule[0].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_requires_opt_in() {
        let terms = LoanTerms::new(dec!(1200), Decimal::ZERO, 12);
        let err = compute_amortization(&terms).unwrap_err();
        assert_eq!(err.field(), Some("periodic_rate"));
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let terms = LoanTerms::new(dec!(1200), Decimal::ZERO, 12).allowing_zero_rate();
        let result = compute_amortization(&terms).unwrap();
        assert_eq!(result.periodic_payment, dec!(100));
        assert_eq!(result.total_interest, Decimal::ZERO);
        for entry in &result.schedule {
            assert_eq!(entry.interest_portion, Decimal::ZERO);
            assert_eq!(entry.principal_portion, dec!(100));
        }
        assert_eq!(result.schedule[11].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_envelope_warns() {
        let terms = LoanTerms::new(dec!(900), Decimal::ZERO, 3).allowing_zero_rate();
        let output = build_amortization_schedule(&terms).unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert!(output.methodology.contains("zero interest"));
    }

    #[test]
    fn test_negative_rate_rejected_even_with_opt_in() {
        let terms = LoanTerms::new(dec!(1000), dec!(-0.01), 12).allowing_zero_rate();
        let err = compute_amortization(&terms).unwrap_err();
        assert_eq!(err.field(), Some("periodic_rate"));
    }

    #[test]
    fn test_zero_principal_rejected() {
        let err = compute_amortization(&LoanTerms::new(Decimal::ZERO, dec!(0.05), 12)).unwrap_err();
        assert_eq!(err.field(), Some("principal"));
    }

    #[test]
    fn test_zero_periods_rejected() {
        let err = compute_amortization(&LoanTerms::new(dec!(1000), dec!(0.05), 0)).unwrap_err();
        assert_eq!(err.field(), Some("period_count"));
    }

    #[test]
    fn test_too_many_periods_rejected() {
        let terms = LoanTerms::new(dec!(1000), dec!(0.05), MAX_PERIOD_COUNT + 1);
        let err = compute_amortization(&terms).unwrap_err();
        assert_eq!(err.field(), Some("period_count"));
    }

    #[test]
    fn test_growth_overflow_reported_on_period_count() {
        // 1.5^3600 is far beyond Decimal range
        let terms = LoanTerms::new(dec!(1000), dec!(0.5), 3600);
        let err = compute_amortization(&terms).unwrap_err();
        assert_eq!(err.field(), Some("period_count"));
    }

    #[test]
    fn test_envelope_metadata() {
        let output = build_amortization_schedule(&short_terms()).unwrap();
        assert!(output.warnings.is_empty());
        assert_eq!(output.methodology, "Level-payment annuity amortization");
        assert_eq!(output.assumptions["period_count"], 2);
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_allow_zero_rate_defaults_false_in_json() {
        let terms: LoanTerms = serde_json::from_str(
            r#"{"principal":"1000","periodic_rate":"0.05","period_count":2}"#,
        )
        .unwrap();
        assert!(!terms.allow_zero_rate);
        assert_eq!(terms, short_terms());
    }
}
