//! Calculator-form input: raw user figures to validated terms and a dated plan.

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::rates::{self, PaymentFrequency, RateBasis, TaxLoading};
use super::schedule::{build_amortization_schedule, AmortizationResult, LoanTerms};
use crate::error::TaksitError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::TaksitResult;

/// Loan inputs the way a calculator page collects them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: Money,
    /// Quoted rate as a percentage (3.5 means 3.5%).
    pub rate_percent: Decimal,
    #[serde(default)]
    pub rate_basis: RateBasis,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    /// Must be a positive whole number.
    pub period_count: Decimal,
    #[serde(default)]
    pub allow_zero_rate: bool,
    #[serde(default)]
    pub taxes: TaxLoading,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPlan {
    pub terms: LoanTerms,
    pub frequency: PaymentFrequency,
    /// Periodic rate after levies, as charged.
    pub effective_rate: Rate,
    pub annual_equivalent_rate: Rate,
    pub result: AmortizationResult,
}

/// Normalize a request into engine terms.
pub fn to_terms(request: &LoanRequest) -> TaksitResult<LoanTerms> {
    if request.principal <= Decimal::ZERO {
        return Err(TaksitError::invalid(
            "principal",
            "Loan principal must be positive",
        ));
    }
    request.taxes.validate()?;

    let base = rates::periodic_rate(request.rate_percent, request.rate_basis, request.frequency);
    let periodic_rate = rates::tax_loaded_rate(base, &request.taxes)?;

    Ok(LoanTerms {
        principal: request.principal,
        periodic_rate,
        period_count: whole_period_count(request.period_count)?,
        allow_zero_rate: request.allow_zero_rate,
    })
}

/// Build the full plan: terms, schedule and (optionally) due dates.
pub fn plan_loan(request: &LoanRequest) -> TaksitResult<ComputationOutput<LoanPlan>> {
    let start = Instant::now();
    let terms = to_terms(request)?;
    let schedule = build_amortization_schedule(&terms)?;

    let mut result = schedule.result;
    if let Some(first) = request.first_due_date {
        let step = request.frequency.months_between();
        for entry in result.schedule.iter_mut() {
            entry.due_date = Some(due_date(first, step, entry.period_index)?);
        }
    }

    let plan = LoanPlan {
        effective_rate: terms.periodic_rate,
        annual_equivalent_rate: rates::annual_equivalent(terms.periodic_rate, request.frequency)?,
        frequency: request.frequency,
        terms,
        result,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &schedule.methodology,
        &serde_json::json!({
            "principal": request.principal.to_string(),
            "rate_percent": request.rate_percent.to_string(),
            "rate_basis": request.rate_basis,
            "frequency": request.frequency,
            "kkdf": request.taxes.kkdf.to_string(),
            "bsmv": request.taxes.bsmv.to_string(),
        }),
        schedule.warnings,
        elapsed,
        plan,
    ))
}

fn whole_period_count(count: Decimal) -> TaksitResult<u32> {
    if !count.fract().is_zero() {
        return Err(TaksitError::invalid(
            "period_count",
            format!("Number of periods must be a whole number, got {count}"),
        ));
    }
    if count <= Decimal::ZERO {
        return Err(TaksitError::invalid(
            "period_count",
            "Number of periods must be at least 1",
        ));
    }
    count
        .to_u32()
        .ok_or_else(|| TaksitError::invalid("period_count", "Number of periods is too large"))
}

fn due_date(first: NaiveDate, months_step: u32, period_index: u32) -> TaksitResult<NaiveDate> {
    let offset = months_step * (period_index - 1);
    first
        .checked_add_months(Months::new(offset))
        .ok_or_else(|| TaksitError::DateError(format!("Due date for period {period_index} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn monthly_request() -> LoanRequest {
        LoanRequest {
            principal: dec!(100000),
            rate_percent: dec!(2.5),
            rate_basis: RateBasis::Periodic,
            frequency: PaymentFrequency::Monthly,
            period_count: dec!(12),
            allow_zero_rate: false,
            taxes: TaxLoading::default(),
            first_due_date: None,
        }
    }

    #[test]
    fn test_to_terms_periodic_percent() {
        let terms = to_terms(&monthly_request()).unwrap();
        assert_eq!(terms.periodic_rate, dec!(0.025));
        assert_eq!(terms.period_count, 12);
    }

    #[test]
    fn test_to_terms_with_consumer_levies() {
        let mut req = monthly_request();
        req.taxes = TaxLoading::consumer();
        let terms = to_terms(&req).unwrap();
        assert_eq!(terms.periodic_rate, dec!(0.030));
    }

    #[test]
    fn test_fractional_period_count_rejected() {
        let mut req = monthly_request();
        req.period_count = dec!(12.5);
        let err = to_terms(&req).unwrap_err();
        assert_eq!(err.field(), Some("period_count"));
    }

    #[test]
    fn test_negative_period_count_rejected() {
        let mut req = monthly_request();
        req.period_count = dec!(-3);
        assert_eq!(to_terms(&req).unwrap_err().field(), Some("period_count"));
    }

    #[test]
    fn test_whole_count_with_trailing_zeros_accepted() {
        let mut req = monthly_request();
        req.period_count = dec!(24.00);
        assert_eq!(to_terms(&req).unwrap().period_count, 24);
    }

    #[test]
    fn test_plan_due_dates_roll_month_end() {
        let mut req = monthly_request();
        req.period_count = dec!(3);
        req.first_due_date = NaiveDate::from_ymd_opt(2025, 1, 31);
        let plan = plan_loan(&req).unwrap().result;
        let dates: Vec<_> = plan.result.schedule.iter().map(|e| e.due_date.unwrap()).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            ]
        );
    }

    #[test]
    fn test_plan_quarterly_annual_rate() {
        let req = LoanRequest {
            rate_basis: RateBasis::Annual,
            frequency: PaymentFrequency::Quarterly,
            rate_percent: dec!(12),
            period_count: dec!(8),
            ..monthly_request()
        };
        let plan = plan_loan(&req).unwrap().result;
        assert_eq!(plan.effective_rate, dec!(0.03));
        assert_eq!(plan.annual_equivalent_rate, dec!(0.12));
        assert_eq!(plan.result.schedule.len(), 8);
    }

    #[test]
    fn test_plan_without_due_dates() {
        let plan = plan_loan(&monthly_request()).unwrap().result;
        assert!(plan.result.schedule.iter().all(|e| e.due_date.is_none()));
    }

    #[test]
    fn test_oversized_rate_and_levy_rejected() {
        let mut req = monthly_request();
        req.rate_percent = dec!(1000);
        req.taxes = TaxLoading {
            kkdf: dec!(10000000000000000000000000000),
            bsmv: Decimal::ZERO,
        };
        let err = plan_loan(&req).unwrap_err();
        assert_eq!(err.field(), Some("rate_percent"));
    }

    #[test]
    fn test_request_defaults_from_json() {
        let req: LoanRequest = serde_json::from_str(
            r#"{"principal":"50000","rate_percent":"3","period_count":"6"}"#,
        )
        .unwrap();
        assert_eq!(req.frequency, PaymentFrequency::Monthly);
        assert_eq!(req.rate_basis, RateBasis::Periodic);
        assert_eq!(req.taxes, TaxLoading::default());
    }
}
