//! Converting quoted interest rates into per-period fractions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TaksitError;
use crate::types::Rate;
use crate::TaksitResult;

/// How often a payment falls due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Annual => 1,
        }
    }

    /// Calendar months between consecutive due dates.
    pub fn months_between(self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl FromStr for PaymentFrequency {
    type Err = TaksitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "aylik" | "aylık" => Ok(PaymentFrequency::Monthly),
            "quarterly" | "ceyreklik" | "çeyreklik" => Ok(PaymentFrequency::Quarterly),
            "semiannual" | "semi_annual" | "semi-annual" | "alti_aylik" => {
                Ok(PaymentFrequency::SemiAnnual)
            }
            "annual" | "annually" | "yearly" | "yillik" | "yıllık" => Ok(PaymentFrequency::Annual),
            other => Err(TaksitError::invalid(
                "frequency",
                format!("Unknown payment frequency '{other}'"),
            )),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::SemiAnnual => "semi_annual",
            PaymentFrequency::Annual => "annual",
        };
        f.write_str(label)
    }
}

/// Whether a quoted rate already applies to one payment period or to a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    /// Rate per payment period (Turkish banks quote monthly rates).
    #[default]
    Periodic,
    /// Nominal annual rate, split evenly across the year's periods.
    Annual,
}

/// Levies charged on loan interest: KKDF (resource utilization support
/// fund) and BSMV (banking and insurance transactions tax).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxLoading {
    #[serde(default)]
    pub kkdf: Rate,
    #[serde(default)]
    pub bsmv: Rate,
}

impl TaxLoading {
    /// Typical consumer-loan levies: KKDF 15%, BSMV 5%.
    pub fn consumer() -> Self {
        Self {
            kkdf: dec!(0.15),
            bsmv: dec!(0.05),
        }
    }

    /// 1 + kkdf + bsmv
    pub fn multiplier(&self) -> TaksitResult<Decimal> {
        Decimal::ONE
            .checked_add(self.kkdf)
            .and_then(|m| m.checked_add(self.bsmv))
            .ok_or_else(|| TaksitError::invalid("kkdf", "Combined levies exceed Decimal range"))
    }

    pub fn validate(&self) -> TaksitResult<()> {
        if self.kkdf < Decimal::ZERO {
            return Err(TaksitError::invalid("kkdf", "KKDF rate cannot be negative"));
        }
        if self.bsmv < Decimal::ZERO {
            return Err(TaksitError::invalid("bsmv", "BSMV rate cannot be negative"));
        }
        Ok(())
    }
}

/// Percentage as typed into a form (3.5) to a fraction (0.035).
pub fn percent_to_fraction(percent: Decimal) -> Rate {
    percent / dec!(100)
}

/// Per-period fraction from a quoted percentage.
pub fn periodic_rate(percent: Decimal, basis: RateBasis, frequency: PaymentFrequency) -> Rate {
    let fraction = percent_to_fraction(percent);
    match basis {
        RateBasis::Periodic => fraction,
        RateBasis::Annual => fraction / Decimal::from(frequency.periods_per_year()),
    }
}

/// Periodic rate after interest levies.
pub fn tax_loaded_rate(rate: Rate, taxes: &TaxLoading) -> TaksitResult<Rate> {
    rate.checked_mul(taxes.multiplier()?).ok_or_else(|| {
        TaksitError::invalid("rate_percent", "Rate after levies exceeds Decimal range")
    })
}

/// Nominal annual rate implied by a periodic rate.
pub fn annual_equivalent(rate: Rate, frequency: PaymentFrequency) -> TaksitResult<Rate> {
    rate.checked_mul(Decimal::from(frequency.periods_per_year()))
        .ok_or_else(|| TaksitError::invalid("rate_percent", "Annual rate exceeds Decimal range"))
}
