use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use taksit_core::amortization::rates::{self, PaymentFrequency, RateBasis, TaxLoading};
use taksit_core::amortization::{build_amortization_schedule, plan_loan, LoanRequest, LoanTerms};

use crate::input;

/// Arguments for a schedule from per-period terms
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Interest per period as a fraction (0.035 = 3.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of payment periods
    #[arg(long)]
    pub periods: Option<u32>,

    /// Accept a zero rate as an interest-free loan
    #[arg(long)]
    pub allow_zero_rate: bool,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        debug!(path = %path, "reading loan terms from file");
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        debug!("reading loan terms from stdin");
        serde_json::from_value(data)?
    } else {
        terms_from_flags(&args)?
    };

    let output = build_amortization_schedule(&terms)?;
    info!(
        periods = terms.period_count,
        elapsed_us = output.metadata.computation_time_us,
        "amortization schedule built"
    );
    Ok(serde_json::to_value(output)?)
}

/// Arguments for a calculator-style loan plan
#[derive(Args)]
pub struct PlanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Quoted interest rate in percent (3.5 = 3.5%)
    #[arg(long)]
    pub rate_percent: Option<Decimal>,

    /// Treat the quoted rate as a nominal annual rate
    #[arg(long)]
    pub annual: bool,

    /// Payment frequency: monthly, quarterly, semi_annual, annual
    #[arg(long, default_value = "monthly")]
    pub frequency: PaymentFrequency,

    /// Number of payment periods (whole number)
    #[arg(long)]
    pub periods: Option<Decimal>,

    /// First due date (YYYY-MM-DD); fills in a date per row
    #[arg(long)]
    pub first_due: Option<NaiveDate>,

    /// KKDF levy on interest, in percent
    #[arg(long)]
    pub kkdf: Option<Decimal>,

    /// BSMV levy on interest, in percent
    #[arg(long)]
    pub bsmv: Option<Decimal>,

    /// Apply the standard consumer-loan levies (KKDF 15%, BSMV 5%)
    #[arg(long, conflicts_with_all = ["kkdf", "bsmv"])]
    pub consumer_taxes: bool,

    /// Accept a zero rate as an interest-free loan
    #[arg(long)]
    pub allow_zero_rate: bool,
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: LoanRequest = if let Some(ref path) = args.input {
        debug!(path = %path, "reading loan request from file");
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        debug!("reading loan request from stdin");
        serde_json::from_value(data)?
    } else {
        request_from_flags(&args)?
    };

    let output = plan_loan(&request)?;
    info!(
        frequency = %request.frequency,
        elapsed_us = output.metadata.computation_time_us,
        "loan plan built"
    );
    Ok(serde_json::to_value(output)?)
}

fn terms_from_flags(args: &AmortizeArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
    let periods = args
        .periods
        .ok_or("--periods is required (or provide --input)")?;

    Ok(LoanTerms {
        principal,
        periodic_rate: rate,
        period_count: periods,
        allow_zero_rate: args.allow_zero_rate,
    })
}

/// Levy flags are percentages, like the rate itself.
fn request_from_flags(args: &PlanArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate_percent = args
        .rate_percent
        .ok_or("--rate-percent is required (or provide --input)")?;
    let periods = args
        .periods
        .ok_or("--periods is required (or provide --input)")?;

    let taxes = if args.consumer_taxes {
        TaxLoading::consumer()
    } else {
        TaxLoading {
            kkdf: args.kkdf.map(rates::percent_to_fraction).unwrap_or_default(),
            bsmv: args.bsmv.map(rates::percent_to_fraction).unwrap_or_default(),
        }
    };

    Ok(LoanRequest {
        principal,
        rate_percent,
        rate_basis: if args.annual {
            RateBasis::Annual
        } else {
            RateBasis::Periodic
        },
        frequency: args.frequency,
        period_count: periods,
        allow_zero_rate: args.allow_zero_rate,
        taxes,
        first_due_date: args.first_due,
    })
}
