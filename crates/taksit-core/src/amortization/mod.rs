pub mod rates;
pub mod request;
pub mod schedule;

pub use request::{plan_loan, LoanPlan, LoanRequest};
pub use schedule::{
    build_amortization_schedule, compute_amortization, AmortizationResult, LoanTerms, PeriodEntry,
};
