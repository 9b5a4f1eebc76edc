use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use taksit_core::amortization::{self, LoanRequest, LoanTerms};
use taksit_core::numeric::{combinatorics, format};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Schedule from per-period `LoanTerms` JSON; returns the output envelope.
#[napi]
pub fn compute_amortization(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::build_amortization_schedule(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Plan from calculator-form `LoanRequest` JSON.
#[napi]
pub fn plan_loan(input_json: String) -> NapiResult<String> {
    let request: LoanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::plan_loan(&request).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

// JS numbers lose integers above 2^53, so results come back as strings.

#[napi]
pub fn factorial(n: u32) -> NapiResult<String> {
    combinatorics::factorial(u64::from(n))
        .map(|v| v.to_string())
        .map_err(to_napi_error)
}

#[napi]
pub fn permutation(n: u32, k: u32) -> NapiResult<String> {
    combinatorics::permutation(u64::from(n), u64::from(k))
        .map(|v| v.to_string())
        .map_err(to_napi_error)
}

#[napi]
pub fn combination(n: u32, k: u32) -> NapiResult<String> {
    combinatorics::combination(u64::from(n), u64::from(k))
        .map(|v| v.to_string())
        .map_err(to_napi_error)
}

/// Turkish-locale currency string from a decimal string ("1234.5" to "1.234,50 TL").
#[napi]
pub fn format_currency(amount: String) -> NapiResult<String> {
    let value: Decimal = amount.trim().parse().map_err(to_napi_error)?;
    Ok(format::format_currency(value))
}
