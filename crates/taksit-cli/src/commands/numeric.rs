use clap::Args;
use serde_json::{json, Value};
use tracing::debug;

use taksit_core::numeric::combinatorics;

/// Arguments for n!
#[derive(Args)]
pub struct FactorialArgs {
    /// Non-negative integer
    #[arg(long)]
    pub n: u64,
}

/// Arguments for permutations and combinations
#[derive(Args)]
pub struct SelectionArgs {
    /// Size of the set
    #[arg(long)]
    pub n: u64,

    /// Number of items chosen
    #[arg(long)]
    pub k: u64,
}

// u128 does not fit a JSON number, so values travel as strings.

pub fn run_factorial(args: FactorialArgs) -> Result<Value, Box<dyn std::error::Error>> {
    debug!(n = args.n, "factorial");
    let value = combinatorics::factorial(args.n)?;
    Ok(json!({ "result": { "n": args.n, "value": value.to_string() } }))
}

pub fn run_permutation(args: SelectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    debug!(n = args.n, k = args.k, "permutation");
    let value = combinatorics::permutation(args.n, args.k)?;
    Ok(json!({ "result": { "n": args.n, "k": args.k, "value": value.to_string() } }))
}

pub fn run_combination(args: SelectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    debug!(n = args.n, k = args.k, "combination");
    let value = combinatorics::combination(args.n, args.k)?;
    Ok(json!({ "result": { "n": args.n, "k": args.k, "value": value.to_string() } }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_value_is_string() {
        let out = run_combination(SelectionArgs { n: 49, k: 6 }).unwrap();
        assert_eq!(out["result"]["value"], "13983816");
    }

    #[test]
    fn test_invalid_selection_errors() {
        assert!(run_permutation(SelectionArgs { n: 2, k: 3 }).is_err());
    }
}
