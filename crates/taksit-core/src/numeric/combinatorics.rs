//! Factorials, permutations and combinations on checked `u128` arithmetic.

use crate::error::TaksitError;
use crate::TaksitResult;

/// n!
pub fn factorial(n: u64) -> TaksitResult<u128> {
    (2..=u128::from(n)).try_fold(1u128, |acc, i| {
        acc.checked_mul(i).ok_or_else(|| overflow(format!("{n}!")))
    })
}

/// Ordered selections: n! / (n − k)!
pub fn permutation(n: u64, k: u64) -> TaksitResult<u128> {
    check_selection(n, k)?;
    ((n - k)..n).try_fold(1u128, |acc, i| {
        acc.checked_mul(u128::from(i) + 1)
            .ok_or_else(|| overflow(format!("P({n}, {k})")))
    })
}

/// Unordered selections: n! / (k! (n − k)!)
pub fn combination(n: u64, k: u64) -> TaksitResult<u128> {
    check_selection(n, k)?;
    let k = k.min(n - k);

    // result holds C(n, i) after each step; reducing by the gcd first keeps
    // every intermediate exact and only as large as the answer needs.
    let mut result: u128 = 1;
    for i in 0..u128::from(k) {
        let numerator = u128::from(n) - i;
        let denominator = i + 1;
        let g = gcd(result, denominator);
        let reduced = result / g;
        let remaining = denominator / g;
        result = reduced
            .checked_mul(numerator / remaining)
            .ok_or_else(|| overflow(format!("C({n}, {k})")))?;
    }
    Ok(result)
}

fn check_selection(n: u64, k: u64) -> TaksitResult<()> {
    if k > n {
        return Err(TaksitError::invalid(
            "k",
            format!("Cannot choose {k} items from {n}"),
        ));
    }
    Ok(())
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn overflow(context: String) -> TaksitError {
    TaksitError::Overflow { context }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial_small() {
        assert_eq!(factorial(0).unwrap(), 1);
        assert_eq!(factorial(1).unwrap(), 1);
        assert_eq!(factorial(10).unwrap(), 3_628_800);
    }

    #[test]
    fn test_factorial_limit() {
        assert!(factorial(34).is_ok());
        assert!(matches!(factorial(35), Err(TaksitError::Overflow { .. })));
    }

    #[test]
    fn test_permutation() {
        assert_eq!(permutation(5, 2).unwrap(), 20);
        assert_eq!(permutation(7, 0).unwrap(), 1);
        assert_eq!(permutation(6, 6).unwrap(), 720);
    }

    #[test]
    fn test_combination() {
        assert_eq!(combination(5, 2).unwrap(), 10);
        assert_eq!(combination(49, 6).unwrap(), 13_983_816);
        assert_eq!(combination(10, 0).unwrap(), 1);
        assert_eq!(combination(10, 10).unwrap(), 1);
    }

    #[test]
    fn test_combination_beyond_factorial_range() {
        // 100! overflows u128 but C(100, 50) does not
        assert_eq!(
            combination(100, 50).unwrap(),
            100_891_344_545_564_193_334_812_497_256
        );
    }

    #[test]
    fn test_selection_larger_than_set() {
        let err = combination(3, 4).unwrap_err();
        assert_eq!(err.field(), Some("k"));
        assert!(permutation(3, 4).is_err());
    }
}
