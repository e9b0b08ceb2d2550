/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Integer helpers behind the hyperperiod: GCD and checked LCM.
//!
//! Periods here are counted in time slices, so they are small integers of the
//! form `7·2^n`, `n·2^j` or `1`.  The helpers are still overflow-checked: a
//! pathological plan file must produce an error, not a wrapped table length.

use super::HyperperiodError;

/// Iterative Euclidean GCD.  `gcd(0, x) == x`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Checked LCM.  Divides before multiplying, then checks the product.
///
/// Returns `Ok(0)` when either input is `0`.
pub fn lcm(a: u64, b: u64) -> Result<u64, HyperperiodError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }

    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(HyperperiodError::Overflow { a, b })
}

/// Fold a slice of periods into their LCM.
///
/// `Ok(0)` for an empty slice; the caller decides whether that is an error.
pub fn lcm_of_slice(periods: &[u64]) -> Result<u64, HyperperiodError> {
    let Some((&first, rest)) = periods.split_first() else {
        return Ok(0);
    };
    rest.iter().try_fold(first, |acc, &p| lcm(acc, p))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── gcd ───────────────────────────────────────────────────────────────────

    #[test]
    fn gcd_of_slot_periods() {
        assert_eq!(gcd(14, 28), 14);
        assert_eq!(gcd(7, 3), 1);
        assert_eq!(gcd(12, 20), 4);
    }

    #[test]
    fn gcd_with_zero_operand() {
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 0), 0);
    }

    // ── lcm ───────────────────────────────────────────────────────────────────

    #[test]
    fn lcm_of_magic7_periods_is_the_largest() {
        // 7·2^n periods always divide one another
        assert_eq!(lcm(7, 28).unwrap(), 28);
        assert_eq!(lcm(56, 14).unwrap(), 56);
    }

    #[test]
    fn lcm_of_mixed_bases() {
        assert_eq!(lcm(3, 4).unwrap(), 12);
        assert_eq!(lcm(5, 7).unwrap(), 35);
        assert_eq!(lcm(6, 10).unwrap(), 30);
    }

    #[test]
    fn lcm_with_zero_is_zero() {
        assert_eq!(lcm(0, 7).unwrap(), 0);
        assert_eq!(lcm(7, 0).unwrap(), 0);
    }

    #[test]
    fn lcm_overflow_is_reported_with_operands() {
        let a = u64::MAX / 2 + 1;
        let b = u64::MAX / 2 + 3;
        assert_eq!(lcm(a, b), Err(HyperperiodError::Overflow { a, b }));
    }

    // ── lcm_of_slice ──────────────────────────────────────────────────────────

    #[test]
    fn lcm_of_slice_empty_is_zero() {
        assert_eq!(lcm_of_slice(&[]).unwrap(), 0);
    }

    #[test]
    fn lcm_of_slice_single_period() {
        assert_eq!(lcm_of_slice(&[7]).unwrap(), 7);
    }

    #[test]
    fn lcm_of_slice_seven_three_four() {
        assert_eq!(lcm_of_slice(&[7, 3, 4]).unwrap(), 84);
    }

    #[test]
    fn lcm_of_slice_with_unit_periods() {
        // full-CPU and idle partitions normalise to period 1
        assert_eq!(lcm_of_slice(&[1, 7, 1, 14]).unwrap(), 14);
    }

    #[test]
    fn lcm_of_slice_propagates_overflow() {
        let huge = u64::MAX / 2 + 1;
        assert!(lcm_of_slice(&[huge, huge - 1]).is_err());
    }
}
