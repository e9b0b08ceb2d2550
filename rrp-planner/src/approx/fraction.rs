/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Exact non-negative fractions for availability factors and processor
//! capacity.
//!
//! Both approximation families produce denominators of the form `n·2^j`, so
//! sums and differences stay small and exact.  Keeping them out of `f64`
//! means a processor filled to exactly `1` reads back as exactly `0`
//! residual capacity, not `5.5e-17`.

use std::cmp::Ordering;
use std::fmt;

use crate::hyperperiod::math::{gcd, lcm};

/// A reduced fraction `num / den` with `den > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: u64,
    den: u64,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    /// Construct and reduce `num / den`.
    ///
    /// # Panics
    /// Panics if `den == 0`.
    pub fn new(num: u64, den: u64) -> Self {
        assert!(den > 0, "fraction with zero denominator");
        let g = gcd(num, den);
        Fraction {
            num: num / g,
            den: den / g,
        }
    }

    pub fn numer(&self) -> u64 {
        self.num
    }

    pub fn denom(&self) -> u64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Lossy view used for logging and the logarithm-based Magic-7 exponent.
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// `self + other`, or `None` if the common denominator overflows.
    pub fn checked_add(self, other: Fraction) -> Option<Fraction> {
        let den = lcm(self.den, other.den).ok()?;
        let num = self
            .num
            .checked_mul(den / self.den)?
            .checked_add(other.num.checked_mul(den / other.den)?)?;
        Some(Fraction::new(num, den))
    }

    /// `self - other`, or `None` if the result would be negative or the
    /// common denominator overflows.
    pub fn checked_sub(self, other: Fraction) -> Option<Fraction> {
        let den = lcm(self.den, other.den).ok()?;
        let num = self
            .num
            .checked_mul(den / self.den)?
            .checked_sub(other.num.checked_mul(den / other.den)?)?;
        Some(Fraction::new(num, den))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // cross-multiplication cannot overflow in u128
        let lhs = self.num as u128 * other.den as u128;
        let rhs = other.num as u128 * self.den as u128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Fraction::ZERO
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}
