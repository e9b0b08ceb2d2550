/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! `Z_{n,2}` approximation family used by the MulZ allocator.
//!
//! For a base `n` the family is
//!
//! ```text
//! (n−1)/n, (n−2)/n, …, 2/n          (i = 1 .. n−2)
//! 1/n, 1/(2n), 1/(4n), …            (j = 0, 1, 2, …)
//! ```
//!
//! plus `1/1` for factors above `(n−1)/n`.  [`z_approx`] returns the smallest
//! member that is still `>=` the target.

use crate::approx::Fraction;

/// Candidate bases tried by MulZ for every partition, in tie-break order.
pub const Z_BASES: [u64; 4] = [3, 4, 5, 7];

/// One member of a `Z_{n,2}` family.
///
/// `wcet / period` is kept unreduced (`2/4` for base 4), because that is the
/// slot pattern the single-processor scheduler lays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZApprox {
    pub value: Fraction,
    pub wcet: u64,
    pub period: u64,
}

impl ZApprox {
    fn new(wcet: u64, period: u64) -> Self {
        Self {
            value: Fraction::new(wcet, period),
            wcet,
            period,
        }
    }
}

/// Tightest member of `Z_{n,2}` that is `>= w`.
///
/// Walks `(n−i)/n` downward while it still covers `w` (skipping the `1/n`
/// member of that sequence, which the halving walk produces), then walks
/// `1/(n·2^j)` downward the same way, and returns the last accepted member.
/// A zero target needs no capacity and maps to `0/1`.
///
/// # Panics
/// Panics if `n == 0`.
pub fn z_approx(w: Fraction, n: u64) -> ZApprox {
    assert!(n > 0, "Z family base must be positive");
    if w.is_zero() {
        return ZApprox::new(0, 1);
    }

    let mut best = ZApprox::new(1, 1);

    let mut i = 1;
    while i + 1 < n {
        let candidate = ZApprox::new(n - i, n);
        if candidate.value < w {
            // 1/(n·2^j) <= 1/n <= (n−i)/n < w: nothing below can cover w
            return best;
        }
        best = candidate;
        i += 1;
    }

    let mut denom = n;
    loop {
        let candidate = ZApprox::new(1, denom);
        if candidate.value < w {
            return best;
        }
        best = candidate;
        denom = match denom.checked_mul(2) {
            Some(d) => d,
            None => return best,
        };
    }
}

/// Base whose approximation of `w` is tightest, with that approximation.
///
/// Ties keep the earlier base in [`Z_BASES`].
pub fn preferred_base(w: Fraction) -> (u64, ZApprox) {
    let mut choice = (Z_BASES[0], z_approx(w, Z_BASES[0]));
    for &base in &Z_BASES[1..] {
        let z = z_approx(w, base);
        if z.value < choice.1.value {
            choice = (base, z);
        }
    }
    choice
}

// ── Tests ─────────────────────────────────────────────────────────────────────
