/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Rational approximation of availability factors.
//!
//! Two families snap a raw availability factor `wcet / period` to a surrogate
//! whose evenly spaced slot pattern exists exactly:
//!
//! | Family | Used on | Values |
//! |---|---|---|
//! | [`magic7`] | single processor | `0`, `1/(7·2^n)`, `k/7`, `1 − 1/(7·2^n)`, `1` |
//! | [`zfamily`] | multiprocessor (MulZ) | `(n−i)/n`, `1/(n·2^j)` for `n ∈ {3,4,5,7}` |
//!
//! Every surrogate is `>=` the raw factor, so a partition is never
//! under-provisioned.

pub mod fraction;
pub mod magic7;
pub mod zfamily;

pub use fraction::Fraction;

/// Width of the snapping bands used by [`approximate`].
pub const APPROX_TOLERANCE: f64 = 1e-5;

/// Absorb floating-point noise around multiples of `0.5`.
///
/// With `f = value − floor(value)`:
/// * `f > 1 − TOL`          → `floor + 1`
/// * `0.5 − TOL < f < 0.5`  → `floor + 0.5`
/// * `0 < f < TOL`          → `floor`
/// * otherwise the value is returned unchanged.
///
/// Logarithms of exact powers of two (`ln(0.25) / ln(0.5)`) routinely land a
/// few ULPs away from the integer; the subsequent `floor`/`ceil` must see the
/// integer.
pub fn approximate(value: f64) -> f64 {
    let floor = value.floor();
    let frac = value - floor;

    if frac > 1.0 - APPROX_TOLERANCE {
        floor + 1.0
    } else if frac > 0.5 - APPROX_TOLERANCE && frac < 0.5 {
        floor + 0.5
    } else if frac > 0.0 && frac < APPROX_TOLERANCE {
        floor
    } else {
        value
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
