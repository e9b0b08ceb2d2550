/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Magic-7 periodic-server approximation (single-processor path).
//!
//! Maps a raw availability factor `a = wcet / period` onto one of five
//! regimes, each with a period of `1`, `7` or `7·2^n`:
//!
//! | Regime | Surrogate `(wcet, period)` | aaf |
//! |---|---|---|
//! | `a == 0` | `(0, 1)` | `0` |
//! | `0 < a < 1/7` | `(1, 7·2^n)`, largest `n` with `1/(7·2^n) >= a` | `1/(7·2^n)` |
//! | `1/7 <= a <= 6/7` | `(ceil(7a), 7)` | `ceil(7a)/7` |
//! | `6/7 < a < 1` | `(7·2^n − 1, 7·2^n)`, smallest `n` with `1 − 1/(7·2^n) >= a` | `1 − 1/(7·2^n)` |
//! | `a >= 1` | `(1, 1)` | `1` |
//!
//! Regime boundaries and the middle band are decided in exact integer
//! arithmetic.  The exponents of the two outer bands are first estimated from
//! `log(7a) / log(0.5)`, passed through [`approximate`], then walked to the
//! exact boundary in integers: the snapping can move a near-integer logarithm
//! onto the wrong side of it.  The middle band takes `ceil(7a)` exactly rather
//! than `ceil(approximate(7a))`, which would round `7a` values just above an
//! integer down.

use tracing::debug;

use super::approximate;
use crate::partition::{Family, NormalizedPartition, PartitionRecord};
use crate::scheduler::SchedulerError;

/// Normalize one partition into the Magic-7 family.
///
/// The input record is left untouched; the returned surrogate carries a copy
/// of it in [`NormalizedPartition::requested`].
///
/// # Errors
/// * [`SchedulerError::InvalidInput`] if `period == 0`, or if the required
///   `7·2^n` period does not fit in `u64`.
pub fn magic7(record: &PartitionRecord) -> Result<NormalizedPartition, SchedulerError> {
    let PartitionRecord { id, wcet, period } = *record;
    if period == 0 {
        return Err(SchedulerError::invalid(format!(
            "partition {id} has a zero period"
        )));
    }

    let w = wcet as u128;
    let p = period as u128;

    let (new_wcet, new_period) = if wcet == 0 {
        (0, 1)
    } else if 7 * w < p {
        // 0 < a < 1/7: largest n with 7·2^n·wcet <= period
        let a = wcet as f64 / period as f64;
        let mut n = exponent_estimate(approximate((7.0 * a).ln() / 0.5_f64.ln()).floor());
        while n > 0 && server_times(n, w) > p {
            n -= 1;
        }
        while server_times(n + 1, w) <= p {
            n += 1;
        }
        (1, server_period(n, record)?)
    } else if 7 * w <= 6 * p {
        // 1/7 <= a <= 6/7: ceil(7a) without leaving the integers
        let slots = (7 * w).div_ceil(p) as u64;
        (slots, 7)
    } else if w < p {
        // 6/7 < a < 1: smallest n with 7·2^n·(period − wcet) >= period
        let gap = p - w;
        let complement = (period - wcet) as f64 / period as f64;
        let mut n = exponent_estimate(approximate((7.0 * complement).ln() / 0.5_f64.ln()).ceil());
        while server_times(n, gap) < p {
            n += 1;
        }
        while n > 0 && server_times(n - 1, gap) >= p {
            n -= 1;
        }
        let server = server_period(n, record)?;
        (server - 1, server)
    } else {
        (1, 1)
    };

    let normalized = NormalizedPartition::new(record, new_wcet, new_period, Family::Magic7);
    debug!(
        partition = id,
        requested = %record.aaf(),
        wcet = normalized.wcet,
        period = normalized.period,
        aaf = %normalized.aaf,
        "magic7 surrogate"
    );
    Ok(normalized)
}

/// Starting exponent from the float path, clamped to `[0, 64]`.
fn exponent_estimate(n: f64) -> u32 {
    n.clamp(0.0, 64.0) as u32
}

/// `7·2^n·k`, saturating.
fn server_times(n: u32, k: u128) -> u128 {
    1u128
        .checked_shl(n)
        .map_or(u128::MAX, |pow| pow.saturating_mul(7).saturating_mul(k))
}

/// `7·2^n` as a period in slices.
fn server_period(n: u32, record: &PartitionRecord) -> Result<u64, SchedulerError> {
    u64::try_from(server_times(n, 1)).map_err(|_| {
        SchedulerError::invalid(format!(
            "partition {} ({}/{}) needs a Magic-7 period of 7·2^{n}, which overflows",
            record.id, record.wcet, record.period
        ))
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
