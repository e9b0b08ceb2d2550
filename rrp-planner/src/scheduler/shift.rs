/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Cyclic shift search for evenly spaced slot patterns.
//!
//! A partition with `q` slots per period `p` uses the "standard" pattern
//! `floor(k·p/q) mod p` for `k ∈ [0, q)`.  [`find_delta`] looks for the
//! smallest shift `delta1` that keeps this pattern on free slices while still
//! leaving room for a second evenly spaced pattern of `q_left` points (the
//! capacity that later partitions will need inside the same period).
//!
//! The search is `O(p²)` per partition; periods are bounded by the
//! approximation families and the hyperperiod limit.

use std::collections::BTreeSet;

use tracing::debug;

/// Evenly spaced pattern of `count` points over `period`: `floor(k·period/count) mod period`.
pub fn standard_pattern(period: u64, count: u64) -> Vec<u64> {
    if count == 0 || period == 0 {
        return Vec::new();
    }
    (0..count).map(|k| (k * period / count) % period).collect()
}

/// `true` if every point of `pattern`, shifted by `delta` modulo `period`, is
/// in `available`.
pub fn check_delta(available: &BTreeSet<u64>, pattern: &[u64], delta: u64, period: u64) -> bool {
    pattern
        .iter()
        .all(|&t| available.contains(&((t + delta) % period)))
}

/// Smallest shift for a `(period, wcet)` pattern that fits `available` and
/// leaves room for a `q_left`-point complementary pattern.
///
/// The complementary pattern is spaced over the `period − wcet` slices the
/// partition leaves free: `floor(k·period/(period − wcet)) mod period` for
/// `k ∈ [0, q_left)`.  Only indices below `period` are consulted.
///
/// Returns `None` when no `(delta1, delta2)` pair in `[0, period)²` works.
pub fn find_delta(available: &BTreeSet<u64>, period: u64, wcet: u64, q_left: u64) -> Option<u64> {
    let primary = standard_pattern(period, wcet);
    let complement: Vec<u64> = if wcet < period {
        (0..q_left)
            .map(|k| (k * period / (period - wcet)) % period)
            .collect()
    } else {
        Vec::new()
    };

    for delta1 in 0..period {
        if !check_delta(available, &primary, delta1, period) {
            continue;
        }

        let footprint: BTreeSet<u64> = primary.iter().map(|&t| (t + delta1) % period).collect();
        let remaining: BTreeSet<u64> = available
            .range(..period)
            .filter(|t| !footprint.contains(t))
            .copied()
            .collect();

        if let Some(delta2) = (0..period).find(|&d| check_delta(&remaining, &complement, d, period)) {
            debug!(period, wcet, q_left, delta1, delta2, "shift found");
            return Some(delta1);
        }
    }

    debug!(period, wcet, q_left, "no shift fits");
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
