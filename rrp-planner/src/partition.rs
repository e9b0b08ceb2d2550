/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Partition data structures.
//!
//! Two distinct types model the two sides of normalization:
//!
//! ```text
//! plan file ──► PartitionRecord ──(magic7 | MulZ)──► NormalizedPartition ──► partition_single
//!                 ↑ requested                          ↑ schedulable surrogate
//!                 never mutated                        keeps the request for diagnostics
//! ```
//!
//! # Ownership model
//! A `PartitionRecord` is caller input and is only ever borrowed.  Each
//! normalization step builds a fresh `NormalizedPartition` that carries a copy
//! of the record it came from, so the requested `(wcet, period)` is still
//! available after the surrogate replaced it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::approx::Fraction;

/// Partition identifier as written into `Slot@partitionId`.
pub type PartitionId = u32;

// ── PartitionRecord (input) ───────────────────────────────────────────────────

/// One logical partition as requested by the caller.
///
/// Both timing values are in time slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRecord {
    pub id: PartitionId,
    /// Worst-case execution time per period.
    pub wcet: u64,
    /// Period length; must be non-zero to be schedulable.
    pub period: u64,
}

impl PartitionRecord {
    pub fn new(id: PartitionId, wcet: u64, period: u64) -> Self {
        Self { id, wcet, period }
    }

    /// Exact availability factor `wcet / period`.
    ///
    /// Returns zero for a zero period; the scheduler rejects such records
    /// before any approximation runs.
    pub fn aaf(&self) -> Fraction {
        if self.period == 0 {
            return Fraction::ZERO;
        }
        Fraction::new(self.wcet, self.period)
    }
}

// ── Approximation family ──────────────────────────────────────────────────────

/// Which approximation produced a [`NormalizedPartition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Single-processor Magic-7 family (`7·2^n` denominators).
    Magic7,
    /// Multiprocessor `Z_{n,2}` family with the given base `n`.
    Z { base: u64 },
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Magic7 => write!(f, "magic7"),
            Family::Z { base } => write!(f, "Z({base},2)"),
        }
    }
}

// ── NormalizedPartition (output of approximation) ─────────────────────────────

/// A partition whose `(wcet, period)` has been replaced by an exactly
/// representable surrogate.
///
/// `wcet` and `period` are kept as produced by the family and are not reduced
/// (`2/4` stays `wcet = 2, period = 4`); `aaf` is the reduced fraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPartition {
    pub id: PartitionId,
    pub wcet: u64,
    pub period: u64,
    pub aaf: Fraction,
    pub family: Family,
    /// The record this surrogate was derived from.
    pub requested: PartitionRecord,
}

impl NormalizedPartition {
    /// # Panics
    /// Panics if `period == 0`; both families only produce positive periods.
    pub fn new(requested: &PartitionRecord, wcet: u64, period: u64, family: Family) -> Self {
        Self {
            id: requested.id,
            wcet,
            period,
            aaf: Fraction::new(wcet, period),
            family,
            requested: *requested,
        }
    }

    /// Number of periods of this partition inside `hyperperiod`.
    pub fn repetitions(&self, hyperperiod: u64) -> u64 {
        hyperperiod / self.period
    }

    /// How much the surrogate over-provisions the request (`aaf − requested`).
    pub fn slack(&self) -> Fraction {
        self.aaf
            .checked_sub(self.requested.aaf())
            .unwrap_or(Fraction::ZERO)
    }
}

/// Sort heaviest first, keeping input order among equal factors.
pub(crate) fn sort_by_aaf_desc<T>(items: &mut [T], aaf: impl Fn(&T) -> Fraction) {
    items.sort_by(|a, b| aaf(b).cmp(&aaf(a)));
}

// ── Tests ─────────────────────────────────────────────────────────────────────
