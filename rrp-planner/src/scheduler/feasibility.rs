/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Post-schedule launch-table verification.
//!
//! # Status: warning only
//!
//! [`verify_table`] is run by the planner after every successful
//! `partition_single` call.  A violation is **logged**, the plan is still
//! returned: the slot-assignment algorithm already refuses to produce
//! overlapping slots, so a violation here means the algorithm and the
//! normalized partitions disagree, not that the input was bad.
//!
//! # What is checked
//! For every normalized partition `(wcet, period)` placed on the processor:
//!
//! * the table length is a multiple of `period`;
//! * every cyclic window of `period` consecutive slices holds exactly `wcet`
//!   slices of the partition.
//!
//! Every occupied slice must belong to one of the partitions, and the summed
//! approximate availability factors must not exceed one processor.

use thiserror::Error;

use crate::approx::Fraction;
use crate::partition::{NormalizedPartition, PartitionId};
use crate::plan::LaunchTable;

/// First inconsistency found between a launch table and its partitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableViolation {
    #[error("total availability {total} exceeds one processor")]
    Overcommitted { total: Fraction },

    #[error("table length {len} is not a multiple of partition {partition}'s period {period}")]
    PeriodMismatch {
        partition: PartitionId,
        len: usize,
        period: u64,
    },

    #[error("partition {partition} holds {found} slices in the window starting at {start}, expected {expected}")]
    WindowCount {
        partition: PartitionId,
        start: usize,
        found: u64,
        expected: u64,
    },

    #[error("slice {index} is held by unknown partition {partition}")]
    UnknownOccupant { index: usize, partition: PartitionId },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Sum of the approximate availability factors, or `None` on overflow.
pub fn total_utilization(partitions: &[NormalizedPartition]) -> Option<Fraction> {
    partitions
        .iter()
        .try_fold(Fraction::ZERO, |acc, p| acc.checked_add(p.aaf))
}

/// Check `table` against the partitions it was built from.
///
/// Returns the first violation found.  An empty table with no partitions is
/// trivially valid.
pub fn verify_table(
    table: &LaunchTable,
    partitions: &[NormalizedPartition],
) -> Result<(), TableViolation> {
    if let Some(total) = total_utilization(partitions) {
        if total > Fraction::ONE {
            return Err(TableViolation::Overcommitted { total });
        }
    }

    for (index, slot) in table.slots().iter().enumerate() {
        if let Some(id) = *slot {
            if !partitions.iter().any(|p| p.id == id) {
                return Err(TableViolation::UnknownOccupant {
                    index,
                    partition: id,
                });
            }
        }
    }

    let len = table.len();
    for part in partitions.iter().filter(|p| p.wcet > 0) {
        check_windows(table, part, len)?;
    }
    Ok(())
}

fn check_windows(
    table: &LaunchTable,
    part: &NormalizedPartition,
    len: usize,
) -> Result<(), TableViolation> {
    let period = part.period as usize;
    if len == 0 || period == 0 || len % period != 0 {
        return Err(TableViolation::PeriodMismatch {
            partition: part.id,
            len,
            period: part.period,
        });
    }

    // Sliding count over the cyclic table.
    let owned: Vec<bool> = table.slots().iter().map(|s| *s == Some(part.id)).collect();
    let mut found = owned[..period].iter().filter(|&&o| o).count() as u64;
    for start in 0..len {
        if found != part.wcet {
            return Err(TableViolation::WindowCount {
                partition: part.id,
                start,
                found,
                expected: part.wcet,
            });
        }
        if owned[start] {
            found -= 1;
        }
        if owned[(start + period) % len] {
            found += 1;
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
