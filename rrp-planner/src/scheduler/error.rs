/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for the launch-table planner.
//!
//! Every failure is local and deterministic: the planner is a pure function of
//! its input, so retrying the same input is pointless.  Variants carry the
//! partition id and processor index so the caller can log or report them
//! without further parsing.
//!
//! | Variant | Raised by | Meaning |
//! |---|---|---|
//! | `InvalidInput` | facade, hyperperiod, Magic-7 | upstream contract violated |
//! | `Unschedulable` | `partition_single` | no room for a partition on one processor |
//! | `BinPackingFailure` | MulZ | no processor has enough residual capacity |
//! | `SlotConflict` | `partition_single` | placement hit an occupied slot (algorithm bug) |
//!
//! **Do not** replace these with `anyhow::Error` inside the scheduler; the
//! binary wraps them with context at the outer layer only.

use thiserror::Error;

use crate::approx::Fraction;
use crate::hyperperiod::HyperperiodError;
use crate::partition::PartitionId;

/// Top-level error returned by
/// [`CyclicPlanner::schedule()`](super::CyclicPlanner::schedule).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulerError {
    /// Empty partition list, zero period, duplicate id, zero processors, or a
    /// hyperperiod that cannot be represented.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The shift search (or the single-slot placement) found no room for the
    /// partition on this processor.
    #[error("partition {partition} is unschedulable on processor {processor}")]
    Unschedulable {
        processor: usize,
        partition: PartitionId,
    },

    /// MulZ could not fit the partition on any processor.
    #[error("no processor can host partition {partition} (availability factor {aaf})")]
    BinPackingFailure { partition: PartitionId, aaf: Fraction },

    /// A computed slot index was already occupied.
    ///
    /// The shift search guarantees this never happens; seeing it means the
    /// table would be corrupt, so the run is aborted.
    #[error("slot {index} on processor {processor} is already taken (placing partition {partition})")]
    SlotConflict {
        processor: usize,
        partition: PartitionId,
        index: u64,
    },
}

impl SchedulerError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SchedulerError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<HyperperiodError> for SchedulerError {
    fn from(e: HyperperiodError) -> Self {
        SchedulerError::invalid(e.to_string())
    }
}
