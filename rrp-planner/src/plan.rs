/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Launch tables and their run-length-encoded slot view.
//!
//! ```text
//! partition_single ──► LaunchTable ──(encode)──► Vec<SlotRecord> ──► xmcf (Plan/Slot)
//!                      one entry per slice        idle runs dropped
//! ```
//!
//! A [`CyclicPlan`] bundles one [`ProcessorPlan`] per processor together with
//! the time-slice length and processor frequency needed by the hypervisor
//! configuration document.

use std::fmt;

use crate::partition::{NormalizedPartition, PartitionId};

// ── LaunchTable ───────────────────────────────────────────────────────────────

/// One processor's slot assignment over a hyperperiod.
///
/// Entry `k` is the partition occupying time slice `k`, or `None` when idle.
/// Each slice holds at most one partition by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchTable {
    slots: Vec<Option<PartitionId>>,
}

impl LaunchTable {
    /// An all-idle table of `len` slices.
    pub fn idle(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PartitionId> {
        self.slots.get(index).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<PartitionId>] {
        &self.slots
    }

    /// Number of slices assigned to `id`.
    pub fn count(&self, id: PartitionId) -> usize {
        self.slots.iter().filter(|s| **s == Some(id)).count()
    }

    /// Number of idle slices.
    pub fn idle_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    pub(crate) fn assign(&mut self, index: usize, id: PartitionId) {
        self.slots[index] = Some(id);
    }

    /// One human-readable line per slice: `Time slice 3 : 1` / `Time slice 4 : idle`.
    pub fn describe(&self) -> impl Iterator<Item = String> + '_ {
        self.slots.iter().enumerate().map(|(k, s)| match s {
            Some(id) => format!("Time slice {k} : {id}"),
            None => format!("Time slice {k} : idle"),
        })
    }
}

impl From<Vec<Option<PartitionId>>> for LaunchTable {
    fn from(slots: Vec<Option<PartitionId>>) -> Self {
        Self { slots }
    }
}

// ── SlotRecord ────────────────────────────────────────────────────────────────

/// A maximal run of consecutive slices owned by one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRecord {
    /// Position among the emitted slots of this processor (`Slot@id`).
    pub id: usize,
    /// Offset from the start of the major frame, in ms.
    pub start_ms: u64,
    /// Run length × slice length, in ms.
    pub duration_ms: u64,
    pub partition_id: PartitionId,
}

impl fmt::Display for SlotRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slot {} : partition {} @ {}ms for {}ms",
            self.id, self.partition_id, self.start_ms, self.duration_ms
        )
    }
}

// ── Emitter ───────────────────────────────────────────────────────────────────

/// Run-length-encode `table` into slot records, skipping idle runs.
///
/// Start offsets accumulate over every run, idle ones included, so a slot's
/// `start_ms` is its true position inside the major frame.
pub fn encode(table: &LaunchTable, slice_ms: u64) -> Vec<SlotRecord> {
    let mut records = Vec::new();
    let mut start = 0u64;
    let mut rest = table.slots();

    while let Some(&owner) = rest.first() {
        let run = rest.iter().take_while(|&&s| s == owner).count();
        let duration = run as u64 * slice_ms;
        if let Some(partition_id) = owner {
            records.push(SlotRecord {
                id: records.len(),
                start_ms: start,
                duration_ms: duration,
                partition_id,
            });
        }
        start += duration;
        rest = &rest[run..];
    }
    records
}

/// Inverse of [`encode`]: rebuild a `len`-slice table from slot records.
///
/// Slices not covered by any record are idle.  Records reaching past `len`
/// are clipped.
pub fn expand(records: &[SlotRecord], slice_ms: u64, len: usize) -> LaunchTable {
    let mut table = LaunchTable::idle(len);
    if slice_ms == 0 {
        return table;
    }
    for r in records {
        let first = (r.start_ms / slice_ms) as usize;
        let count = (r.duration_ms / slice_ms) as usize;
        for k in first..(first + count).min(len) {
            table.assign(k, r.partition_id);
        }
    }
    table
}

// ── Plans ─────────────────────────────────────────────────────────────────────

/// Final result for one processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorPlan {
    /// Processor index (`Processor@id`).
    pub processor: usize,
    /// Surrogates placed on this processor, heaviest first.
    pub partitions: Vec<NormalizedPartition>,
    pub table: LaunchTable,
    pub slots: Vec<SlotRecord>,
    /// `table.len() × slice_ms`.
    pub major_frame_ms: u64,
}

impl ProcessorPlan {
    /// Build the plan and its emitted slot records.
    pub fn new(
        processor: usize,
        partitions: Vec<NormalizedPartition>,
        table: LaunchTable,
        slice_ms: u64,
    ) -> Self {
        let slots = encode(&table, slice_ms);
        let major_frame_ms = (table.len() as u64).saturating_mul(slice_ms);
        Self {
            processor,
            partitions,
            table,
            slots,
            major_frame_ms,
        }
    }
}

/// Launch tables for every processor of one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicPlan {
    pub processors: Vec<ProcessorPlan>,
    pub slice_ms: u64,
    pub frequency_mhz: u32,
}

impl CyclicPlan {
    /// Processor that hosts partition `id`, if any.
    pub fn processor_of(&self, id: PartitionId) -> Option<usize> {
        self.processors
            .iter()
            .find(|p| p.partitions.iter().any(|n| n.id == id))
            .map(|p| p.processor)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
