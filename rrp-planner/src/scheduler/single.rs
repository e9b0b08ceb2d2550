/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Single-processor slot assignment (`partition_single`).
//!
//! Lays out every normalized partition of one processor over the hyperperiod,
//! heaviest first:
//!
//! * `wcet == 0` – nothing to place.
//! * `wcet == 1` – the lowest free slice, which must fall inside the first
//!   period, repeated every `period`.
//! * otherwise – the standard pattern shifted by [`find_delta`], repeated in
//!   every period window.
//!
//! Placement is greedy (first fitting shift, heaviest partition first).  It
//! guarantees feasibility of what it returns, not minimal idle time.

use std::collections::BTreeSet;

use tracing::{debug, error, info, warn};

use super::shift::find_delta;
use super::SchedulerError;
use crate::hyperperiod::HyperperiodCalculator;
use crate::partition::{sort_by_aaf_desc, NormalizedPartition};
use crate::plan::LaunchTable;

/// Build one processor's launch table.
///
/// An empty partition list yields an empty (length 0) table.
///
/// # Errors
/// * [`SchedulerError::InvalidInput`] – hyperperiod overflow or over the limit.
/// * [`SchedulerError::Unschedulable`] – no free shift / no free slice in the
///   first period for some partition.
/// * [`SchedulerError::SlotConflict`] – a replicated index was already taken.
pub fn partition_single(
    partitions: &[NormalizedPartition],
    processor: usize,
    calc: &HyperperiodCalculator,
) -> Result<LaunchTable, SchedulerError> {
    if partitions.is_empty() {
        debug!(processor, "no partitions, empty launch table");
        return Ok(LaunchTable::idle(0));
    }

    let hyperperiod = calc.calculate(partitions)?.hyperperiod;
    let len = usize::try_from(hyperperiod).map_err(|_| {
        SchedulerError::invalid(format!("hyperperiod {hyperperiod} does not fit in memory"))
    })?;

    let mut table = LaunchTable::idle(len);
    let mut available: BTreeSet<u64> = (0..hyperperiod).collect();

    let mut order: Vec<&NormalizedPartition> = partitions.iter().collect();
    sort_by_aaf_desc(&mut order, |p| p.aaf);

    info!(
        processor,
        hyperperiod,
        partition_count = partitions.len(),
        "partition_single"
    );

    for part in order {
        let occupied = match part.wcet {
            0 => {
                debug!(processor, partition = part.id, "zero budget, nothing to place");
                continue;
            }
            1 => place_single_slot(part, hyperperiod, &available, processor)?,
            _ => place_pattern(part, hyperperiod, &available, processor)?,
        };

        for &index in &occupied {
            table.assign(index as usize, part.id);
            available.remove(&index);
        }

        info!(
            processor,
            partition = part.id,
            wcet = part.wcet,
            period = part.period,
            slices = occupied.len(),
            free = available.len(),
            "✓ placed"
        );
    }

    Ok(table)
}

/// `wcet == 1`: lowest free slice, repeated every period.
fn place_single_slot(
    part: &NormalizedPartition,
    hyperperiod: u64,
    available: &BTreeSet<u64>,
    processor: usize,
) -> Result<Vec<u64>, SchedulerError> {
    let first = match available.first() {
        Some(&index) if index < part.period => index,
        other => {
            warn!(
                processor,
                partition = part.id,
                lowest_free = ?other,
                period = part.period,
                "✗ no free slice inside the first period"
            );
            return Err(SchedulerError::Unschedulable {
                processor,
                partition: part.id,
            });
        }
    };

    (0..part.repetitions(hyperperiod))
        .map(|l| first + l * part.period)
        .map(|index| claim(index, part, available, processor))
        .collect()
}

/// `wcet > 1`: shifted standard pattern, repeated every period.
fn place_pattern(
    part: &NormalizedPartition,
    hyperperiod: u64,
    available: &BTreeSet<u64>,
    processor: usize,
) -> Result<Vec<u64>, SchedulerError> {
    // Proportional estimate of what later partitions still need inside one
    // period: floor(|available| / H · period) − wcet.
    let capacity = available.len() as u64 * part.period / hyperperiod;
    let q_left = capacity.saturating_sub(part.wcet);

    let Some(delta) = find_delta(available, part.period, part.wcet, q_left) else {
        warn!(
            processor,
            partition = part.id,
            wcet = part.wcet,
            period = part.period,
            q_left,
            "✗ no shift fits"
        );
        return Err(SchedulerError::Unschedulable {
            processor,
            partition: part.id,
        });
    };

    let mut occupied = Vec::with_capacity((part.wcet * part.repetitions(hyperperiod)) as usize);
    for l in 0..part.repetitions(hyperperiod) {
        for k in 0..part.wcet {
            let index = (k * part.period / part.wcet + delta) % part.period + l * part.period;
            occupied.push(claim(index, part, available, processor)?);
        }
    }
    Ok(occupied)
}

fn claim(
    index: u64,
    part: &NormalizedPartition,
    available: &BTreeSet<u64>,
    processor: usize,
) -> Result<u64, SchedulerError> {
    if available.contains(&index) {
        Ok(index)
    } else {
        error!(processor, partition = part.id, index, "slot already taken");
        Err(SchedulerError::SlotConflict {
            processor,
            partition: part.id,
            index,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
