/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! MulZ multiprocessor allocator.
//!
//! First-fit-decreasing bin packing of raw partitions onto processors, with
//! every partition rounded up into the `Z_{n,2}` family of the processor that
//! receives it:
//!
//! 1. Sort partitions by requested availability factor, heaviest first.
//! 2. For each partition compute its preferred base (the one with the
//!    tightest `Z_{n,2}` approximation).
//! 3. Scan processors in index order.  An unused processor adopts the
//!    preferred base; a used one accepts the partition if its residual
//!    capacity covers the approximation under *its* base.
//! 4. No taker → [`SchedulerError::BinPackingFailure`].
//!
//! This is a greedy heuristic: it never reorders processors or backtracks, so
//! it can reject sets that some other packing would accept.

use tracing::{debug, info, warn};

use super::SchedulerError;
use crate::approx::zfamily::{preferred_base, z_approx, ZApprox};
use crate::approx::Fraction;
use crate::partition::{sort_by_aaf_desc, Family, NormalizedPartition, PartitionRecord};

/// Per-processor allocation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorBin {
    /// `Z_{n,2}` base adopted with the first partition; `None` while unused.
    pub base: Option<u64>,
    /// `1 − Σ aaf` of the assigned surrogates.
    pub residual: Fraction,
    /// Surrogates in assignment order (heaviest first).
    pub partitions: Vec<NormalizedPartition>,
}

impl ProcessorBin {
    fn new() -> Self {
        Self {
            base: None,
            residual: Fraction::ONE,
            partitions: Vec::new(),
        }
    }

    /// Approximation under this bin's base if it still fits, else `None`.
    ///
    /// An unused bin always fits the partition's preferred approximation.
    fn offer(&self, aaf: Fraction, preferred: (u64, ZApprox)) -> Option<(u64, ZApprox)> {
        match self.base {
            None => Some(preferred),
            Some(base) => {
                let z = z_approx(aaf, base);
                (self.residual >= z.value).then_some((base, z))
            }
        }
    }

    fn accept(&mut self, record: &PartitionRecord, base: u64, z: ZApprox) {
        self.base = Some(base);
        self.residual = self.residual.checked_sub(z.value).unwrap_or(Fraction::ZERO);
        self.partitions.push(NormalizedPartition::new(
            record,
            z.wcet,
            z.period,
            Family::Z { base },
        ));
    }
}

/// Distribute `records` over `processor_count` processors.
///
/// Returns one bin per processor, in processor order; unused processors get an
/// empty bin with no base.
///
/// # Errors
/// * [`SchedulerError::InvalidInput`] – zero processors or a zero period.
/// * [`SchedulerError::BinPackingFailure`] – first partition no processor accepts.
pub fn allocate(
    records: &[PartitionRecord],
    processor_count: usize,
) -> Result<Vec<ProcessorBin>, SchedulerError> {
    if processor_count == 0 {
        return Err(SchedulerError::invalid("processor count must be positive"));
    }
    if let Some(r) = records.iter().find(|r| r.period == 0) {
        return Err(SchedulerError::invalid(format!(
            "partition {} has a zero period",
            r.id
        )));
    }

    let mut order: Vec<&PartitionRecord> = records.iter().collect();
    sort_by_aaf_desc(&mut order, |r| r.aaf());

    let mut bins: Vec<ProcessorBin> = (0..processor_count).map(|_| ProcessorBin::new()).collect();

    info!(
        processor_count,
        partition_count = records.len(),
        "MulZ allocation"
    );

    for record in order {
        let aaf = record.aaf();
        let preferred = preferred_base(aaf);

        let Some((cpu, (base, z))) = bins
            .iter()
            .enumerate()
            .find_map(|(cpu, bin)| bin.offer(aaf, preferred).map(|choice| (cpu, choice)))
        else {
            warn!(partition = record.id, aaf = %aaf, "✗ no processor has room");
            return Err(SchedulerError::BinPackingFailure {
                partition: record.id,
                aaf,
            });
        };

        bins[cpu].accept(record, base, z);
        debug!(
            partition = record.id,
            processor = cpu,
            base,
            wcet = z.wcet,
            period = z.period,
            residual = %bins[cpu].residual,
            "assigned"
        );
    }

    for (cpu, bin) in bins.iter().enumerate() {
        info!(
            processor = cpu,
            base = ?bin.base,
            partitions = bin.partitions.len(),
            residual = %bin.residual,
            "bin"
        );
    }

    Ok(bins)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
