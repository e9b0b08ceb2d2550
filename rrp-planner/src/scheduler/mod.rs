//! Cyclic launch-table planner.
//!
//! [`CyclicPlanner`] turns a list of requested partitions into one launch
//! table per processor.  The result is a [`CyclicPlan`] holding one
//! [`ProcessorPlan`] per processor, ready to be written into the hypervisor
//! configuration document.
//!
//! # Normalization depends on the processor count
//!
//! | Processors | Normalization | Placement |
//! |---|---|---|
//! | 1 | Magic-7 on every partition | `partition_single` |
//! | > 1 | MulZ (`Z_{n,2}` per processor) | `partition_single` per processor |
//!
//! The two families give different schedulability guarantees, so a set that
//! fits one processor under Magic-7 is not re-tried with the `Z_{n,2}` family
//! and vice versa.
//!
//! # Example
//! ```rust,ignore
//! let planner = CyclicPlanner::new(PlanParams { processor_count: 2, ..Default::default() });
//! let plan: CyclicPlan = planner.schedule(&partitions)?;
//! ```

pub mod error;
pub mod feasibility;
pub mod mulz;
pub mod shift;
pub mod single;

pub use error::SchedulerError;

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::approx::magic7::magic7;
use crate::hyperperiod::HyperperiodCalculator;
use crate::partition::{sort_by_aaf_desc, NormalizedPartition, PartitionRecord};
use crate::plan::{CyclicPlan, LaunchTable, ProcessorPlan};

use feasibility::{total_utilization, verify_table};
use single::partition_single;

// ── Parameters ────────────────────────────────────────────────────────────────

/// Run parameters passed explicitly into the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanParams {
    pub processor_count: usize,
    /// Length of one time slice in ms.
    pub slice_ms: u64,
    /// Written into `Processor@frequency`.
    pub frequency_mhz: u32,
    /// Maximum hyperperiod per processor, in slices; unlimited when `None`.
    pub hyperperiod_limit: Option<u64>,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            processor_count: 1,
            slice_ms: 100,
            frequency_mhz: 400,
            hyperperiod_limit: None,
        }
    }
}

// ── CyclicPlanner ─────────────────────────────────────────────────────────────

/// The launch-table planner.
///
/// Holds only the run parameters.  All per-run state (available slices,
/// processor bins) lives inside `schedule()` and is dropped when it returns.
#[derive(Debug, Clone)]
pub struct CyclicPlanner {
    params: PlanParams,
}

impl CyclicPlanner {
    pub fn new(params: PlanParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PlanParams {
        &self.params
    }

    // ── Public entry point ────────────────────────────────────────────────────

    /// Build one launch table per processor for `partitions`.
    ///
    /// The caller's records are not modified; every [`ProcessorPlan`] carries
    /// the normalized surrogates together with the records they came from.
    ///
    /// # Errors
    /// * [`SchedulerError::InvalidInput`] – empty list, zero period, duplicate
    ///   id, zero processors, zero slice length, or an unrepresentable
    ///   hyperperiod.
    /// * [`SchedulerError::BinPackingFailure`] – MulZ found no processor.
    /// * [`SchedulerError::Unschedulable`] / [`SchedulerError::SlotConflict`] –
    ///   slot assignment failed on some processor.
    pub fn schedule(&self, partitions: &[PartitionRecord]) -> Result<CyclicPlan, SchedulerError> {
        // ── Preconditions ─────────────────────────────────────────────────────
        self.validate(partitions)?;

        info!(
            processor_count = self.params.processor_count,
            partition_count = partitions.len(),
            slice_ms = self.params.slice_ms,
            "=== CyclicPlanner::schedule() ==="
        );

        // ── Normalization dispatch ────────────────────────────────────────────
        let per_processor: Vec<Vec<NormalizedPartition>> = if self.params.processor_count > 1 {
            info!("Executing MulZ allocation");
            mulz::allocate(partitions, self.params.processor_count)?
                .into_iter()
                .map(|bin| bin.partitions)
                .collect()
        } else {
            info!("Executing Magic-7 normalization");
            vec![partitions.iter().map(magic7).collect::<Result<_, _>>()?]
        };

        // ── Slot assignment ───────────────────────────────────────────────────
        let calc = HyperperiodCalculator::with_optional_limit(self.params.hyperperiod_limit);
        let mut processors = Vec::with_capacity(per_processor.len());
        for (cpu, mut normalized) in per_processor.into_iter().enumerate() {
            let table = partition_single(&normalized, cpu, &calc)?;
            Self::run_table_check(cpu, &table, &normalized);

            sort_by_aaf_desc(&mut normalized, |p| p.aaf);
            processors.push(ProcessorPlan::new(cpu, normalized, table, self.params.slice_ms));
        }

        let plan = CyclicPlan {
            processors,
            slice_ms: self.params.slice_ms,
            frequency_mhz: self.params.frequency_mhz,
        };

        info!(
            processor_count = plan.processors.len(),
            total_slots = plan.processors.iter().map(|p| p.slots.len()).sum::<usize>(),
            "=== Scheduling complete ==="
        );

        Ok(plan)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn validate(&self, partitions: &[PartitionRecord]) -> Result<(), SchedulerError> {
        if partitions.is_empty() {
            return Err(SchedulerError::invalid("no partitions to schedule"));
        }
        if self.params.processor_count == 0 {
            return Err(SchedulerError::invalid("processor count must be positive"));
        }
        if self.params.slice_ms == 0 {
            return Err(SchedulerError::invalid("time slice length must be positive"));
        }

        let mut seen = BTreeSet::new();
        for p in partitions {
            if p.period == 0 {
                return Err(SchedulerError::invalid(format!(
                    "partition {} has a zero period",
                    p.id
                )));
            }
            if !seen.insert(p.id) {
                return Err(SchedulerError::invalid(format!(
                    "partition id {} appears more than once",
                    p.id
                )));
            }
        }
        Ok(())
    }

    /// Post-schedule verification; logs, never fails the run.
    fn run_table_check(cpu: usize, table: &LaunchTable, partitions: &[NormalizedPartition]) {
        if let Err(violation) = verify_table(table, partitions) {
            warn!(
                processor = cpu,
                utilization = ?total_utilization(partitions).map(|u| u.to_f64()),
                %violation,
                "launch table does not match its partitions"
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx::Fraction;
    use crate::partition::Family;

    // ── Test helpers ──────────────────────────────────────────────────────────

    fn records(specs: &[(u32, u64, u64)]) -> Vec<PartitionRecord> {
        specs
            .iter()
            .map(|&(id, w, p)| PartitionRecord::new(id, w, p))
            .collect()
    }

    fn planner(processor_count: usize) -> CyclicPlanner {
        CyclicPlanner::new(PlanParams {
            processor_count,
            ..Default::default()
        })
    }

    // ── single processor ──────────────────────────────────────────────────────

    #[test]
    fn one_and_two_sevenths_end_to_end() {
        let plan = planner(1).schedule(&records(&[(0, 1, 7), (1, 2, 7)])).unwrap();
        assert_eq!(plan.processors.len(), 1);
        let cpu = &plan.processors[0];
        assert_eq!(cpu.table.len(), 7);
        assert_eq!(cpu.table.count(0), 1);
        assert_eq!(cpu.table.count(1), 2);
        assert_eq!(cpu.table.idle_count(), 4);
        assert_eq!(cpu.major_frame_ms, 700);
        // [1, 0, -, 1, -, -, -] → three runs
        assert_eq!(cpu.slots.len(), 3);
    }

    #[test]
    fn single_processor_uses_magic7() {
        let plan = planner(1).schedule(&records(&[(0, 1, 20), (1, 3, 10)])).unwrap();
        let parts = &plan.processors[0].partitions;
        assert!(parts.iter().all(|p| p.family == Family::Magic7));
        // heaviest first: 3/10 → 3/7, 1/20 → 1/14
        assert_eq!((parts[0].id, parts[0].wcet, parts[0].period), (1, 3, 7));
        assert_eq!((parts[1].id, parts[1].wcet, parts[1].period), (0, 1, 14));
        assert_eq!(plan.processors[0].table.len(), 14);
    }

    #[test]
    fn input_records_are_not_modified() {
        let input = records(&[(0, 1, 20)]);
        let copy = input.clone();
        let plan = planner(1).schedule(&input).unwrap();
        assert_eq!(input, copy);
        assert_eq!(plan.processors[0].partitions[0].requested, copy[0]);
        assert_eq!(plan.processors[0].partitions[0].aaf, Fraction::new(1, 14));
    }

    #[test]
    fn plan_carries_slice_and_frequency() {
        let planner = CyclicPlanner::new(PlanParams {
            slice_ms: 50,
            frequency_mhz: 1200,
            ..Default::default()
        });
        let plan = planner.schedule(&records(&[(0, 1, 7)])).unwrap();
        assert_eq!(plan.slice_ms, 50);
        assert_eq!(plan.frequency_mhz, 1200);
        assert_eq!(plan.processors[0].major_frame_ms, 350);
    }

    #[test]
    fn single_processor_overload_is_unschedulable() {
        let err = planner(1).schedule(&records(&[(0, 6, 7), (1, 2, 7)])).unwrap_err();
        assert!(matches!(err, SchedulerError::Unschedulable { processor: 0, .. }));
    }

    // ── multiprocessor ────────────────────────────────────────────────────────

    #[test]
    fn multiprocessor_uses_z_family() {
        let plan = planner(2)
            .schedule(&records(&[(0, 4, 5), (1, 1, 2), (2, 1, 3), (3, 1, 10)]))
            .unwrap();
        assert_eq!(plan.processors.len(), 2);
        assert_eq!(plan.processor_of(0), Some(0));
        assert_eq!(plan.processor_of(3), Some(0));
        assert_eq!(plan.processor_of(1), Some(1));
        assert_eq!(plan.processor_of(2), Some(1));
        for cpu in &plan.processors {
            assert!(cpu
                .partitions
                .iter()
                .all(|p| matches!(p.family, Family::Z { .. })));
            assert!(verify_table(&cpu.table, &cpu.partitions).is_ok());
        }
        assert_eq!(plan.processors[0].table.len(), 10);
        assert_eq!(plan.processors[1].table.len(), 4);
    }

    #[test]
    fn unused_processor_gets_an_empty_plan() {
        let plan = planner(3).schedule(&records(&[(0, 1, 3), (1, 1, 3)])).unwrap();
        assert_eq!(plan.processors.len(), 3);
        assert!(plan.processors[1].table.is_empty());
        assert!(plan.processors[2].slots.is_empty());
        assert_eq!(plan.processors[2].major_frame_ms, 0);
    }

    #[test]
    fn multiprocessor_overload_is_bin_packing_failure() {
        let err = planner(2)
            .schedule(&records(&[(0, 4, 5), (1, 4, 5), (2, 4, 5)]))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::BinPackingFailure { partition: 2, .. }));
    }

    // ── input validation ──────────────────────────────────────────────────────

    #[test]
    fn empty_list_is_invalid_input() {
        assert!(matches!(
            planner(1).schedule(&[]),
            Err(SchedulerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn zero_period_is_invalid_input() {
        assert!(matches!(
            planner(2).schedule(&records(&[(0, 1, 7), (1, 1, 0)])),
            Err(SchedulerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn duplicate_id_is_invalid_input() {
        let err = planner(1).schedule(&records(&[(4, 1, 7), (4, 2, 7)])).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::InvalidInput {
                reason: "partition id 4 appears more than once".into()
            }
        );
    }

    #[test]
    fn zero_processors_and_zero_slice_are_invalid_input() {
        assert!(matches!(
            planner(0).schedule(&records(&[(0, 1, 7)])),
            Err(SchedulerError::InvalidInput { .. })
        ));
        let planner = CyclicPlanner::new(PlanParams {
            slice_ms: 0,
            ..Default::default()
        });
        assert!(matches!(
            planner.schedule(&records(&[(0, 1, 7)])),
            Err(SchedulerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn hyperperiod_over_limit_is_invalid_input() {
        let planner = CyclicPlanner::new(PlanParams {
            hyperperiod_limit: Some(10),
            ..Default::default()
        });
        // 1/20 → 1/14, and 14 > 10
        assert!(matches!(
            planner.schedule(&records(&[(0, 1, 20)])),
            Err(SchedulerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn tiny_factor_gets_a_long_table_without_a_limit() {
        // 1/200000 → 1/(7·2^14)
        let plan = planner(1).schedule(&records(&[(0, 1, 200_000)])).unwrap();
        let cpu = &plan.processors[0];
        assert_eq!(cpu.table.len(), 114_688);
        assert_eq!(cpu.table.count(0), 1);
        assert_eq!(cpu.partitions[0].period, 114_688);
    }

    #[test]
    fn default_params() {
        let p = PlanParams::default();
        assert_eq!(p.processor_count, 1);
        assert_eq!(p.slice_ms, 100);
        assert_eq!(p.frequency_mhz, 400);
        assert_eq!(p.hyperperiod_limit, None);
        assert_eq!(planner(4).params().processor_count, 4);
    }
}
