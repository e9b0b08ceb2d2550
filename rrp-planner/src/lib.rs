/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! rrp-planner – offline cyclic launch-table synthesis for time-partitioned
//! hypervisors.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── partition/      – requested records and normalized surrogates
//! ├── approx/         – exact fractions, Magic-7 and Z_{n,2} families
//! ├── hyperperiod/    – GCD / LCM helpers with overflow and size limits
//! ├── scheduler/      – shift search, partition_single, MulZ, planner facade
//! ├── plan/           – launch tables and their run-length-encoded slots
//! ├── config/         – YAML plan configuration
//! └── xmcf/           – hypervisor configuration document rewrite
//! ```

pub mod approx;
pub mod config;
pub mod hyperperiod;
pub mod partition;
pub mod plan;
pub mod scheduler;
pub mod xmcf;

use std::path::Path;

use anyhow::{Context, Result};

use partition::PartitionRecord;
use plan::CyclicPlan;
use scheduler::{CyclicPlanner, PlanParams};
use xmcf::ConfigDocument;

/// Schedule `partitions` and write the result into the configuration
/// document at `document`.
///
/// The document is opened and checked before scheduling and written only
/// after every processor has been planned, so a failing run leaves it
/// untouched.
pub fn schedule_into_document(
    partitions: &[PartitionRecord],
    params: PlanParams,
    document: &Path,
) -> Result<CyclicPlan> {
    let mut doc = ConfigDocument::open(document)?;

    let plan = CyclicPlanner::new(params)
        .schedule(partitions)
        .context("Scheduling failed")?;

    doc.replace_processors(&plan)?;
    doc.save()?;
    Ok(plan)
}
