//! Plan configuration loading.
//!
//! Replaces the interactive prompt of the hypervisor tooling with an explicit
//! YAML file that is validated once and turned into [`PlanParams`].
//!
//! The expected YAML structure is:
//! ```yaml
//! processors: 2
//! slice_ms: 100
//! frequency_mhz: 400
//! document: xm_cf.arm.xml
//! hyperperiod_limit: 65536   # optional; unlimited when absent
//! partitions:
//!   - { id: 0, wcet: 1, period: 7 }
//!   - { id: 1, wcet: 2, period: 7 }
//! ```
//!
//! Every field except `partitions` is optional.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::partition::PartitionRecord;
use crate::scheduler::PlanParams;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Maps directly onto the YAML file layout.
///
/// Kept private – callers work with [`PlanConfig`] instead.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanConfigFile {
    #[serde(default = "default_processors")]
    processors: usize,
    #[serde(default = "default_slice_ms")]
    slice_ms: u64,
    #[serde(default = "default_frequency_mhz")]
    frequency_mhz: u32,
    #[serde(default = "default_document")]
    document: PathBuf,
    #[serde(default)]
    hyperperiod_limit: Option<u64>,
    #[serde(default)]
    partitions: Vec<PartitionRecord>,
}

fn default_processors() -> usize {
    1
}

fn default_slice_ms() -> u64 {
    100
}

fn default_frequency_mhz() -> u32 {
    400
}

fn default_document() -> PathBuf {
    PathBuf::from("xm_cf.arm.xml")
}

// ── PlanConfig ────────────────────────────────────────────────────────────────

/// A validated plan configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanConfig {
    pub processors: usize,
    /// Length of one time slice in ms.
    pub slice_ms: u64,
    pub frequency_mhz: u32,
    /// Hypervisor configuration document to rewrite.
    pub document: PathBuf,
    /// Maximum hyperperiod per processor, in slices; unlimited when `None`.
    pub hyperperiod_limit: Option<u64>,
    pub partitions: Vec<PartitionRecord>,
}

impl PlanConfig {
    /// Parse and validate `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or the values fail [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading plan configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let file: PlanConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        let config = Self {
            processors: file.processors,
            slice_ms: file.slice_ms,
            frequency_mhz: file.frequency_mhz,
            document: file.document,
            hyperperiod_limit: file.hyperperiod_limit,
            partitions: file.partitions,
        };
        config
            .validate()
            .with_context(|| format!("Invalid plan configuration: {}", path.display()))?;

        for p in &config.partitions {
            debug!("  Partition: {} | wcet: {} | period: {}", p.id, p.wcet, p.period);
        }
        info!(
            "Loaded {} partition(s) for {} processor(s), {}ms slices",
            config.partitions.len(),
            config.processors,
            config.slice_ms,
        );

        Ok(config)
    }

    /// Check the invariants the planner relies on.
    ///
    /// Re-run this after applying command-line overrides.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.partitions.is_empty(), "no partitions defined");
        ensure!(self.processors > 0, "processor count must be positive");
        ensure!(self.slice_ms > 0, "time slice length must be positive");
        ensure!(self.hyperperiod_limit != Some(0), "hyperperiod limit must be positive");

        let mut seen = BTreeSet::new();
        for p in &self.partitions {
            if p.period == 0 {
                bail!("partition {} has a zero period", p.id);
            }
            if !seen.insert(p.id) {
                bail!("partition id {} appears more than once", p.id);
            }
        }
        Ok(())
    }

    /// Planner parameters for this configuration.
    pub fn params(&self) -> PlanParams {
        PlanParams {
            processor_count: self.processors,
            slice_ms: self.slice_ms,
            frequency_mhz: self.frequency_mhz,
            hyperperiod_limit: self.hyperperiod_limit,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
