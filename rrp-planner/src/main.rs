/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use rrp_planner::config::PlanConfig;
use rrp_planner::plan::CyclicPlan;
use rrp_planner::scheduler::CyclicPlanner;
use rrp_planner::schedule_into_document;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Cyclic launch-table planner for time-partitioned hypervisors.
///
/// Example:
///   rrp-planner -c plan.yaml --processors 2 --document xm_cf.arm.xml
#[derive(Debug, Parser)]
#[command(
    name = "rrp-planner",
    about = "Cyclic launch-table planner for time-partitioned hypervisors",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML plan configuration file.
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Number of processors (overrides the configuration file).
    #[arg(short = 'n', long = "processors")]
    processors: Option<usize>,

    /// Time-slice length in ms (overrides the configuration file).
    #[arg(short = 's', long = "slice-ms")]
    slice_ms: Option<u64>,

    /// Processor frequency in MHz (overrides the configuration file).
    #[arg(short = 'f', long = "frequency-mhz")]
    frequency_mhz: Option<u32>,

    /// Hypervisor configuration document to rewrite (overrides the configuration file).
    #[arg(short = 'd', long = "document")]
    document: Option<PathBuf>,

    /// Compute and print the plan without touching the document.
    #[arg(long = "dry-run", default_value_t = false)]
    dry_run: bool,

    /// Log every time slice of every launch table.
    #[arg(short = 'p', long = "print-tables", default_value_t = false)]
    print_tables: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialise structured logging.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        config        = %cli.config.display(),
        processors    = ?cli.processors,
        slice_ms      = ?cli.slice_ms,
        frequency_mhz = ?cli.frequency_mhz,
        document      = ?cli.document,
        dry_run       = cli.dry_run,
        "Configuration"
    );

    if let Err(e) = run(&cli) {
        error!("Planning failed: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Load plan configuration ───────────────────────────────────────────────
    let mut config = PlanConfig::load_from_file(&cli.config)?;

    if let Some(n) = cli.processors {
        config.processors = n;
    }
    if let Some(ms) = cli.slice_ms {
        config.slice_ms = ms;
    }
    if let Some(mhz) = cli.frequency_mhz {
        config.frequency_mhz = mhz;
    }
    if let Some(doc) = &cli.document {
        config.document = doc.clone();
    }
    config
        .validate()
        .context("Invalid command-line override")?;

    // ── Schedule ──────────────────────────────────────────────────────────────
    let plan = if cli.dry_run {
        info!("Dry run: the configuration document is not modified");
        CyclicPlanner::new(config.params())
            .schedule(&config.partitions)
            .context("Scheduling failed")?
    } else {
        schedule_into_document(&config.partitions, config.params(), &config.document)?
    };

    report(&plan, cli.print_tables);
    Ok(())
}

fn report(plan: &CyclicPlan, print_tables: bool) {
    for cpu in &plan.processors {
        info!(
            processor = cpu.processor,
            partitions = cpu.partitions.len(),
            slots = cpu.slots.len(),
            major_frame_ms = cpu.major_frame_ms,
            "Launch table for CPU {}",
            cpu.processor
        );
        for p in &cpu.partitions {
            info!(
                "  partition {id}: requested {rw}/{rp} → {w}/{period} ({family}, +{slack})",
                id = p.id,
                rw = p.requested.wcet,
                rp = p.requested.period,
                w = p.wcet,
                period = p.period,
                family = p.family,
                slack = p.slack(),
            );
        }
        if print_tables {
            for line in cpu.table.describe() {
                info!("  {line}");
            }
            for slot in &cpu.slots {
                info!("  {slot}");
            }
        }
    }
}
