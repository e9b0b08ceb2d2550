/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use deadline_sim::sweep::{run_sweep, write_csv, SweepParams, DEFAULT_REPEAT};
use deadline_sim::trace::{Column, Trace};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Deadline simulator over partition execution-trace logs.
///
/// Example:
///   deadline-sim rrp.log 0.1 0.9 0.1 1 50 --seed 7
#[derive(Debug, Parser)]
#[command(
    name = "deadline-sim",
    about = "Monte-Carlo deadline simulator over partition execution traces",
    long_about = None,
)]
struct Cli {
    /// Trace log to replay.
    log: PathBuf,

    /// First density of the sweep.
    start: f64,

    /// Last density of the sweep (inclusive).
    end: f64,

    /// Density increment.
    step: f64,

    /// Smallest task WCET in ms.
    wcet_min_ms: u64,

    /// Largest task WCET in ms.
    wcet_max_ms: u64,

    /// Random tasks per density.
    #[arg(short = 'r', long = "repeat", default_value_t = DEFAULT_REPEAT)]
    repeat: usize,

    /// Seed for reproducible runs (random if omitted).
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Partition counter to replay (derived from the log name if omitted).
    #[arg(long = "column", value_enum)]
    column: Option<ColumnArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColumnArg {
    P1,
    P2,
}

impl From<ColumnArg> for Column {
    fn from(arg: ColumnArg) -> Self {
        match arg {
            ColumnArg::P1 => Column::P1,
            ColumnArg::P2 => Column::P2,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        log     = %cli.log.display(),
        start   = cli.start,
        end     = cli.end,
        step    = cli.step,
        wcet_ms = ?(cli.wcet_min_ms, cli.wcet_max_ms),
        repeat  = cli.repeat,
        seed    = ?cli.seed,
        "Configuration"
    );

    if let Err(e) = run(&cli) {
        error!("Simulation failed: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let params = SweepParams {
        start: cli.start,
        end: cli.end,
        step: cli.step,
        wcet_min_ms: cli.wcet_min_ms,
        wcet_max_ms: cli.wcet_max_ms,
        repeat: cli.repeat,
    };
    params.validate()?;

    let trace = Trace::load(&cli.log).context("Failed to load trace log")?;
    let column = cli
        .column
        .map(Column::from)
        .unwrap_or_else(|| Column::for_log(&cli.log));
    info!(?column, samples = trace.column(column).len(), "Trace loaded");

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let points = run_sweep(&params, trace.column(column), &mut rng);

    let output = params.output_path(&cli.log);
    write_csv(&output, &points)?;
    info!(output = %output.display(), points = points.len(), "Sweep complete");
    Ok(())
}
