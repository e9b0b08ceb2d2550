/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Density sweep: on-time ratio of random tasks per density step.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::task::{execute_task, generate_task};
use crate::trace::Sample;

/// Tasks generated per density step unless overridden.
pub const DEFAULT_REPEAT: usize = 50;

/// Absorbs accumulated rounding so that `end` itself is still swept.
const DENSITY_EPSILON: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid sweep parameters: {0}")]
    InvalidParams(String),

    #[error("cannot write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepParams {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub wcet_min_ms: u64,
    pub wcet_max_ms: u64,
    pub repeat: usize,
}

impl SweepParams {
    pub fn validate(&self) -> Result<(), SweepError> {
        let invalid = |msg: String| Err(SweepError::InvalidParams(msg));
        if !(self.start > 0.0 && self.start.is_finite()) {
            return invalid(format!("start density must be positive, got {}", self.start));
        }
        if !(self.end >= self.start && self.end.is_finite()) {
            return invalid(format!("end density {} is below start {}", self.end, self.start));
        }
        if !(self.step > 0.0 && self.step.is_finite()) {
            return invalid(format!("density step must be positive, got {}", self.step));
        }
        if self.wcet_min_ms == 0 || self.wcet_min_ms > self.wcet_max_ms {
            return invalid(format!(
                "WCET range [{}, {}] ms is empty",
                self.wcet_min_ms, self.wcet_max_ms
            ));
        }
        if self.repeat == 0 {
            return invalid("repeat must be at least 1".into());
        }
        Ok(())
    }

    /// `start, start + step, …` up to and including `end`.
    pub fn densities(&self) -> Vec<f64> {
        (0u32..)
            .map(|k| self.start + f64::from(k) * self.step)
            .take_while(|d| *d <= self.end + DENSITY_EPSILON)
            .collect()
    }

    /// `<log>-<start>-<end>-<step>-<wcet_min>-<wcet_max>.csv`, every number
    /// written as a decimal (`1.0`, not `1`) so names match earlier result sets.
    pub fn output_path(&self, log: &Path) -> PathBuf {
        PathBuf::from(format!(
            "{}-{}-{}-{}-{}-{}.csv",
            log.display(),
            decimal(self.start),
            decimal(self.end),
            decimal(self.step),
            decimal(self.wcet_min_ms as f64),
            decimal(self.wcet_max_ms as f64)
        ))
    }
}

/// On-time ratio measured at one density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub density: f64,
    pub on_time_ratio: f64,
}

pub fn run_sweep<R: Rng + ?Sized>(
    params: &SweepParams,
    samples: &[Sample],
    rng: &mut R,
) -> Vec<SweepPoint> {
    params
        .densities()
        .into_iter()
        .map(|density| {
            let on_time = (0..params.repeat)
                .filter(|_| {
                    let task = generate_task(density, params.wcet_min_ms, params.wcet_max_ms, rng);
                    execute_task(&task, samples)
                })
                .count();
            let on_time_ratio = on_time as f64 / params.repeat as f64;
            info!(density, on_time, repeat = params.repeat, "Density tested");
            SweepPoint {
                density,
                on_time_ratio,
            }
        })
        .collect()
}

/// Shortest round-trip form, keeping a `.0` on whole numbers.
fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// One `density,ratio` line per point.
pub fn render_csv(points: &[SweepPoint]) -> String {
    let mut out = String::new();
    for p in points {
        let _ = writeln!(out, "{},{}", decimal(p.density), decimal(p.on_time_ratio));
    }
    out
}

pub fn write_csv(path: &Path, points: &[SweepPoint]) -> Result<(), SweepError> {
    fs::write(path, render_csv(points)).map_err(|source| SweepError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), points = points.len(), "sweep written");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
