/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Partition execution-trace logs.
//!
//! Each log line is one sample, comma separated:
//!
//! ```text
//! <seq>,<partition 1 counter>,<partition 2 counter>,<unused>,<timestamp µs>[,…]
//! ```
//!
//! Counters grow monotonically while their partition runs and stay flat while
//! it is descheduled, so `(time, counter)` pairs describe how much work the
//! partition could complete at any point of the trace.  Timestamps and both
//! counters must never decrease; the searches below rely on it.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

const P1_FIELD: usize = 1;
const P2_FIELD: usize = 2;
const TIME_FIELD: usize = 4;
const MIN_FIELDS: usize = 5;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("cannot read trace log {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// One `(time, counter)` observation of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub time_us: u64,
    pub counter: u64,
}

/// Which partition's counter column to replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    P1,
    P2,
}

impl Column {
    /// Naive-scheduler logs are evaluated on partition 2, all others on 1.
    pub fn for_log(path: &Path) -> Self {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if name.contains("naive") {
            Column::P2
        } else {
            Column::P1
        }
    }
}

/// The two counter series of one log, sharing timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub p1: Vec<Sample>,
    pub p2: Vec<Sample>,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let content = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trace = Self::parse(&content)?;
        debug!(path = %path.display(), samples = trace.p1.len(), "trace loaded");
        Ok(trace)
    }

    /// Parse log text; blank lines are skipped.
    ///
    /// A timestamp or counter lower than on the previous line is rejected.
    pub fn parse(content: &str) -> Result<Self, TraceError> {
        let mut trace = Trace::default();
        let mut last: Option<(u64, u64, u64)> = None;
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < MIN_FIELDS {
                return Err(TraceError::Parse {
                    line: idx + 1,
                    reason: format!("expected at least {MIN_FIELDS} fields, found {}", fields.len()),
                });
            }
            let field = |i: usize| {
                fields[i].parse::<u64>().map_err(|e| TraceError::Parse {
                    line: idx + 1,
                    reason: format!("field {i} ({:?}): {e}", fields[i]),
                })
            };
            let current = (field(TIME_FIELD)?, field(P1_FIELD)?, field(P2_FIELD)?);
            if let Some(prev) = last {
                let backwards = [
                    ("timestamp", prev.0, current.0),
                    ("partition 1 counter", prev.1, current.1),
                    ("partition 2 counter", prev.2, current.2),
                ]
                .into_iter()
                .find(|&(_, before, now)| now < before);
                if let Some((what, before, now)) = backwards {
                    return Err(TraceError::Parse {
                        line: idx + 1,
                        reason: format!("{what} goes backwards ({before} → {now})"),
                    });
                }
            }
            last = Some(current);

            let (time_us, p1, p2) = current;
            trace.p1.push(Sample {
                time_us,
                counter: p1,
            });
            trace.p2.push(Sample {
                time_us,
                counter: p2,
            });
        }
        Ok(trace)
    }

    pub fn column(&self, column: Column) -> &[Sample] {
        match column {
            Column::P1 => &self.p1,
            Column::P2 => &self.p2,
        }
    }
}

/// Index of the sample taken at `time_us`, else of the first one after it.
pub fn search_time(samples: &[Sample], time_us: u64) -> Option<usize> {
    let idx = samples.partition_point(|s| s.time_us < time_us);
    (idx < samples.len()).then_some(idx)
}

/// Index of the first sample whose counter reaches `counter`.
pub fn search_counter(samples: &[Sample], counter: f64) -> Option<usize> {
    let idx = samples.partition_point(|s| (s.counter as f64) < counter);
    (idx < samples.len()).then_some(idx)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(points: &[(u64, u64)]) -> Vec<Sample> {
        points
            .iter()
            .map(|&(time_us, counter)| Sample { time_us, counter })
            .collect()
    }

    // ── parse ─────────────────────────────────────────────────────────────────

    #[test]
    fn parse_reads_both_counters() {
        let trace = Trace::parse("0,10,20,x,1000,\n1,11,25,x,2000,\r\n\n").unwrap();
        assert_eq!(trace.p1, samples(&[(1000, 10), (2000, 11)]));
        assert_eq!(trace.p2, samples(&[(1000, 20), (2000, 25)]));
        assert_eq!(trace.column(Column::P2)[1].counter, 25);
    }

    #[test]
    fn short_line_is_rejected_with_its_number() {
        let err = Trace::parse("0,1,2,3,4\n0,1,2\n").unwrap_err();
        assert!(matches!(err, TraceError::Parse { line: 2, .. }));
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let err = Trace::parse("0,a,2,3,4\n").unwrap_err();
        assert!(matches!(err, TraceError::Parse { line: 1, .. }));
    }

    #[test]
    fn counter_reset_is_rejected_with_its_number() {
        let err = Trace::parse("0,100,0,x,0\n1,50,5,x,100\n2,200,9,x,200\n").unwrap_err();
        match err {
            TraceError::Parse { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("partition 1 counter"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn timestamp_going_backwards_is_rejected() {
        let err = Trace::parse("0,1,1,x,500\n\n1,2,2,x,400\n").unwrap_err();
        assert!(matches!(err, TraceError::Parse { line: 3, .. }));
    }

    #[test]
    fn flat_counters_and_repeated_timestamps_are_accepted() {
        let trace = Trace::parse("0,5,5,x,100\n1,5,5,x,100\n2,6,5,x,200\n").unwrap();
        assert_eq!(trace.p1.len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Trace::load(Path::new("/nonexistent/trace.log")),
            Err(TraceError::Io { .. })
        ));
    }

    #[test]
    fn naive_logs_use_partition_two() {
        assert_eq!(Column::for_log(Path::new("/logs/naive-run.log")), Column::P2);
        assert_eq!(Column::for_log(Path::new("/naive/rrp-run.log")), Column::P1);
    }

    // ── search ────────────────────────────────────────────────────────────────

    #[test]
    fn search_time_exact_and_next() {
        let s = samples(&[(0, 0), (10, 5), (20, 9)]);
        assert_eq!(search_time(&s, 10), Some(1));
        assert_eq!(search_time(&s, 15), Some(2));
        assert_eq!(search_time(&s, 0), Some(0));
        assert_eq!(search_time(&s, 21), None);
    }

    #[test]
    fn search_counter_finds_first_reaching_sample() {
        let s = samples(&[(0, 0), (10, 5), (20, 5), (30, 9)]);
        assert_eq!(search_counter(&s, 5.0), Some(1));
        assert_eq!(search_counter(&s, 5.5), Some(3));
        assert_eq!(search_counter(&s, 9.5), None);
    }
}
