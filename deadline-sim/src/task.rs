/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Synthetic tasks replayed against a partition trace.

use rand::Rng;
use tracing::{trace, warn};

use crate::trace::{search_counter, search_time, Sample};

/// Counter increments per µs of execution on the traced board.
pub const COUNTER_PER_US: f64 = 2.423;

/// Arrival window, in µs from the start of the trace.
pub const ARRIVAL_MIN_US: u64 = 150_000;
pub const ARRIVAL_MAX_US: u64 = 300_000;

/// One synthetic job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimTask {
    pub arrival_us: u64,
    /// Work to complete, in counter increments.
    pub wcet_counter: f64,
    /// Absolute deadline, in µs.
    pub deadline_us: f64,
}

/// Random task of the given density (`wcet / relative deadline`).
///
/// The WCET is drawn as a whole number of ms in `[wcet_min_ms, wcet_max_ms]`.
pub fn generate_task<R: Rng + ?Sized>(
    density: f64,
    wcet_min_ms: u64,
    wcet_max_ms: u64,
    rng: &mut R,
) -> SimTask {
    let arrival_us = rng.gen_range(ARRIVAL_MIN_US..=ARRIVAL_MAX_US);
    let wcet_us = (rng.gen_range(wcet_min_ms..=wcet_max_ms) * 1000) as f64;
    SimTask {
        arrival_us,
        wcet_counter: wcet_us * COUNTER_PER_US,
        deadline_us: arrival_us as f64 + wcet_us / density,
    }
}

/// `true` if the partition traced by `samples` finishes `task` by its deadline.
///
/// The counter at arrival and the completion time are both linearly
/// interpolated between the two bracketing samples.  An arrival outside the
/// trace, a completion beyond its end, or samples that go backwards count as
/// a miss.
pub fn execute_task(task: &SimTask, samples: &[Sample]) -> bool {
    let start = match search_time(samples, task.arrival_us) {
        Some(i) if i > 0 => i,
        _ => {
            warn!(arrival_us = task.arrival_us, "task arrival time is out of bounds");
            return false;
        }
    };

    let (prev, next) = (samples[start - 1], samples[start]);
    let Some((span, progress)) = step(prev, next) else {
        warn!(index = start, "trace samples go backwards");
        return false;
    };
    let start_counter = if span > 0 {
        let behind = next.time_us.saturating_sub(task.arrival_us) as f64 / span as f64;
        (next.counter as f64 - behind * progress as f64).trunc()
    } else {
        next.counter as f64
    };

    let end_counter = start_counter + task.wcet_counter;
    // first sample reaching the target, so never the tail of a plateau
    let Some(end) = search_counter(samples, end_counter) else {
        warn!(end_counter, "task cannot complete within the trace");
        return false;
    };

    let end_time = if end == 0 {
        samples[0].time_us as f64
    } else {
        let (prev, next) = (samples[end - 1], samples[end]);
        let Some((span, progress)) = step(prev, next) else {
            warn!(index = end, "trace samples go backwards");
            return false;
        };
        let ahead = (next.counter as f64 - end_counter) / progress as f64;
        next.time_us as f64 - ahead * span as f64
    };

    trace!(
        arrival_us = task.arrival_us,
        start_counter,
        end_counter,
        end_time,
        deadline_us = task.deadline_us,
        "task replayed"
    );
    end_time <= task.deadline_us
}

/// `(time elapsed, counter progress)` between consecutive samples.
fn step(prev: Sample, next: Sample) -> Option<(u64, u64)> {
    Some((
        next.time_us.checked_sub(prev.time_us)?,
        next.counter.checked_sub(prev.counter)?,
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Partition runs 1 count/µs for the first 100 µs of every 200 µs.
    fn half_duty_trace() -> Vec<Sample> {
        let mut samples = Vec::new();
        let mut counter = 0;
        for window in 0..10u64 {
            let base = window * 200;
            samples.push(Sample { time_us: base, counter });
            counter += 100;
            samples.push(Sample { time_us: base + 100, counter });
        }
        samples.push(Sample { time_us: 2000, counter });
        samples
    }

    fn task(arrival_us: u64, wcet_counter: f64, deadline_us: f64) -> SimTask {
        SimTask {
            arrival_us,
            wcet_counter,
            deadline_us,
        }
    }

    // ── execute_task ──────────────────────────────────────────────────────────

    #[test]
    fn task_inside_one_running_window() {
        // arrive at 10 (counter 10), need 50 → done at 60
        let t = task(10, 50.0, 60.0);
        assert!(execute_task(&t, &half_duty_trace()));
        let late = task(10, 50.0, 59.0);
        assert!(!execute_task(&late, &half_duty_trace()));
    }

    #[test]
    fn task_spanning_an_idle_gap() {
        // arrive at 50 (counter 50), need 100 → counter 150 reached at 250
        assert!(execute_task(&task(50, 100.0, 250.0), &half_duty_trace()));
        assert!(!execute_task(&task(50, 100.0, 249.0), &half_duty_trace()));
    }

    #[test]
    fn completion_on_a_plateau_edge_uses_the_first_sample() {
        // arrive at 1 (counter 1), need 99 → counter 100 is reached at 100,
        // not at 200 where the plateau ends
        assert!(execute_task(&task(1, 99.0, 100.0), &half_duty_trace()));
    }

    #[test]
    fn arrival_out_of_bounds_is_a_miss() {
        let s = half_duty_trace();
        assert!(!execute_task(&task(0, 1.0, 1e9), &s));
        assert!(!execute_task(&task(5000, 1.0, 1e9), &s));
    }

    #[test]
    fn counter_going_backwards_is_a_miss() {
        let s = [
            Sample { time_us: 0, counter: 100 },
            Sample { time_us: 100, counter: 50 },
            Sample { time_us: 200, counter: 200 },
        ];
        assert!(!execute_task(&task(50, 10.0, 1e9), &s));
    }

    #[test]
    fn unreachable_completion_is_a_miss() {
        assert!(!execute_task(&task(10, 10_000.0, 1e9), &half_duty_trace()));
    }

    // ── generate_task ─────────────────────────────────────────────────────────

    #[test]
    fn generated_tasks_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let t = generate_task(0.5, 10, 20, &mut rng);
            assert!((ARRIVAL_MIN_US..=ARRIVAL_MAX_US).contains(&t.arrival_us));
            let wcet_us = t.wcet_counter / COUNTER_PER_US;
            assert!((10_000.0..=20_000.0).contains(&(wcet_us.round())));
            assert!((wcet_us.round() as u64) % 1000 == 0);
            let relative = t.deadline_us - t.arrival_us as f64;
            assert!((relative - wcet_us / 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn same_seed_same_tasks() {
        let a = generate_task(0.3, 1, 50, &mut StdRng::seed_from_u64(42));
        let b = generate_task(0.3, 1, 50, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
