//! Hyperperiod calculation for one processor's partition set.
//!
//! The hyperperiod is the LCM of all partition periods on a processor.  It is
//! the launch-table length in time slices, so it also bounds memory use and
//! the cost of the shift search.
//!
//! | Failure | Result |
//! |---|---|
//! | no partitions / all periods zero | `Err(NoValidPeriods)` |
//! | `(a / gcd) * b` overflows `u64` | `Err(Overflow)` |
//! | table longer than an opted-in limit | `Err(TooLarge)` |

pub mod math;

use tracing::{debug, warn};

use crate::partition::NormalizedPartition;
use math::lcm_of_slice;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur during hyperperiod calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyperperiodError {
    /// The partition slice was empty (or every period was `0`).
    NoValidPeriods,

    /// LCM calculation overflowed `u64`.
    Overflow { a: u64, b: u64 },

    /// The calculated hyperperiod exceeded the configured limit.
    TooLarge { value: u64, limit: u64 },
}

impl std::fmt::Display for HyperperiodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HyperperiodError::NoValidPeriods => {
                write!(f, "no partitions with a valid (non-zero) period")
            }
            HyperperiodError::Overflow { a, b } => {
                write!(f, "LCM overflow computing lcm({a}, {b})")
            }
            HyperperiodError::TooLarge { value, limit } => write!(
                f,
                "hyperperiod of {value} time slices exceeds the limit of {limit}"
            ),
        }
    }
}

impl std::error::Error for HyperperiodError {}

// ── HyperperiodInfo ───────────────────────────────────────────────────────────

/// Calculated hyperperiod for one partition set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperperiodInfo {
    /// Hyperperiod in time slices.
    pub hyperperiod: u64,

    /// Unique periods present in the set (sorted, deduplicated).
    pub unique_periods: Vec<u64>,

    /// Number of partitions that contributed.
    pub partition_count: usize,
}

// ── HyperperiodCalculator ─────────────────────────────────────────────────────

/// Computes hyperperiods, optionally under a table-length limit.
///
/// Unlimited by default: a `1/200000` partition alone needs a `7·2^14`
/// slice table, which is valid input.
///
/// # Example
/// ```rust
/// use rrp_planner::hyperperiod::HyperperiodCalculator;
///
/// let calc = HyperperiodCalculator::new();
/// assert_eq!(calc.hyperperiod(&[7, 3, 4]).unwrap(), 84);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HyperperiodCalculator {
    limit: Option<u64>,
}

impl HyperperiodCalculator {
    /// Create a calculator without a table-length limit.
    pub fn new() -> Self {
        Self { limit: None }
    }

    /// Create a calculator with a limit (in time slices).
    pub fn with_limit(limit: u64) -> Self {
        Self { limit: Some(limit) }
    }

    /// `with_limit` when `limit` is set, [`new`](Self::new) otherwise.
    pub fn with_optional_limit(limit: Option<u64>) -> Self {
        Self { limit }
    }

    /// LCM of `periods`, ignoring zero entries.
    ///
    /// # Errors
    /// * [`HyperperiodError::NoValidPeriods`] – nothing left after filtering.
    /// * [`HyperperiodError::Overflow`] – LCM exceeded `u64`.
    /// * [`HyperperiodError::TooLarge`] – result exceeds the limit, if any.
    pub fn hyperperiod(&self, periods: &[u64]) -> Result<u64, HyperperiodError> {
        let valid: Vec<u64> = periods.iter().copied().filter(|&p| p > 0).collect();
        if valid.is_empty() {
            return Err(HyperperiodError::NoValidPeriods);
        }

        let hyperperiod = lcm_of_slice(&valid)?;
        if let Some(limit) = self.limit.filter(|&l| hyperperiod > l) {
            warn!(hyperperiod, limit, "Hyperperiod exceeds configured limit");
            return Err(HyperperiodError::TooLarge {
                value: hyperperiod,
                limit,
            });
        }
        Ok(hyperperiod)
    }

    /// Hyperperiod of a normalized partition set, with the period summary.
    pub fn calculate(
        &self,
        partitions: &[NormalizedPartition],
    ) -> Result<HyperperiodInfo, HyperperiodError> {
        let periods: Vec<u64> = partitions.iter().map(|p| p.period).collect();
        let hyperperiod = self.hyperperiod(&periods)?;

        let mut unique_periods = periods;
        unique_periods.sort_unstable();
        unique_periods.dedup();

        debug!(
            hyperperiod,
            partition_count = partitions.len(),
            unique_periods = ?unique_periods,
            "Calculated hyperperiod"
        );

        Ok(HyperperiodInfo {
            hyperperiod,
            unique_periods,
            partition_count: partitions.len(),
        })
    }
}

impl Default for HyperperiodCalculator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
