//! Interpolated percentiles over sorted durations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{StatsError, StatsResult};

/// A requested percentile rank in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Percentile(u8);

impl Percentile {
    pub const P50: Percentile = Percentile(50);
    pub const P95: Percentile = Percentile(95);
    pub const P99: Percentile = Percentile(99);

    /// Creates a percentile, rejecting ranks above 100.
    pub fn new(rank: u32) -> StatsResult<Self> {
        if rank > 100 {
            return Err(StatsError::InvalidPercentile(rank));
        }
        Ok(Self(rank as u8))
    }

    pub fn rank(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for Percentile {
    type Error = StatsError;

    fn try_from(rank: u32) -> StatsResult<Self> {
        Self::new(rank)
    }
}

impl From<Percentile> for u32 {
    fn from(p: Percentile) -> Self {
        p.0 as u32
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Percentile of an ascending-sorted, non-empty slice.
///
/// `index = p/100 * (n-1)` is split into `lower = floor(index)` and a weight
/// `index - lower`; the result interpolates linearly between `sorted[lower]`
/// and `sorted[lower + 1]`. When `lower + 1` falls past the end (p100, or a
/// single sample) the result is `sorted[lower]`.
///
/// Returns `None` for an empty slice.
pub fn percentile_sorted(sorted: &[f64], p: Percentile) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    let index = (p.rank() as f64 / 100.0) * (n - 1) as f64;
    let lower = (index.floor() as usize).min(n - 1);
    let upper = lower + 1;
    if upper >= n {
        return Some(sorted[lower]);
    }
    let weight = index - lower as f64;
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}
