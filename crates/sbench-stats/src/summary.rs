//! Descriptive statistics over a set of trial durations.

use serde::{Deserialize, Serialize};

use crate::histogram::{histogram, Bucket, BucketSpec};
use crate::percentile::{percentile_sorted, Percentile};
use crate::{StatsError, StatsResult};

/// What to derive besides the fixed summary values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSpec {
    pub percentiles: Vec<Percentile>,
    pub buckets: Vec<BucketSpec>,
}

impl Default for StatsSpec {
    fn default() -> Self {
        Self {
            percentiles: vec![Percentile::P50, Percentile::P95, Percentile::P99],
            buckets: BucketSpec::default_latency_ms(),
        }
    }
}

/// One requested percentile and its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    pub percentile: Percentile,
    pub value: f64,
}

/// Read-only snapshot derived from the successful durations of one run.
///
/// All values are in the unit of the input (milliseconds throughout the
/// harness).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (`n - 1` denominator), `0` for one sample.
    pub stdev: f64,
    /// In the order requested by the [`StatsSpec`].
    pub percentiles: Vec<PercentileValue>,
    pub histogram: Vec<Bucket>,
}

impl Statistics {
    /// Looks up a computed percentile by rank.
    pub fn percentile(&self, rank: u8) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|pv| pv.percentile.rank() == rank)
            .map(|pv| pv.value)
    }
}

/// Computes [`Statistics`] for `durations`.
///
/// Fails with [`StatsError::NoSuccessfulSamples`] when `durations` is empty:
/// an all-failed run has no statistics, not zero-valued ones.
pub fn compute(durations: &[f64], spec: &StatsSpec) -> StatsResult<Statistics> {
    if durations.is_empty() {
        return Err(StatsError::NoSuccessfulSamples);
    }

    let mut sorted = durations.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = median_sorted(&sorted);
    let min = sorted[0];
    let max = sorted[n - 1];
    let stdev = sample_stdev(&sorted, mean);

    let percentiles = spec
        .percentiles
        .iter()
        .map(|&percentile| PercentileValue {
            percentile,
            value: percentile_sorted(&sorted, percentile).unwrap_or(min),
        })
        .collect();

    Ok(Statistics {
        count: n,
        mean,
        median,
        min,
        max,
        stdev,
        percentiles,
        histogram: histogram(&sorted, &spec.buckets),
    })
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn sample_stdev(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}
