//! Bucketed latency distribution.
//!
//! A bucket layout is an ordered list of half-open intervals `[lower, upper)`
//! where the last interval is `[lower, +inf)`. Layouts built through
//! [`BucketSpec::from_bounds`] always start at zero and are contiguous, so
//! every non-negative duration lands in exactly one bucket.

use serde::{Deserialize, Serialize};

use crate::{StatsError, StatsResult};

/// One interval of a bucket layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub lower: f64,
    /// `None` means unbounded (`+inf`).
    pub upper: Option<f64>,
    pub label: String,
}

impl BucketSpec {
    /// Returns true if `value` falls in `[lower, upper)`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && self.upper.map_or(true, |upper| value < upper)
    }

    /// Default latency layout in milliseconds:
    /// 0-1, 1-2, 2-3, 3-5, 5-10, 10-20, 20-30, 30-50, 50-75, 75-100,
    /// 100-150, 150-200, 200-300, 300-500, 500-1000, 1000+.
    pub fn default_latency_ms() -> Vec<BucketSpec> {
        Self::from_bounds(&DEFAULT_BOUNDS_MS).unwrap_or_default()
    }

    /// Builds a contiguous layout from ascending lower bounds.
    ///
    /// `[0, 1, 5]` becomes `[0,1) [1,5) [5,+inf)`. The first bound must be
    /// zero and bounds must be strictly ascending and finite.
    pub fn from_bounds(bounds: &[f64]) -> StatsResult<Vec<BucketSpec>> {
        let first = bounds
            .first()
            .ok_or_else(|| StatsError::InvalidBuckets("at least one bound is required".into()))?;
        if *first != 0.0 {
            return Err(StatsError::InvalidBuckets(format!(
                "first bound must be 0, got {first}"
            )));
        }
        if let Some(bad) = bounds.iter().find(|b| !b.is_finite()) {
            return Err(StatsError::InvalidBuckets(format!("bound {bad} is not finite")));
        }
        if let Some(pair) = bounds.windows(2).find(|w| w[1] <= w[0]) {
            return Err(StatsError::InvalidBuckets(format!(
                "bounds must be strictly ascending ({} then {})",
                pair[0], pair[1]
            )));
        }

        let specs = bounds
            .iter()
            .enumerate()
            .map(|(i, &lower)| {
                let upper = bounds.get(i + 1).copied();
                BucketSpec {
                    lower,
                    upper,
                    label: bucket_label(lower, upper),
                }
            })
            .collect();
        Ok(specs)
    }
}

/// Lower bounds of the default latency layout.
pub const DEFAULT_BOUNDS_MS: [f64; 16] = [
    0.0, 1.0, 2.0, 3.0, 5.0, 10.0, 20.0, 30.0, 50.0, 75.0, 100.0, 150.0, 200.0, 300.0, 500.0,
    1000.0,
];

/// Human label for a millisecond interval: `< 1ms`, `5-10ms`, `500ms-1s`, `> 1s`.
fn bucket_label(lower: f64, upper: Option<f64>) -> String {
    match upper {
        None => format!("> {}", format_bound(lower)),
        Some(upper) if lower == 0.0 => format!("< {}", format_bound(upper)),
        Some(upper) if upper < 1000.0 => format!("{}-{}ms", trim_float(lower), trim_float(upper)),
        Some(upper) => format!("{}-{}", format_bound(lower), format_bound(upper)),
    }
}

fn format_bound(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{}ms", trim_float(ms))
    } else {
        format!("{}s", trim_float(ms / 1000.0))
    }
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// A bucket with its observed count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub lower: f64,
    pub upper: Option<f64>,
    pub label: String,
    pub count: usize,
    /// Share of all durations, `count / n * 100`.
    pub percentage: f64,
}

/// Counts `durations` into `specs`.
///
/// Each duration is counted in the first bucket that contains it, so a layout
/// with overlapping intervals never double-counts. Durations outside every
/// bucket (negative values, or a layout that does not cover `[0, +inf)`) are
/// not counted.
pub fn histogram(durations: &[f64], specs: &[BucketSpec]) -> Vec<Bucket> {
    let mut counts = vec![0usize; specs.len()];
    for &d in durations {
        if let Some(idx) = specs.iter().position(|spec| spec.contains(d)) {
            counts[idx] += 1;
        }
    }

    let n = durations.len();
    specs
        .iter()
        .zip(counts)
        .map(|(spec, count)| Bucket {
            lower: spec.lower,
            upper: spec.upper,
            label: spec.label.clone(),
            count,
            percentage: if n == 0 {
                0.0
            } else {
                count as f64 / n as f64 * 100.0
            },
        })
        .collect()
}
