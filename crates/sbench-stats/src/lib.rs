//! # sbench stats
//!
//! The statistics engine of the benchmark harness.
//!
//! Given the durations of the successful trials of one run, [`compute`]
//! derives a read-only [`Statistics`] snapshot: mean, median, min, max,
//! sample standard deviation, interpolated percentiles and a bucketed latency
//! histogram. The percentile set and the bucket layout are inputs
//! ([`StatsSpec`]) so the engine carries no presentation defaults of its own
//! beyond [`BucketSpec::default_latency_ms`].
//!
//! ```
//! use sbench_stats::{compute, StatsSpec};
//!
//! let stats = compute(&[1.0, 2.0, 3.0, 4.0], &StatsSpec::default()).unwrap();
//! assert_eq!(stats.median, 2.5);
//! assert_eq!(stats.percentile(50), Some(2.5));
//! ```

pub mod histogram;
pub mod percentile;
pub mod summary;

use thiserror::Error;

pub use histogram::{histogram, Bucket, BucketSpec};
pub use percentile::{percentile_sorted, Percentile};
pub use summary::{compute, PercentileValue, Statistics, StatsSpec};

/// Statistics engine errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Statistics are undefined for an empty duration set.
    #[error("no successful samples")]
    NoSuccessfulSamples,

    #[error("percentile out of range: {0} (expected 0..=100)")]
    InvalidPercentile(u32),

    #[error("invalid histogram buckets: {0}")]
    InvalidBuckets(String),
}

/// Result type for statistics operations.
pub type StatsResult<T> = Result<T, StatsError>;
