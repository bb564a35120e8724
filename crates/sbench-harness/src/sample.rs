//! Trial outcomes and the per-scenario run that accumulates them.

use sbench_common::{Error, Result, ScenarioName};
use sbench_stats::{compute, Statistics, StatsError, StatsSpec};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub trial_index: usize,
    /// Elapsed wall-clock time, populated for failures too.
    pub duration_ms: f64,
    pub succeeded: bool,
    pub result_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Sample {
    pub fn success(trial_index: usize, duration_ms: f64, result_count: u64) -> Self {
        Self {
            trial_index,
            duration_ms,
            succeeded: true,
            result_count,
            error: None,
        }
    }

    pub fn failure(trial_index: usize, duration_ms: f64, error: impl Into<String>) -> Self {
        Self {
            trial_index,
            duration_ms,
            succeeded: false,
            result_count: 0,
            error: Some(error.into()),
        }
    }
}

/// The samples one scenario produced for one query.
///
/// Samples are append-only and kept in trial order. The warmup sample is
/// held apart and never contributes to statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRun {
    scenario: ScenarioName,
    query: String,
    requested_trials: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    warmup: Option<Sample>,
    samples: Vec<Sample>,
    elapsed_ms: f64,
    cancelled: bool,
}

/// Upper bound on the sample buffer reserved up front; larger runs grow it.
const MAX_RESERVED_SAMPLES: usize = 10_000;

impl ScenarioRun {
    pub fn new(scenario: ScenarioName, query: impl Into<String>, requested_trials: usize) -> Self {
        Self {
            scenario,
            query: query.into(),
            requested_trials,
            warmup: None,
            samples: Vec::with_capacity(requested_trials.min(MAX_RESERVED_SAMPLES)),
            elapsed_ms: 0.0,
            cancelled: false,
        }
    }

    /// Appends a measured sample.
    pub fn record(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn set_warmup(&mut self, sample: Sample) {
        self.warmup = Some(sample);
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn scenario(&self) -> &ScenarioName {
        &self.scenario
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn requested_trials(&self) -> usize {
        self.requested_trials
    }

    pub fn warmup(&self) -> Option<&Sample> {
        self.warmup.as_ref()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Wall-clock time of the measured loop (warmup excluded).
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_ms.max(0.0) / 1000.0)
    }

    /// True when the run stopped early because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn success_count(&self) -> usize {
        self.samples.iter().filter(|s| s.succeeded).count()
    }

    pub fn failure_count(&self) -> usize {
        self.samples.len() - self.success_count()
    }

    /// Durations of the successful samples, in trial order.
    pub fn successful_durations(&self) -> Vec<f64> {
        self.samples
            .iter()
            .filter(|s| s.succeeded)
            .map(|s| s.duration_ms)
            .collect()
    }

    /// Successful requests per second over the measured loop.
    pub fn throughput_rps(&self) -> f64 {
        self.per_second(self.success_count())
    }

    /// Requests per second over the measured loop, failed ones included.
    pub fn attempt_rate_rps(&self) -> f64 {
        self.per_second(self.samples.len())
    }

    fn per_second(&self, count: usize) -> f64 {
        let secs = self.elapsed_ms / 1000.0;
        if secs > 0.0 {
            count as f64 / secs
        } else {
            0.0
        }
    }

    /// Percentage of recorded trials that succeeded.
    pub fn success_rate_pct(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.success_count() as f64 / self.samples.len() as f64 * 100.0
    }

    /// Statistics over the successful durations.
    ///
    /// Fails with [`Error::NoSuccessfulSamples`] when every trial failed.
    pub fn statistics(&self, spec: &StatsSpec) -> Result<Statistics> {
        compute(&self.successful_durations(), spec).map_err(|e| match e {
            StatsError::NoSuccessfulSamples => {
                Error::no_successful_samples(self.scenario.clone(), self.query.clone())
            }
            other => Error::validation(other.to_string()),
        })
    }
}

/// A finished run paired with its statistics.
///
/// `statistics` is `None` when the run has no successful samples; such a run
/// still reports its `0/N` success count but is excluded from percentile,
/// histogram and speedup output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasuredRun {
    pub run: ScenarioRun,
    pub statistics: Option<Statistics>,
}

impl MeasuredRun {
    pub fn measure(run: ScenarioRun, spec: &StatsSpec) -> Result<Self> {
        let statistics = match run.statistics(spec) {
            Ok(stats) => Some(stats),
            Err(Error::NoSuccessfulSamples { .. }) => None,
            Err(e) => return Err(e),
        };
        Ok(Self { run, statistics })
    }

    pub fn has_data(&self) -> bool {
        self.statistics.is_some()
    }

    /// Representative duration used for comparisons: the mean over the
    /// successful trials.
    pub fn representative_ms(&self) -> Option<f64> {
        self.statistics.as_ref().map(|s| s.mean)
    }
}
