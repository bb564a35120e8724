//! # sbench harness
//!
//! Measurement core of the sandbox benchmark.
//!
//! Data flows leaves-first:
//!
//! 1. [`trial::run_trial`] times one call of a [`Scenario`]'s [`Operation`]
//!    and records the outcome as a [`Sample`], never an error.
//! 2. [`BenchmarkSession`] runs a warmup trial plus N sequential measured
//!    trials into a [`ScenarioRun`], reporting progress to a
//!    [`ProgressObserver`] and honouring cancellation between trials.
//! 3. [`suite::run_plan`] walks every query and scenario of a
//!    [`BenchmarkPlan`].
//! 4. [`MeasuredRun`] attaches statistics (or an explicit "no data") and
//!    [`compare`] / [`summarize`] derive speedup ratios against the baseline.

pub mod compare;
pub mod observer;
pub mod sample;
pub mod scenario;
pub mod session;
pub mod suite;
pub mod trial;

pub use compare::{
    compare, group_by_scenario, summarize, ComparisonRow, ComparisonSummary, ScenarioDuration,
    ScenarioResults, Speedup, SpeedupEntry,
};
pub use observer::{NoopObserver, Progress, ProgressObserver, TracingObserver};
pub use sample::{MeasuredRun, Sample, ScenarioRun};
pub use scenario::{Operation, OperationOutput, Scenario};
pub use session::{BenchmarkSession, SessionOptions};
pub use suite::{run_plan, BenchmarkPlan, SuiteOutcome};
pub use trial::run_trial;

pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
pub(crate) mod testing;
