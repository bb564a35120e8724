//! Benchmark session: one warmup trial plus N measured trials for a scenario.

use sbench_common::{Error, Result};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::observer::{Progress, ProgressObserver};
use crate::sample::ScenarioRun;
use crate::scenario::Scenario;
use crate::trial::run_trial;

/// Tuning knobs for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Emit `on_progress` every this many completed trials. Must be > 0.
    pub progress_interval: usize,
    /// How many failed trials per run are passed to `on_error`.
    pub max_reported_errors: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            progress_interval: 100,
            max_reported_errors: 5,
        }
    }
}

/// Runs scenarios sequentially, one trial at a time.
///
/// The session owns the sample sequence of the run in progress. Cancellation
/// is checked before every trial; an in-flight trial always completes and is
/// recorded.
pub struct BenchmarkSession<'a> {
    options: SessionOptions,
    observer: &'a dyn ProgressObserver,
    cancel: CancellationToken,
}

impl<'a> BenchmarkSession<'a> {
    pub fn new(
        options: SessionOptions,
        observer: &'a dyn ProgressObserver,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            options,
            observer,
            cancel,
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Benchmarks `scenario` for `query`.
    ///
    /// A failed warmup aborts with [`Error::WarmupFailed`]. Failed measured
    /// trials are recorded and the loop continues. On cancellation the
    /// samples recorded so far are returned in a run marked cancelled.
    pub async fn run(
        &self,
        scenario: &Scenario,
        query: &str,
        trial_count: usize,
        warmup: bool,
    ) -> Result<ScenarioRun> {
        let mut run = ScenarioRun::new(scenario.name().clone(), query, trial_count);

        if self.cancel.is_cancelled() {
            run.mark_cancelled();
            return Ok(run);
        }

        if warmup {
            let sample = run_trial(scenario, query, 0).await;
            if !sample.succeeded {
                let reason = sample.error.clone().unwrap_or_default();
                return Err(Error::warmup_failed(scenario.name().clone(), query, reason));
            }
            debug!(
                "Warmup for {} completed in {:.3}ms",
                scenario.name(),
                sample.duration_ms
            );
            run.set_warmup(sample);
        }

        self.observer
            .on_session_start(scenario.name(), query, trial_count);

        let interval = self.options.progress_interval.max(1);
        let mut reported_errors = 0usize;
        let start = Instant::now();

        for trial_index in 0..trial_count {
            if self.cancel.is_cancelled() {
                info!(
                    "Cancelled {} after {}/{} trials",
                    scenario.name(),
                    trial_index,
                    trial_count
                );
                run.mark_cancelled();
                break;
            }

            let sample = run_trial(scenario, query, trial_index).await;
            if !sample.succeeded && reported_errors < self.options.max_reported_errors {
                reported_errors += 1;
                self.observer.on_error(
                    scenario.name(),
                    trial_index,
                    sample.error.as_deref().unwrap_or_default(),
                );
            }
            run.record(sample);

            let completed = trial_index + 1;
            if completed % interval == 0 {
                self.observer.on_progress(&Progress {
                    scenario: scenario.name(),
                    query,
                    completed,
                    total: trial_count,
                    elapsed: start.elapsed(),
                });
            }
        }

        run.set_elapsed(start.elapsed());
        self.observer.on_session_end(&run);
        Ok(run)
    }
}
