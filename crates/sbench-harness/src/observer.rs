//! Progress reporting hooks for long benchmark sessions.

use sbench_common::ScenarioName;
use std::time::Duration;
use tracing::{info, warn};

use crate::sample::ScenarioRun;

/// Snapshot emitted every `progress_interval` completed trials.
#[derive(Debug, Clone)]
pub struct Progress<'a> {
    pub scenario: &'a ScenarioName,
    pub query: &'a str,
    pub completed: usize,
    pub total: usize,
    /// Time since the measured loop started.
    pub elapsed: Duration,
}

impl Progress<'_> {
    /// Completed trials per second so far.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.completed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Receives session events. Every method defaults to doing nothing.
pub trait ProgressObserver: Send + Sync {
    fn on_session_start(&self, _scenario: &ScenarioName, _query: &str, _trials: usize) {}

    fn on_progress(&self, _progress: &Progress<'_>) {}

    /// Called for the first `max_reported_errors` failed trials of a run.
    fn on_error(&self, _scenario: &ScenarioName, _trial_index: usize, _message: &str) {}

    fn on_session_end(&self, _run: &ScenarioRun) {}
}

/// Observer that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Observer that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_session_start(&self, scenario: &ScenarioName, query: &str, trials: usize) {
        info!("Benchmarking {} for query '{}' ({} trials)", scenario, query, trials);
    }

    fn on_progress(&self, progress: &Progress<'_>) {
        info!(
            "{}: {}/{} trials ({:.1} req/s)",
            progress.scenario,
            progress.completed,
            progress.total,
            progress.rate()
        );
    }

    fn on_error(&self, scenario: &ScenarioName, trial_index: usize, message: &str) {
        warn!("{} trial {} failed: {}", scenario, trial_index, message);
    }

    fn on_session_end(&self, run: &ScenarioRun) {
        info!(
            "Finished {} for '{}': {}/{} succeeded in {:.2}s{}",
            run.scenario(),
            run.query(),
            run.success_count(),
            run.samples().len(),
            run.elapsed().as_secs_f64(),
            if run.is_cancelled() { " (cancelled)" } else { "" }
        );
    }
}
