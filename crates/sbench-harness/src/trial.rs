//! Single-trial execution.

use tokio::time::Instant;
use tracing::trace;

use crate::sample::Sample;
use crate::scenario::Scenario;

/// Executes one call of `scenario` for `query` and times it.
///
/// Never fails: an operation error becomes a failed [`Sample`] carrying the
/// error text and the time spent before the failure surfaced.
pub async fn run_trial(scenario: &Scenario, query: &str, trial_index: usize) -> Sample {
    let start = Instant::now();
    let outcome = scenario.operation().execute(query).await;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    match outcome {
        Ok(output) => {
            trace!(
                "Trial {} of {} succeeded in {:.3}ms ({} results)",
                trial_index,
                scenario.name(),
                duration_ms,
                output.result_count
            );
            Sample::success(trial_index, duration_ms, output.result_count)
        }
        Err(e) => {
            trace!("Trial {} of {} failed: {}", trial_index, scenario.name(), e);
            Sample::failure(trial_index, duration_ms, e.to_string())
        }
    }
}
