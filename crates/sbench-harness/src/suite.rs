//! A full benchmark plan: every scenario against every query.

use chrono::{DateTime, Utc};
use sbench_common::{Error, Result, ScenarioName};
use sbench_stats::StatsSpec;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::sample::{MeasuredRun, ScenarioRun};
use crate::scenario::Scenario;
use crate::session::BenchmarkSession;

/// What to run.
#[derive(Debug, Clone)]
pub struct BenchmarkPlan {
    pub scenarios: Vec<Scenario>,
    pub queries: Vec<String>,
    pub trials: usize,
    pub warmup: bool,
    pub baseline: ScenarioName,
}

impl BenchmarkPlan {
    pub fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            return Err(Error::validation("at least one scenario is required"));
        }
        if self.queries.is_empty() {
            return Err(Error::validation("at least one query is required"));
        }
        if self.trials == 0 {
            return Err(Error::validation("trial count must be greater than 0"));
        }

        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if !seen.insert(scenario.name()) {
                return Err(Error::validation(format!(
                    "duplicate scenario name: {}",
                    scenario.name()
                )));
            }
        }
        if !seen.contains(&self.baseline) {
            return Err(Error::UnknownScenario(self.baseline.clone()));
        }
        Ok(())
    }
}

/// Raw results of a plan.
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub started_at: DateTime<Utc>,
    /// In execution order: query-major, scenario order within a query.
    pub runs: Vec<ScenarioRun>,
    /// True when the operator interrupted the plan.
    pub cancelled: bool,
}

impl SuiteOutcome {
    /// Attaches statistics to every run.
    pub fn measure(&self, spec: &StatsSpec) -> Result<Vec<MeasuredRun>> {
        self.runs
            .iter()
            .cloned()
            .map(|run| MeasuredRun::measure(run, spec))
            .collect()
    }
}

/// Runs every scenario of `plan` for every query, strictly sequentially.
///
/// Stops at the first fatal error. On cancellation the runs completed so far
/// are returned, together with the interrupted run if it recorded anything.
pub async fn run_plan(
    plan: &BenchmarkPlan,
    session: &BenchmarkSession<'_>,
) -> Result<SuiteOutcome> {
    plan.validate()?;

    let started_at = Utc::now();
    let mut runs = Vec::with_capacity(plan.queries.len() * plan.scenarios.len());
    let mut cancelled = false;

    'queries: for query in &plan.queries {
        info!("Query '{}'", query);
        for scenario in &plan.scenarios {
            let run = session
                .run(scenario, query, plan.trials, plan.warmup)
                .await?;

            let interrupted = run.is_cancelled();
            if !run.samples().is_empty() {
                runs.push(run);
            }
            if interrupted {
                warn!("Benchmark interrupted, keeping {} partial runs", runs.len());
                cancelled = true;
                break 'queries;
            }
        }
    }

    Ok(SuiteOutcome {
        started_at,
        runs,
        cancelled,
    })
}
