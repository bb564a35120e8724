//! Cross-scenario comparison: per-query rows and the averaged summary.

use sbench_common::ScenarioName;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sample::MeasuredRun;

/// A speedup ratio, or the explicit marker that it cannot be computed.
///
/// Serializes as a bare number or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Speedup {
    Defined(f64),
    Undefined,
}

impl Speedup {
    /// `baseline / candidate`. Values above 1 mean the candidate is faster.
    pub fn of(baseline_ms: f64, candidate_ms: f64) -> Self {
        if candidate_ms == 0.0 || !candidate_ms.is_finite() || !baseline_ms.is_finite() {
            return Self::Undefined;
        }
        Self::Defined(baseline_ms / candidate_ms)
    }

    /// Like [`Speedup::of`], undefined when either side has no data.
    pub fn between(baseline_ms: Option<f64>, candidate_ms: Option<f64>) -> Self {
        match (baseline_ms, candidate_ms) {
            (Some(b), Some(c)) => Self::of(b, c),
            _ => Self::Undefined,
        }
    }

    pub fn ratio(&self) -> Option<f64> {
        match self {
            Self::Defined(r) => Some(*r),
            Self::Undefined => None,
        }
    }
}

impl fmt::Display for Speedup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(r) => write!(f, "{:.2}x", r),
            Self::Undefined => write!(f, "n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDuration {
    pub scenario: ScenarioName,
    /// `None` when the scenario has no successful samples for this row.
    pub duration_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedupEntry {
    pub baseline: ScenarioName,
    pub candidate: ScenarioName,
    pub ratio: Speedup,
}

/// One query's comparison across scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub query: String,
    /// Baseline first, then candidates in the order given.
    pub durations: Vec<ScenarioDuration>,
    pub speedups: Vec<SpeedupEntry>,
}

impl ComparisonRow {
    pub fn duration(&self, scenario: &str) -> Option<f64> {
        self.durations
            .iter()
            .find(|d| d.scenario.as_str() == scenario)
            .and_then(|d| d.duration_ms)
    }

    pub fn speedup(&self, candidate: &str) -> Speedup {
        self.speedups
            .iter()
            .find(|s| s.candidate.as_str() == candidate)
            .map(|s| s.ratio)
            .unwrap_or(Speedup::Undefined)
    }
}

/// Cross-query averages and the speedups derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub averages: Vec<ScenarioDuration>,
    pub speedups: Vec<SpeedupEntry>,
}

impl ComparisonSummary {
    pub fn average(&self, scenario: &str) -> Option<f64> {
        self.averages
            .iter()
            .find(|d| d.scenario.as_str() == scenario)
            .and_then(|d| d.duration_ms)
    }

    pub fn speedup(&self, candidate: &str) -> Speedup {
        self.speedups
            .iter()
            .find(|s| s.candidate.as_str() == candidate)
            .map(|s| s.ratio)
            .unwrap_or(Speedup::Undefined)
    }
}

/// All measured runs of one scenario, one per query.
#[derive(Debug, Clone)]
pub struct ScenarioResults {
    pub scenario: ScenarioName,
    pub runs: Vec<MeasuredRun>,
}

impl ScenarioResults {
    pub fn new(scenario: ScenarioName) -> Self {
        Self {
            scenario,
            runs: Vec::new(),
        }
    }

    /// Representative duration for `query`, if the scenario has data for it.
    pub fn duration_for(&self, query: &str) -> Option<f64> {
        self.runs
            .iter()
            .find(|m| m.run.query() == query)
            .and_then(MeasuredRun::representative_ms)
    }

    /// Unweighted mean of the per-query durations that have data.
    pub fn average_ms(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .runs
            .iter()
            .filter_map(MeasuredRun::representative_ms)
            .collect();
        mean(&values)
    }
}

/// Groups measured runs by scenario, following `order`.
///
/// Scenarios in `order` with no runs still get an (empty) entry; runs of
/// scenarios missing from `order` are dropped.
pub fn group_by_scenario(
    runs: Vec<MeasuredRun>,
    order: &[ScenarioName],
) -> Vec<ScenarioResults> {
    let mut groups: Vec<ScenarioResults> =
        order.iter().cloned().map(ScenarioResults::new).collect();
    for measured in runs {
        if let Some(group) = groups
            .iter_mut()
            .find(|g| &g.scenario == measured.run.scenario())
        {
            group.runs.push(measured);
        }
    }
    groups
}

/// Builds one row per distinct query, in first-seen order (baseline queries
/// first). A candidate that is the baseline itself is skipped.
pub fn compare(
    baseline: &ScenarioResults,
    candidates: &[ScenarioResults],
) -> Vec<ComparisonRow> {
    let candidates: Vec<&ScenarioResults> = candidates
        .iter()
        .filter(|c| c.scenario != baseline.scenario)
        .collect();

    let mut queries: Vec<&str> = Vec::new();
    for results in std::iter::once(baseline).chain(candidates.iter().copied()) {
        for measured in &results.runs {
            if !queries.contains(&measured.run.query()) {
                queries.push(measured.run.query());
            }
        }
    }

    queries
        .into_iter()
        .map(|query| {
            let base = baseline.duration_for(query);
            let mut durations = vec![ScenarioDuration {
                scenario: baseline.scenario.clone(),
                duration_ms: base,
            }];
            let mut speedups = Vec::with_capacity(candidates.len());
            for candidate in &candidates {
                let value = candidate.duration_for(query);
                durations.push(ScenarioDuration {
                    scenario: candidate.scenario.clone(),
                    duration_ms: value,
                });
                speedups.push(SpeedupEntry {
                    baseline: baseline.scenario.clone(),
                    candidate: candidate.scenario.clone(),
                    ratio: Speedup::between(base, value),
                });
            }
            ComparisonRow {
                query: query.to_string(),
                durations,
                speedups,
            }
        })
        .collect()
}

/// Averages each scenario's durations across the rows and derives speedups
/// from the averaged durations (not from the per-row ratios).
///
/// `averages` cover every query a scenario has data for. Each speedup only
/// averages the queries where both the baseline and the candidate have data.
pub fn summarize(baseline: &ScenarioName, rows: &[ComparisonRow]) -> ComparisonSummary {
    let mut scenarios: Vec<&ScenarioName> = Vec::new();
    for row in rows {
        for d in &row.durations {
            if !scenarios.contains(&&d.scenario) {
                scenarios.push(&d.scenario);
            }
        }
    }

    let averages: Vec<ScenarioDuration> = scenarios
        .iter()
        .map(|&scenario| {
            let values: Vec<f64> = rows
                .iter()
                .filter_map(|row| row.duration(scenario.as_str()))
                .collect();
            ScenarioDuration {
                scenario: scenario.clone(),
                duration_ms: mean(&values),
            }
        })
        .collect();

    let speedups = scenarios
        .iter()
        .filter(|&&s| s != baseline)
        .map(|&candidate| SpeedupEntry {
            baseline: baseline.clone(),
            candidate: candidate.clone(),
            ratio: paired_speedup(baseline, candidate, rows),
        })
        .collect();

    ComparisonSummary { averages, speedups }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn paired_speedup(
    baseline: &ScenarioName,
    candidate: &ScenarioName,
    rows: &[ComparisonRow],
) -> Speedup {
    let (base, cand): (Vec<f64>, Vec<f64>) = rows
        .iter()
        .filter_map(|row| {
            let b = row.duration(baseline.as_str())?;
            let c = row.duration(candidate.as_str())?;
            Some((b, c))
        })
        .unzip();
    Speedup::between(mean(&base), mean(&cand))
}
