//! Benchmark report: the serializable result document and its text rendering.

use chrono::{DateTime, Utc};
use sbench_common::ScenarioName;
use sbench_harness::{ComparisonRow, ComparisonSummary, MeasuredRun, Speedup};
use sbench_sandbox::models::SearchMatch;
use sbench_sandbox::BenchConfig;
use sbench_stats::Statistics;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub scenario: ScenarioName,
    pub query: String,
    pub trials_requested: usize,
    pub successes: usize,
    pub failures: usize,
    pub success_rate_pct: f64,
    pub elapsed_ms: f64,
    /// Successful requests per second.
    pub throughput_rps: f64,
    /// All requests per second, failed ones included.
    pub attempt_rate_rps: f64,
    pub cancelled: bool,
    /// `None` when no trial succeeded.
    pub statistics: Option<Statistics>,
}

impl RunReport {
    pub fn from_measured(measured: &MeasuredRun) -> Self {
        let run = &measured.run;
        Self {
            scenario: run.scenario().clone(),
            query: run.query().to_string(),
            trials_requested: run.requested_trials(),
            successes: run.success_count(),
            failures: run.failure_count(),
            success_rate_pct: run.success_rate_pct(),
            elapsed_ms: run.elapsed().as_secs_f64() * 1000.0,
            throughput_rps: run.throughput_rps(),
            attempt_rate_rps: run.attempt_rate_rps(),
            cancelled: run.is_cancelled(),
            statistics: measured.statistics.clone(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.statistics.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopMatches {
    pub scenario: ScenarioName,
    pub query: String,
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub started_at: DateTime<Utc>,
    pub cancelled: bool,
    pub config: BenchConfig,
    pub runs: Vec<RunReport>,
    pub comparison: Vec<ComparisonRow>,
    pub summary: ComparisonSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_matches: Vec<TopMatches>,
}

impl BenchReport {
    /// True when at least one run finished without a single success.
    pub fn has_empty_runs(&self) -> bool {
        self.runs.iter().any(|r| !r.has_data())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        header(&mut out, "Benchmark Results");
        let _ = writeln!(
            out,
            "Started {}  target {}  trials {}{}",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.config.target.path,
            self.config.run.trials,
            if self.cancelled { "  (interrupted, partial results)" } else { "" }
        );

        for run in &self.runs {
            let _ = writeln!(out);
            render_run(&mut out, run);
        }

        for group in &self.top_matches {
            if group.matches.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\nTop {} matches for '{}':", group.scenario, group.query);
            for m in &group.matches {
                let _ = writeln!(out, "  [score: {}] {}", m.score, m.basename());
            }
        }

        if !self.comparison.is_empty() {
            header(&mut out, "Performance Summary");
            render_comparison(&mut out, &self.comparison);
            render_summary(&mut out, &self.summary);
        }

        out
    }
}

fn header(out: &mut String, title: &str) {
    let rule = "=".repeat(60);
    let _ = writeln!(out, "\n{}\n{}\n{}", rule, title, rule);
}

fn render_run(out: &mut String, run: &RunReport) {
    let _ = writeln!(
        out,
        "{} / '{}': {}/{} succeeded ({:.1}%){}",
        run.scenario,
        run.query,
        run.successes,
        run.successes + run.failures,
        run.success_rate_pct,
        if run.cancelled { " [cancelled]" } else { "" }
    );

    let Some(stats) = &run.statistics else {
        let _ = writeln!(out, "  no data");
        return;
    };

    let _ = writeln!(
        out,
        "  throughput {:.1} successful req/s ({:.1} req/s attempted) over {}",
        run.throughput_rps,
        run.attempt_rate_rps,
        format_time(run.elapsed_ms)
    );
    let _ = writeln!(
        out,
        "  mean {}  median {}  min {}  max {}  stdev {}",
        format_time(stats.mean),
        format_time(stats.median),
        format_time(stats.min),
        format_time(stats.max),
        format_time(stats.stdev)
    );
    let percentiles: Vec<String> = stats
        .percentiles
        .iter()
        .map(|pv| format!("{} {}", pv.percentile, format_time(pv.value)))
        .collect();
    if !percentiles.is_empty() {
        let _ = writeln!(out, "  {}", percentiles.join("  "));
    }

    for bucket in stats.histogram.iter().filter(|b| b.count > 0) {
        let _ = writeln!(
            out,
            "  {:>10} {:>7} {:>6.2}% {}",
            bucket.label,
            bucket.count,
            bucket.percentage,
            histogram_bar(bucket.percentage)
        );
    }
}

fn render_comparison(out: &mut String, rows: &[ComparisonRow]) {
    let Some(first) = rows.first() else {
        return;
    };
    let columns: Vec<&ScenarioName> = first.durations.iter().map(|d| &d.scenario).collect();

    let mut line = format!("{:<12}", "Query");
    for name in &columns {
        let _ = write!(line, " | {:<14}", name.as_str());
    }
    let _ = writeln!(out, "{}", line);
    let _ = writeln!(out, "{}", "-".repeat(line.len()));

    for row in rows {
        let mut line = format!("{:<12}", row.query);
        for name in &columns {
            let cell = row
                .duration(name.as_str())
                .map(format_time)
                .unwrap_or_else(|| "no data".to_string());
            let _ = write!(line, " | {:<14}", cell);
        }
        let _ = writeln!(out, "{}", line);
        for entry in &row.speedups {
            let _ = writeln!(
                out,
                "{:<12}   {} vs {}: {}",
                "",
                entry.candidate,
                entry.baseline,
                speedup_phrase(entry.ratio)
            );
        }
    }
}

fn render_summary(out: &mut String, summary: &ComparisonSummary) {
    let _ = writeln!(out, "\nAverage times:");
    for avg in &summary.averages {
        let _ = writeln!(
            out,
            "  {:<20} {}",
            avg.scenario.as_str(),
            avg.duration_ms
                .map(format_time)
                .unwrap_or_else(|| "no data".to_string())
        );
    }
    if !summary.speedups.is_empty() {
        let _ = writeln!(out, "\nAverage speedups:");
        for entry in &summary.speedups {
            let _ = writeln!(
                out,
                "  {} vs {}: {}",
                entry.candidate,
                entry.baseline,
                speedup_phrase(entry.ratio)
            );
        }
    }
}

fn speedup_phrase(speedup: Speedup) -> String {
    match speedup {
        Speedup::Defined(r) if r >= 1.0 => format!("{:.2}x faster", r),
        Speedup::Defined(r) if r > 0.0 => format!("{:.2}x slower", 1.0 / r),
        Speedup::Defined(r) => format!("{:.2}x", r),
        Speedup::Undefined => "n/a".to_string(),
    }
}

/// `12.34ms` below one second, `1.23s` above.
pub fn format_time(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.2}ms", ms)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

/// One block per 2%.
pub fn histogram_bar(percentage: f64) -> String {
    "█".repeat((percentage / 2.0).max(0.0) as usize)
}
