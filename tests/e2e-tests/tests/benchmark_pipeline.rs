//! Full benchmark pipeline against the mock sandbox: config, scenarios,
//! session, statistics and comparison.

use e2e_tests::assertions::{assert_percentiles_ordered, assert_run_counts};
use e2e_tests::fixtures::{path_str, project_tree};
use e2e_tests::{FailureMode, MockOptions, MockSandbox};
use sbench_common::{Error, ScenarioName};
use sbench_harness::{
    compare, group_by_scenario, run_plan, summarize, BenchmarkSession, CancellationToken,
    MeasuredRun, NoopObserver, Progress, ProgressObserver, Speedup, SuiteOutcome,
};
use sbench_sandbox::{build_scenarios, check_target, BenchConfig, SandboxClient};
use std::sync::Arc;

fn config(base_url: &str, path: &str, trials: usize, warmup: bool) -> BenchConfig {
    let yaml = format!(
        r#"
target:
  base_url: {base_url}
  path: '{path}'
  request_timeout: 5s
run:
  trials: {trials}
  warmup: {warmup}
  progress_interval: 4
queries: [router, app]
baseline: find-process
scenarios:
  - name: find-process
    kind: process
    command: 'find {{path}} -type f -iname "*{{query}}*"'
  - name: fuzzy-api
    kind: fuzzy_search
  - name: content-api
    kind: content_search
  - name: list-api
    kind: list_directory
"#
    );
    BenchConfig::load_from_string(&yaml).unwrap()
}

async fn execute(
    config: &BenchConfig,
    observer: &dyn ProgressObserver,
    cancel: CancellationToken,
) -> sbench_common::Result<SuiteOutcome> {
    check_target(config).await?;
    let client = Arc::new(SandboxClient::new(
        config.target.base_url.clone(),
        config.target.request_timeout,
    ));
    let set = build_scenarios(config, client);
    let plan = config.plan(set.scenarios);
    let session = BenchmarkSession::new(config.session_options(), observer, cancel);
    run_plan(&plan, &session).await
}

fn find<'a>(runs: &'a [MeasuredRun], scenario: &str, query: &str) -> &'a MeasuredRun {
    runs.iter()
        .find(|m| m.run.scenario().as_str() == scenario && m.run.query() == query)
        .unwrap_or_else(|| panic!("no run for {scenario}/{query}"))
}

#[tokio::test]
async fn full_suite_measures_and_compares() {
    let tree = project_tree().unwrap();
    let mock = MockSandbox::start(MockOptions {
        process_stdout: "one\ntwo\n".to_string(),
        fuzzy_failure: FailureMode::EveryNth(4, 500),
        ..Default::default()
    })
    .await
    .unwrap();
    let config = config(&mock.base_url(), &path_str(&tree), 8, true);

    let outcome = execute(&config, &NoopObserver, CancellationToken::new())
        .await
        .unwrap();
    assert!(!outcome.cancelled);
    assert_eq!(outcome.runs.len(), 8);
    // query-major: every scenario for "router" before any for "app"
    assert!(outcome.runs[..4].iter().all(|r| r.query() == "router"));

    // one warmup plus eight trials per run
    assert_eq!(mock.calls("process"), 18);
    assert_eq!(mock.calls("logs"), 18);
    assert_eq!(mock.calls("list"), 18);

    let measured = outcome.measure(&config.stats_spec().unwrap()).unwrap();

    // fuzzy calls 4, 8, 12 and 16 fail; 1 and 10 are warmups
    let fuzzy = find(&measured, "fuzzy-api", "router");
    assert_run_counts(&serde_json::to_value(fuzzy).unwrap(), 6, 8).unwrap();
    assert_eq!(fuzzy.run.failure_count(), 2);
    assert!(fuzzy.run.samples().iter().filter(|s| !s.succeeded).all(|s| {
        s.error.as_deref().map_or(false, |e| e.starts_with("HTTP 500"))
    }));

    let content = find(&measured, "content-api", "router");
    assert_run_counts(&serde_json::to_value(content).unwrap(), 8, 8).unwrap();
    assert!(content.run.samples().iter().all(|s| s.result_count == 2));

    let process = find(&measured, "find-process", "app");
    assert!(process.run.samples().iter().all(|s| s.result_count == 2));

    for m in &measured {
        let stats = m.statistics.as_ref().unwrap();
        assert_percentiles_ordered(&serde_json::to_value(stats).unwrap()).unwrap();
        assert_eq!(stats.count, m.run.success_count());
    }

    let order: Vec<ScenarioName> = config
        .scenarios
        .iter()
        .map(|s| ScenarioName::from(s.name.as_str()))
        .collect();
    let groups = group_by_scenario(measured, &order);
    assert_eq!(groups.len(), 4);
    let rows = compare(&groups[0], &groups);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].query, "router");
    // baseline compared against the three others only
    assert_eq!(rows[0].speedups.len(), 3);
    assert!(matches!(rows[0].speedup("fuzzy-api"), Speedup::Defined(r) if r > 0.0));

    let summary = summarize(&groups[0].scenario, &rows);
    assert!(summary.average("find-process").is_some());
    assert!(matches!(summary.speedup("list-api"), Speedup::Defined(_)));
}

#[tokio::test]
async fn failed_warmup_aborts_the_suite() {
    let tree = project_tree().unwrap();
    let mock = MockSandbox::start(MockOptions {
        content_failure: FailureMode::Always(500),
        ..Default::default()
    })
    .await
    .unwrap();
    let config = config(&mock.base_url(), &path_str(&tree), 3, true);

    let err = execute(&config, &NoopObserver, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.is_precondition());
    match err {
        Error::WarmupFailed { scenario, query, .. } => {
            assert_eq!(scenario.as_str(), "content-api");
            assert_eq!(query, "router");
        }
        other => panic!("unexpected error: {other}"),
    }
    // nothing after the failing warmup runs
    assert_eq!(mock.calls("content"), 1);
    assert_eq!(mock.calls("list"), 0);
}

#[tokio::test]
async fn all_failed_run_has_no_data_and_undefined_speedup() {
    let tree = project_tree().unwrap();
    let mock = MockSandbox::start(MockOptions {
        content_failure: FailureMode::Always(502),
        ..Default::default()
    })
    .await
    .unwrap();
    let config = config(&mock.base_url(), &path_str(&tree), 4, false);

    let outcome = execute(&config, &NoopObserver, CancellationToken::new())
        .await
        .unwrap();
    let measured = outcome.measure(&config.stats_spec().unwrap()).unwrap();

    let content = find(&measured, "content-api", "app");
    assert!(!content.has_data());
    assert!(content.statistics.is_none());
    assert_run_counts(&serde_json::to_value(content).unwrap(), 0, 4).unwrap();

    let order: Vec<ScenarioName> = ["find-process", "fuzzy-api", "content-api", "list-api"]
        .into_iter()
        .map(ScenarioName::from)
        .collect();
    let groups = group_by_scenario(measured, &order);
    let rows = compare(&groups[0], &groups[1..]);
    assert_eq!(rows[1].speedup("content-api"), Speedup::Undefined);
    assert_eq!(rows[1].duration("content-api"), None);

    let summary = summarize(&order[0], &rows);
    assert_eq!(summary.average("content-api"), None);
    assert_eq!(summary.speedup("content-api"), Speedup::Undefined);
    let json = serde_json::to_value(&summary).unwrap();
    assert!(json["speedups"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["candidate"] == "content-api" && s["ratio"].is_null()));
}

struct CancelOnProgress {
    cancel: CancellationToken,
}

impl ProgressObserver for CancelOnProgress {
    fn on_progress(&self, _progress: &Progress<'_>) {
        self.cancel.cancel();
    }
}

#[tokio::test]
async fn cancellation_keeps_partial_results() {
    let tree = project_tree().unwrap();
    let mock = MockSandbox::start(MockOptions::default()).await.unwrap();
    let config = config(&mock.base_url(), &path_str(&tree), 20, true);

    let cancel = CancellationToken::new();
    let observer = CancelOnProgress {
        cancel: cancel.clone(),
    };
    let outcome = execute(&config, &observer, cancel).await.unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.runs.len(), 1);
    let run = &outcome.runs[0];
    assert!(run.is_cancelled());
    // first progress report comes after four trials
    assert_eq!(run.samples().len(), 4);
    assert_eq!(mock.calls("process"), 5);
    assert_eq!(mock.calls("fuzzy"), 0);
}

#[tokio::test]
async fn missing_target_fails_before_any_request() {
    let tree = project_tree().unwrap();
    let mock = MockSandbox::start(MockOptions::default()).await.unwrap();
    let missing = tree.path().join("absent").display().to_string();
    let config = config(&mock.base_url(), &missing, 2, true);

    let err = execute(&config, &NoopObserver, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.is_precondition());
    assert_eq!(mock.calls("process"), 0);
}
