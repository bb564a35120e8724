//! Sandbox operations against the mock API: request shapes, result counting
//! and failure mapping.

use e2e_tests::fixtures::{path_str, project_tree};
use e2e_tests::{FailureMode, MockOptions, MockSandbox};
use sbench_common::{Error, TrialError};
use sbench_harness::Operation;
use sbench_sandbox::{
    ListDirectory, ProcessCommand, SandboxClient, SearchKind, SearchOperation, SearchOptions,
};
use std::sync::Arc;
use std::time::Duration;

async fn start(options: MockOptions) -> (MockSandbox, Arc<SandboxClient>) {
    let mock = MockSandbox::start(options).await.unwrap();
    let client = Arc::new(SandboxClient::new(mock.base_url(), Duration::from_secs(5)));
    (mock, client)
}

#[tokio::test]
async fn process_command_counts_stdout_lines() {
    let (mock, client) = start(MockOptions {
        process_stdout: "/srv/app/page.tsx\n\n/srv/app/layout.tsx\n/srv/README.md\n".to_string(),
        ..Default::default()
    })
    .await;

    let op = ProcessCommand::new(
        client,
        r#"find {path} -type f -iname "*{query}*""#,
        "/srv",
        Some("/srv".to_string()),
    );
    let output = op.execute("app").await.unwrap();

    assert_eq!(output.result_count, 3);
    assert_eq!(mock.calls("process"), 1);
    assert_eq!(mock.calls("logs"), 1);
    assert_eq!(mock.commands(), vec![r#"find /srv -type f -iname "*app*""#]);
}

#[tokio::test]
async fn fuzzy_search_decodes_path_and_filters() {
    let tree = project_tree().unwrap();
    let (mock, client) = start(MockOptions::default()).await;

    let op = SearchOperation::new(
        client,
        SearchKind::Fuzzy,
        path_str(&tree),
        SearchOptions::default(),
    );
    let output = op.execute("router").await.unwrap();

    assert_eq!(output.result_count, 1);
    assert_eq!(mock.paths(), vec![path_str(&tree)]);
}

#[tokio::test]
async fn content_search_skips_excluded_dirs() {
    let tree = project_tree().unwrap();
    let (_mock, client) = start(MockOptions::default()).await;

    let op = SearchOperation::new(
        client.clone(),
        SearchKind::Content,
        path_str(&tree),
        SearchOptions::default(),
    );
    // router.ts and README.md; nothing under node_modules
    assert_eq!(op.execute("router").await.unwrap().result_count, 2);

    let unfiltered = SearchOperation::new(
        client,
        SearchKind::Content,
        path_str(&tree),
        SearchOptions {
            exclude_dirs: vec![],
            ..SearchOptions::default()
        },
    );
    assert_eq!(unfiltered.execute("module.exports").await.unwrap().result_count, 1);
}

#[tokio::test]
async fn find_uses_rendered_patterns() {
    let tree = project_tree().unwrap();
    let (mock, client) = start(MockOptions::default()).await;

    let op = SearchOperation::new(
        client,
        SearchKind::Find,
        path_str(&tree),
        SearchOptions::default(),
    );
    assert_eq!(op.execute("tsx").await.unwrap().result_count, 3);
    assert_eq!(mock.calls("find"), 1);
}

#[tokio::test]
async fn listing_counts_files_and_directories() {
    let tree = project_tree().unwrap();
    let (mock, client) = start(MockOptions::default()).await;

    let op = ListDirectory::new(client, path_str(&tree));
    // app, components, server, node_modules + README.md
    assert_eq!(op.execute("ignored").await.unwrap().result_count, 5);
    assert_eq!(op.execute("also ignored").await.unwrap().result_count, 5);
    assert_eq!(mock.calls("list"), 2);
}

#[tokio::test]
async fn top_matches_are_capped() {
    let tree = project_tree().unwrap();
    let (_mock, client) = start(MockOptions::default()).await;

    let op = SearchOperation::new(
        client,
        SearchKind::Fuzzy,
        path_str(&tree),
        SearchOptions::default(),
    );
    let top = op.top_matches("t", 3).await.unwrap();
    assert_eq!(top.len(), 3);
    assert!(top[0].score >= top[1].score);
    assert!(top.iter().all(|m| !m.basename().contains('/')));
}

#[tokio::test]
async fn failed_preview_is_a_protocol_error() {
    let tree = project_tree().unwrap();
    let (_mock, client) = start(MockOptions {
        fuzzy_failure: FailureMode::Always(500),
        ..Default::default()
    })
    .await;

    let op = SearchOperation::new(
        client,
        SearchKind::Fuzzy,
        path_str(&tree),
        SearchOptions::default(),
    );
    let err = op.top_matches("router", 3).await.unwrap_err();
    match err {
        Error::Protocol(ref message) => assert!(message.starts_with("HTTP 500"), "{message}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn error_status_becomes_trial_error() {
    let tree = project_tree().unwrap();
    let (_mock, client) = start(MockOptions {
        content_failure: FailureMode::Always(503),
        ..Default::default()
    })
    .await;

    let op = SearchOperation::new(
        client,
        SearchKind::Content,
        path_str(&tree),
        SearchOptions::default(),
    );
    let err = op.execute("router").await.unwrap_err();
    match err {
        TrialError::Status { status, ref body } => {
            assert_eq!(status, 503);
            assert!(body.contains("content search failed"), "{body}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_directory_is_not_found() {
    let (_mock, client) = start(MockOptions::default()).await;
    let op = ListDirectory::new(client, "/definitely/not/a/dir");
    let err = op.execute("x").await.unwrap_err();
    assert!(matches!(err, TrialError::Status { status: 404, .. }), "{err:?}");
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let tree = project_tree().unwrap();
    let (_mock, client) = start(MockOptions::default()).await;

    let op = SearchOperation::new(
        client,
        SearchKind::Fuzzy,
        path_str(&tree),
        SearchOptions::default(),
    );
    let err = op.execute("__malformed__").await.unwrap_err();
    assert!(matches!(err, TrialError::MalformedResponse { .. }), "{err:?}");
}

#[tokio::test]
async fn slow_response_times_out() {
    let tree = project_tree().unwrap();
    let mock = MockSandbox::start(MockOptions {
        fuzzy_delay: Duration::from_millis(500),
        ..Default::default()
    })
    .await
    .unwrap();
    let client = Arc::new(SandboxClient::new(mock.base_url(), Duration::from_millis(50)));

    let op = SearchOperation::new(
        client,
        SearchKind::Fuzzy,
        path_str(&tree),
        SearchOptions::default(),
    );
    let err = op.execute("router").await.unwrap_err();
    assert_eq!(err, TrialError::Timeout { timeout_ms: 50 });
}
