//! Scenarios and the operation interface they dispatch to.
//!
//! An [`Operation`] is one implementation of the logical operation being
//! benchmarked (a process-spawning command path, a direct search handler,
//! ...). The harness only ever sees this trait; the subject-system adapter
//! provides the implementations.

use async_trait::async_trait;
use sbench_common::{ScenarioName, TrialResult};
use std::fmt;
use std::sync::Arc;

/// What a successful call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperationOutput {
    /// Number of results the call returned (matches, output lines, entries).
    pub result_count: u64,
}

impl OperationOutput {
    pub fn with_count(result_count: u64) -> Self {
        Self { result_count }
    }
}

/// One implementation variant of the benchmarked operation.
///
/// Implementations enforce their own per-call timeout and report it, like
/// any other failure, as a [`sbench_common::TrialError`]. They must be safe
/// to call repeatedly; the harness calls them strictly one at a time.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Execute the operation once for `query`.
    async fn execute(&self, query: &str) -> TrialResult<OperationOutput>;

    /// Short human description used in logs.
    fn describe(&self) -> String {
        "operation".to_string()
    }
}

/// A named implementation variant under comparison.
#[derive(Clone)]
pub struct Scenario {
    name: ScenarioName,
    operation: Arc<dyn Operation>,
}

impl Scenario {
    pub fn new(name: impl Into<ScenarioName>, operation: Arc<dyn Operation>) -> Self {
        Self {
            name: name.into(),
            operation,
        }
    }

    pub fn name(&self) -> &ScenarioName {
        &self.name
    }

    pub fn operation(&self) -> &dyn Operation {
        self.operation.as_ref()
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("operation", &self.operation.describe())
            .finish()
    }
}
