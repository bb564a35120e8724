//! Scripted operations for unit tests.

use crate::scenario::{Operation, OperationOutput, Scenario};
use async_trait::async_trait;
use sbench_common::{TrialError, TrialResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Script = dyn Fn(usize, &str) -> TrialResult<OperationOutput> + Send + Sync;

/// Operation whose outcome is decided per call by a closure over the call
/// number (0 is the first call, usually the warmup).
pub(crate) struct ScriptedOperation {
    calls: AtomicUsize,
    delay: Option<Duration>,
    script: Box<Script>,
}

impl ScriptedOperation {
    pub(crate) fn new(
        script: impl Fn(usize, &str) -> TrialResult<OperationOutput> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: None,
            script: Box::new(script),
        }
    }

    pub(crate) fn always_ok(result_count: u64) -> Self {
        Self::new(move |_, _| Ok(OperationOutput::with_count(result_count)))
    }

    pub(crate) fn always_failing(status: u16) -> Self {
        Self::new(move |_, _| Err(TrialError::status(status, "scripted failure")))
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Operation for ScriptedOperation {
    async fn execute(&self, query: &str) -> TrialResult<OperationOutput> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.script)(call, query)
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

pub(crate) fn scenario(name: &str, op: ScriptedOperation) -> (Scenario, Arc<ScriptedOperation>) {
    let op = Arc::new(op);
    (Scenario::new(name, op.clone()), op)
}
