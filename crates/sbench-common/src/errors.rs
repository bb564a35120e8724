//! Error types for the benchmark harness.
//!
//! Two layers of failure exist and they never mix:
//!
//! - [`Error`] is for conditions that stop a run: bad configuration, a
//!   missing target, a failed warmup, a scenario with no data to report.
//!   These propagate to the top level with `?`.
//! - [`TrialError`] describes why a single trial failed. The trial runner
//!   turns it into a failed sample; it is data, not control flow.
//!
//! ```rust
//! use sbench_common::{Error, Result};
//!
//! fn check() -> Result<()> {
//!     Err(Error::precondition("/srv/repos/next.js does not exist"))
//! }
//!
//! let err = check()
//!     .map_err(|e| e.context("Failed to prepare benchmark target"))
//!     .unwrap_err();
//! assert!(err.is_precondition());
//! ```

use thiserror::Error;

use crate::types::ScenarioName;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Run-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input or configuration.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A required external resource is unavailable before measurement starts.
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    /// The warmup trial failed, so the subject system is presumed unreachable.
    #[error("Warmup failed for scenario '{scenario}' (query '{query}'): {reason}")]
    WarmupFailed {
        scenario: ScenarioName,
        query: String,
        reason: String,
    },

    /// Statistics were requested for a run without a single successful trial.
    #[error("No successful samples for scenario '{scenario}' (query '{query}')")]
    NoSuccessfulSamples { scenario: ScenarioName, query: String },

    /// A scenario name that is not part of the benchmark plan.
    #[error("Unknown scenario: {0}")]
    UnknownScenario(ScenarioName),

    /// Protocol error talking to the subject system outside of a trial.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// I/O error (wraps std::io::Error).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context.
    #[error("{message}: {source}")]
    WithContext {
        message: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a Precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Creates a WarmupFailed error.
    pub fn warmup_failed(
        scenario: ScenarioName,
        query: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::WarmupFailed {
            scenario,
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// Creates a NoSuccessfulSamples error.
    pub fn no_successful_samples(scenario: ScenarioName, query: impl Into<String>) -> Self {
        Self::NoSuccessfulSamples {
            scenario,
            query: query.into(),
        }
    }

    /// Adds context to an error.
    pub fn context(self, message: impl Into<String>) -> Self {
        Self::WithContext {
            message: message.into(),
            source: Box::new(self),
        }
    }

    /// Returns true if this error (or the error it wraps) is fatal before any
    /// measurement, i.e. a missing target or an unreachable subject system.
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::Precondition { .. } | Self::WarmupFailed { .. } => true,
            Self::WithContext { source, .. } => source.is_precondition(),
            _ => false,
        }
    }
}

/// A trial-level failure seen outside a measured trial, e.g. while fetching
/// a preview, becomes a protocol error.
impl From<TrialError> for Error {
    fn from(err: TrialError) -> Self {
        Self::Protocol(err.to_string())
    }
}

// ==============================================================================
// Trial Errors
// ==============================================================================

/// Why a single trial failed.
///
/// The `Display` output is what ends up in `Sample::error`, so every variant
/// renders as a short one-line description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrialError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },
}

/// Longest response body kept in a [`TrialError::Status`] description.
const MAX_BODY_EXCERPT: usize = 200;

impl TrialError {
    /// Creates a Status error, truncating the body to a short excerpt.
    pub fn status(status: u16, body: impl AsRef<str>) -> Self {
        let body = body.as_ref().trim();
        let excerpt = match body.char_indices().nth(MAX_BODY_EXCERPT) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        Self::Status {
            status,
            body: excerpt,
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}

/// Result type for trial operations.
pub type TrialResult<T> = std::result::Result<T, TrialError>;
