//! # sbench common
//!
//! Types shared by every crate of the sandbox benchmark harness.
//!
//! This crate holds the error taxonomy (session-level [`Error`] and
//! trial-level [`TrialError`]) and the scenario identifier used to key
//! results across sessions and comparisons.

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::{Error, Result, TrialError, TrialResult};
pub use types::ScenarioName;
