//! Core identifiers used throughout the harness.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scenario name - uniquely identifies one implementation variant under
/// comparison within a benchmark plan.
///
/// # Example
/// ```
/// use sbench_common::ScenarioName;
///
/// let name = ScenarioName::from("fuzzy-api");
/// assert_eq!(name.as_str(), "fuzzy-api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioName(String);

impl ScenarioName {
    /// Creates a new ScenarioName from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the scenario name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScenarioName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ScenarioName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ScenarioName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
