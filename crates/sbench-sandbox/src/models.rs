//! Request and response schemas of the sandbox API endpoints.
//!
//! Every optional field has an explicit default so partial responses from
//! older sandbox builds still parse.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /process`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub command: String,
    pub wait_for_completion: bool,
    /// Server-side process timeout in seconds.
    pub timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

/// Response of `POST /process`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    /// Process identifier; some sandbox builds send it as a number.
    #[serde(deserialize_with = "string_or_number")]
    pub pid: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// Response of `GET /process/{pid}/logs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessLogs {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

impl ProcessLogs {
    /// Number of non-blank stdout lines.
    pub fn result_count(&self) -> u64 {
        self.stdout.lines().filter(|l| !l.trim().is_empty()).count() as u64
    }
}

/// One hit of a search-family endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub path: String,
    #[serde(default)]
    pub score: f64,
}

impl SearchMatch {
    /// Last path component, or the whole path when it has none.
    pub fn basename(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.path)
    }
}

/// Response of the fuzzy search, content search and find endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedEntry {
    #[serde(default)]
    pub path: String,
}

/// Response of `GET /filesystem/{path}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryListing {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub files: Vec<ListedEntry>,
    #[serde(default)]
    pub subdirectories: Vec<ListedEntry>,
}

impl DirectoryListing {
    pub fn result_count(&self) -> u64 {
        (self.files.len() + self.subdirectories.len()) as u64
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Pid {
        Text(String),
        Number(i64),
    }

    Ok(match Pid::deserialize(deserializer)? {
        Pid::Text(s) => s,
        Pid::Number(n) => n.to_string(),
    })
}
