//! The benchmarked operations: each is one way of answering the same
//! question through the sandbox API.

use async_trait::async_trait;
use sbench_common::{Error, Result, TrialError, TrialResult};
use sbench_harness::{Operation, OperationOutput};
use std::sync::Arc;
use tracing::debug;

use crate::client::SandboxClient;
use crate::models::{
    DirectoryListing, ProcessLogs, ProcessRequest, ProcessResponse, SearchMatch, SearchResponse,
};

/// Percent-encodes a filesystem path into a single URL segment (`/` → `%2F`).
pub fn encode_path(path: &str) -> String {
    urlencoding::encode(path).into_owned()
}

/// Replaces `{query}` and `{path}` in a command or pattern template.
pub fn render_template(template: &str, query: &str, path: &str) -> String {
    template.replace("{query}", query).replace("{path}", path)
}

fn query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Runs a shell command through `POST /process` and counts the non-blank
/// stdout lines fetched from `GET /process/{pid}/logs`.
pub struct ProcessCommand {
    client: Arc<SandboxClient>,
    template: String,
    target_path: String,
    working_dir: Option<String>,
    timeout_secs: u64,
}

impl ProcessCommand {
    pub fn new(
        client: Arc<SandboxClient>,
        template: impl Into<String>,
        target_path: impl Into<String>,
        working_dir: Option<String>,
    ) -> Self {
        let timeout_secs = client.request_timeout().as_secs().max(1);
        Self {
            client,
            template: template.into(),
            target_path: target_path.into(),
            working_dir,
            timeout_secs,
        }
    }

    pub fn command_for(&self, query: &str) -> String {
        render_template(&self.template, query, &self.target_path)
    }
}

#[async_trait]
impl Operation for ProcessCommand {
    async fn execute(&self, query: &str) -> TrialResult<OperationOutput> {
        let request = ProcessRequest {
            command: self.command_for(query),
            wait_for_completion: true,
            timeout: self.timeout_secs,
            working_dir: self.working_dir.clone(),
        };

        let process: ProcessResponse = self.client.post_json("/process", &request).await?;
        if process.pid.is_empty() {
            return Err(TrialError::malformed("process response has an empty pid"));
        }
        debug!(
            "Process {} finished with status '{}' (exit code {:?})",
            process.pid, process.status, process.exit_code
        );

        let logs: ProcessLogs = self
            .client
            .get_json(&format!("/process/{}/logs", urlencoding::encode(&process.pid)))
            .await?;
        Ok(OperationOutput::with_count(logs.result_count()))
    }

    fn describe(&self) -> String {
        format!("process `{}`", self.template)
    }
}

/// Which search-family endpoint a [`SearchOperation`] calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// `GET /filesystem-search/{path}`
    Fuzzy,
    /// `GET /filesystem-content-search/{path}`
    Content,
    /// `GET /filesystem-find/{path}`
    Find,
}

impl SearchKind {
    fn endpoint(&self) -> &'static str {
        match self {
            SearchKind::Fuzzy => "/filesystem-search",
            SearchKind::Content => "/filesystem-content-search",
            SearchKind::Find => "/filesystem-find",
        }
    }
}

/// Options shared by the search endpoints. Fields that an endpoint does not
/// understand are not sent.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_results: usize,
    pub exclude_dirs: Vec<String>,
    pub include_files: bool,
    /// Find only: pattern template, `{query}` is substituted.
    pub patterns: String,
    /// Find only: `file` or `directory`.
    pub find_type: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 100,
            exclude_dirs: vec!["node_modules".to_string(), ".git".to_string()],
            include_files: true,
            patterns: "*{query}*".to_string(),
            find_type: None,
        }
    }
}

/// Calls one of the direct search handlers; the result count is the
/// response's `total`.
pub struct SearchOperation {
    client: Arc<SandboxClient>,
    kind: SearchKind,
    target_path: String,
    options: SearchOptions,
}

impl SearchOperation {
    pub fn new(
        client: Arc<SandboxClient>,
        kind: SearchKind,
        target_path: impl Into<String>,
        options: SearchOptions,
    ) -> Self {
        Self {
            client,
            kind,
            target_path: target_path.into(),
            options,
        }
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    /// Request path and query string for `query`, capped at `max_results`.
    pub fn request_path(&self, query: &str, max_results: usize) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();
        match self.kind {
            SearchKind::Fuzzy => {
                params.push(("query", query.to_string()));
                params.push(("includeFiles", self.options.include_files.to_string()));
            }
            SearchKind::Content => {
                params.push(("query", query.to_string()));
            }
            SearchKind::Find => {
                params.push((
                    "patterns",
                    render_template(&self.options.patterns, query, &self.target_path),
                ));
                if let Some(find_type) = &self.options.find_type {
                    params.push(("type", find_type.clone()));
                }
            }
        }
        if !self.options.exclude_dirs.is_empty() {
            params.push(("excludeDirs", self.options.exclude_dirs.join(",")));
        }
        params.push(("maxResults", max_results.to_string()));

        format!(
            "{}/{}?{}",
            self.kind.endpoint(),
            encode_path(&self.target_path),
            query_string(&params)
        )
    }

    pub async fn search(&self, query: &str, max_results: usize) -> TrialResult<SearchResponse> {
        self.client
            .get_json(&self.request_path(query, max_results))
            .await
    }

    /// The best `n` matches for `query`, as the endpoint ranks them. Not a
    /// measured trial, so failures surface as [`Error::Protocol`].
    pub async fn top_matches(&self, query: &str, n: usize) -> Result<Vec<SearchMatch>> {
        let mut response = self.search(query, n).await.map_err(Error::from)?;
        response.matches.truncate(n);
        Ok(response.matches)
    }
}

#[async_trait]
impl Operation for SearchOperation {
    async fn execute(&self, query: &str) -> TrialResult<OperationOutput> {
        let response = self.search(query, self.options.max_results).await?;
        Ok(OperationOutput::with_count(response.total))
    }

    fn describe(&self) -> String {
        format!("GET {}", self.kind.endpoint())
    }
}

/// Lists the target directory through `GET /filesystem/{path}`. The query is
/// ignored; every trial issues the same request.
pub struct ListDirectory {
    client: Arc<SandboxClient>,
    target_path: String,
}

impl ListDirectory {
    pub fn new(client: Arc<SandboxClient>, target_path: impl Into<String>) -> Self {
        Self {
            client,
            target_path: target_path.into(),
        }
    }

    pub fn request_path(&self) -> String {
        format!("/filesystem/{}", encode_path(&self.target_path))
    }
}

#[async_trait]
impl Operation for ListDirectory {
    async fn execute(&self, _query: &str) -> TrialResult<OperationOutput> {
        let listing: DirectoryListing = self.client.get_json(&self.request_path()).await?;
        Ok(OperationOutput::with_count(listing.result_count()))
    }

    fn describe(&self) -> String {
        "GET /filesystem".to_string()
    }
}
