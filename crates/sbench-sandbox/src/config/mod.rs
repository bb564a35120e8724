//! Benchmark configuration.
//!
//! Loaded from YAML, validated once, then passed by reference. Every section
//! except `scenarios` has defaults, so a minimal file only names what it
//! benchmarks.

use anyhow::{anyhow, Context, Result};
use sbench_common::ScenarioName;
use sbench_harness::{BenchmarkPlan, Scenario, SessionOptions};
use sbench_stats::histogram::DEFAULT_BOUNDS_MS;
use sbench_stats::{BucketSpec, Percentile, StatsSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub mod validation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,
    pub baseline: String,
    pub scenarios: Vec<ScenarioConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Directory the scenarios operate on.
    #[serde(default = "default_target_path")]
    pub path: String,
    /// Fail before measuring when `path` does not exist locally.
    #[serde(default = "default_true")]
    pub check_path_exists: bool,
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_target_path(),
            check_path_exists: true,
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default = "default_true")]
    pub warmup: bool,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
    #[serde(default = "default_max_reported_errors")]
    pub max_reported_errors: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            warmup: true,
            progress_interval: default_progress_interval(),
            max_reported_errors: default_max_reported_errors(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<u32>,
    /// Lower bounds of the histogram buckets in ms; the last bucket is open.
    #[serde(default = "default_histogram_bounds")]
    pub histogram_bounds_ms: Vec<f64>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            percentiles: default_percentiles(),
            histogram_bounds_ms: default_histogram_bounds(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Process,
    FuzzySearch,
    ContentSearch,
    Find,
    ListDirectory,
}

impl ScenarioKind {
    /// Kinds whose endpoint returns ranked matches.
    pub fn is_search(&self) -> bool {
        matches!(
            self,
            ScenarioKind::FuzzySearch | ScenarioKind::ContentSearch | ScenarioKind::Find
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub kind: ScenarioKind,

    // process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    // search family
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
    #[serde(default = "default_true")]
    pub include_files: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find_type: Option<String>,
}

impl ScenarioConfig {
    fn with_kind(name: &str, kind: ScenarioKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            command: None,
            working_dir: None,
            max_results: default_max_results(),
            exclude_dirs: default_exclude_dirs(),
            include_files: true,
            patterns: None,
            find_type: None,
        }
    }

    pub fn process(name: &str, command: &str) -> Self {
        Self {
            command: Some(command.to_string()),
            ..Self::with_kind(name, ScenarioKind::Process)
        }
    }

    pub fn search(name: &str, kind: ScenarioKind) -> Self {
        Self::with_kind(name, kind)
    }
}

impl Default for BenchConfig {
    /// The filename and content search comparison: `find`/`grep` spawned
    /// through the process API against the fuzzy and content search
    /// handlers.
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            run: RunConfig::default(),
            stats: StatsConfig::default(),
            queries: default_queries(),
            baseline: "find-process".to_string(),
            scenarios: vec![
                ScenarioConfig::process(
                    "find-process",
                    r#"find {path} -type f -iname "*{query}*""#,
                ),
                ScenarioConfig::process("grep-process", r#"grep -r -l -i "{query}" "{path}""#),
                ScenarioConfig::search("fuzzy-api", ScenarioKind::FuzzySearch),
                ScenarioConfig::search("content-api", ScenarioKind::ContentSearch),
            ],
        }
    }
}

impl BenchConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::load_from_string(&content)
    }

    /// Load configuration from a YAML string
    pub fn load_from_string(content: &str) -> Result<Self> {
        let config: BenchConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    pub fn scenario(&self, name: &str) -> Option<&ScenarioConfig> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn stats_spec(&self) -> Result<StatsSpec> {
        let percentiles = self
            .stats
            .percentiles
            .iter()
            .map(|&p| Percentile::new(p).map_err(|e| anyhow!("{}", e)))
            .collect::<Result<Vec<_>>>()?;
        let buckets = BucketSpec::from_bounds(&self.stats.histogram_bounds_ms)
            .map_err(|e| anyhow!("{}", e))?;
        Ok(StatsSpec {
            percentiles,
            buckets,
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            progress_interval: self.run.progress_interval,
            max_reported_errors: self.run.max_reported_errors,
        }
    }

    /// The plan for `scenarios`, which must have been built from this config.
    pub fn plan(&self, scenarios: Vec<Scenario>) -> BenchmarkPlan {
        BenchmarkPlan {
            scenarios,
            queries: self.queries.clone(),
            trials: self.run.trials,
            warmup: self.run.warmup,
            baseline: ScenarioName::from(self.baseline.as_str()),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_target_path() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_trials() -> usize {
    2000
}

fn default_progress_interval() -> usize {
    100
}

fn default_max_reported_errors() -> usize {
    5
}

fn default_percentiles() -> Vec<u32> {
    vec![50, 95, 99]
}

fn default_histogram_bounds() -> Vec<f64> {
    DEFAULT_BOUNDS_MS.to_vec()
}

fn default_queries() -> Vec<String> {
    ["app", "page", "component", "router", "server"]
        .iter()
        .map(|q| q.to_string())
        .collect()
}

fn default_max_results() -> usize {
    100
}

fn default_exclude_dirs() -> Vec<String> {
    vec!["node_modules".to_string(), ".git".to_string()]
}

// Durations as "30s", "250ms" or "1m"
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        let invalid = || format!("Invalid duration: {}", s);
        // "ms" before "s"
        if let Some(num) = s.strip_suffix("ms") {
            num.parse().map(Duration::from_millis).map_err(|_| invalid())
        } else if let Some(num) = s.strip_suffix('s') {
            num.parse().map(Duration::from_secs).map_err(|_| invalid())
        } else if let Some(num) = s.strip_suffix('m') {
            num.parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| invalid())
        } else {
            Err(format!("Duration must end with 's', 'ms', or 'm': {}", s))
        }
    }
}
