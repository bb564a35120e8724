//! Builds harness scenarios from the configured scenario list.

use sbench_common::ScenarioName;
use sbench_harness::{Operation, Scenario};
use std::sync::Arc;
use tracing::debug;

use crate::client::SandboxClient;
use crate::config::{BenchConfig, ScenarioConfig, ScenarioKind};
use crate::operations::{ListDirectory, ProcessCommand, SearchKind, SearchOperation, SearchOptions};

/// Scenarios in configuration order, plus handles on the search-kind ones
/// for the top-match preview.
pub struct ScenarioSet {
    pub scenarios: Vec<Scenario>,
    pub searches: Vec<(ScenarioName, Arc<SearchOperation>)>,
}

impl ScenarioSet {
    pub fn names(&self) -> Vec<ScenarioName> {
        self.scenarios.iter().map(|s| s.name().clone()).collect()
    }
}

pub fn build_scenarios(config: &BenchConfig, client: Arc<SandboxClient>) -> ScenarioSet {
    let mut scenarios = Vec::with_capacity(config.scenarios.len());
    let mut searches = Vec::new();

    for scenario in &config.scenarios {
        let name = ScenarioName::from(scenario.name.as_str());
        let operation: Arc<dyn Operation> = match search_kind(scenario.kind) {
            Some(kind) => {
                let search = Arc::new(SearchOperation::new(
                    client.clone(),
                    kind,
                    config.target.path.clone(),
                    search_options(scenario),
                ));
                searches.push((name.clone(), search.clone()));
                search as Arc<dyn Operation>
            }
            None if scenario.kind == ScenarioKind::ListDirectory => Arc::new(ListDirectory::new(
                client.clone(),
                config.target.path.clone(),
            )),
            None => Arc::new(ProcessCommand::new(
                client.clone(),
                scenario.command.clone().unwrap_or_default(),
                config.target.path.clone(),
                scenario.working_dir.clone(),
            )),
        };
        debug!("Scenario {} -> {}", name, operation.describe());
        scenarios.push(Scenario::new(name, operation));
    }

    ScenarioSet {
        scenarios,
        searches,
    }
}

fn search_kind(kind: ScenarioKind) -> Option<SearchKind> {
    match kind {
        ScenarioKind::FuzzySearch => Some(SearchKind::Fuzzy),
        ScenarioKind::ContentSearch => Some(SearchKind::Content),
        ScenarioKind::Find => Some(SearchKind::Find),
        ScenarioKind::Process | ScenarioKind::ListDirectory => None,
    }
}

fn search_options(scenario: &ScenarioConfig) -> SearchOptions {
    let defaults = SearchOptions::default();
    SearchOptions {
        max_results: scenario.max_results,
        exclude_dirs: scenario.exclude_dirs.clone(),
        include_files: scenario.include_files,
        patterns: scenario.patterns.clone().unwrap_or(defaults.patterns),
        find_type: scenario.find_type.clone(),
    }
}
