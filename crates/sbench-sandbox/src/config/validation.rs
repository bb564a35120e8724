use super::*;
use anyhow::{anyhow, Result};
use std::collections::HashSet;

/// Validate the complete configuration
pub fn validate_config(config: &BenchConfig) -> Result<()> {
    validate_target(&config.target)?;
    validate_run(&config.run)?;
    validate_stats(&config.stats)?;

    if config.queries.is_empty() {
        return Err(anyhow!("At least one query must be configured"));
    }
    if config.queries.iter().any(|q| q.trim().is_empty()) {
        return Err(anyhow!("Queries cannot be empty"));
    }

    validate_scenarios(&config.scenarios)?;

    if config.scenario(&config.baseline).is_none() {
        return Err(anyhow!(
            "Baseline '{}' does not name a configured scenario",
            config.baseline
        ));
    }

    Ok(())
}

fn validate_target(target: &TargetConfig) -> Result<()> {
    if !target.base_url.starts_with("http://") {
        return Err(anyhow!(
            "Base URL must start with http://, got: {}",
            target.base_url
        ));
    }
    if target.path.is_empty() {
        return Err(anyhow!("Target path cannot be empty"));
    }
    if target.request_timeout == Duration::ZERO {
        return Err(anyhow!("Request timeout must be greater than 0"));
    }
    Ok(())
}

fn validate_run(run: &RunConfig) -> Result<()> {
    if run.trials == 0 {
        return Err(anyhow!("Trial count must be greater than 0"));
    }
    if run.progress_interval == 0 {
        return Err(anyhow!("Progress interval must be greater than 0"));
    }
    Ok(())
}

fn validate_stats(stats: &StatsConfig) -> Result<()> {
    if let Some(p) = stats.percentiles.iter().find(|&&p| p > 100) {
        return Err(anyhow!("Percentile must be between 0 and 100, got: {}", p));
    }
    BucketSpec::from_bounds(&stats.histogram_bounds_ms)
        .map_err(|e| anyhow!("Invalid histogram_bounds_ms: {}", e))?;
    Ok(())
}

fn validate_scenarios(scenarios: &[ScenarioConfig]) -> Result<()> {
    if scenarios.is_empty() {
        return Err(anyhow!("At least one scenario must be configured"));
    }

    let mut names = HashSet::new();
    for scenario in scenarios {
        if !names.insert(&scenario.name) {
            return Err(anyhow!("Duplicate scenario name: {}", scenario.name));
        }
        validate_scenario(scenario)?;
    }
    Ok(())
}

fn validate_scenario(scenario: &ScenarioConfig) -> Result<()> {
    if scenario.name.is_empty() {
        return Err(anyhow!("Scenario name cannot be empty"));
    }
    if !scenario
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow!(
            "Scenario name can only contain alphanumeric characters, hyphens, and underscores: {}",
            scenario.name
        ));
    }

    match scenario.kind {
        ScenarioKind::Process => {
            let command = scenario.command.as_deref().ok_or_else(|| {
                anyhow!(
                    "Scenario '{}' of kind process requires a command",
                    scenario.name
                )
            })?;
            if !command.contains("{query}") && !command.contains("{path}") {
                return Err(anyhow!(
                    "Command of scenario '{}' must contain {{query}} or {{path}}",
                    scenario.name
                ));
            }
        }
        _ => {
            if scenario.command.is_some() {
                return Err(anyhow!(
                    "Only process scenarios take a command: {}",
                    scenario.name
                ));
            }
            if scenario.kind.is_search() && scenario.max_results == 0 {
                return Err(anyhow!(
                    "max_results of scenario '{}' must be greater than 0",
                    scenario.name
                ));
            }
        }
    }

    if let Some(find_type) = &scenario.find_type {
        if scenario.kind != ScenarioKind::Find {
            return Err(anyhow!("find_type is only valid for find scenarios: {}", scenario.name));
        }
        if find_type != "file" && find_type != "directory" {
            return Err(anyhow!(
                "Invalid find_type: {}, must be one of: file, directory",
                find_type
            ));
        }
    }

    Ok(())
}
