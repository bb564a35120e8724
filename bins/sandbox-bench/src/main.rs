use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

use sbench_common::{Error as BenchError, ScenarioName};
use sbench_harness::{
    compare, group_by_scenario, run_plan, summarize, BenchmarkSession, CancellationToken,
    TracingObserver,
};
use sbench_sandbox::{build_scenarios, check_target, BenchConfig, SandboxClient, ScenarioSet};

mod report;

use report::{BenchReport, RunReport, TopMatches};

const TOP_MATCHES: usize = 3;

/// Sandbox API benchmark: compares implementation paths of the same operation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (YAML); built-in search comparison if omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Trials per scenario and query (overrides config)
    #[arg(short = 'n', long)]
    trials: Option<usize>,

    /// Query to benchmark; repeat for several (overrides config)
    #[arg(short, long = "query", value_name = "QUERY")]
    queries: Vec<String>,

    /// Sandbox API address (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory the scenarios operate on (overrides config)
    #[arg(long)]
    target_path: Option<String>,

    /// Skip the warmup trial
    #[arg(long)]
    no_warmup: bool,

    /// Write the full report as JSON
    #[arg(long, value_name = "FILE")]
    json_out: Option<PathBuf>,

    /// Print the top matches of search scenarios for each query
    #[arg(long)]
    show_top_matches: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = initialize_logging(args.debug) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::from(2);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match run(config, &args).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<BenchError>() {
                Some(be) if be.is_precondition() => error!("Benchmark aborted: {}", be),
                _ => error!("Benchmark failed: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<BenchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Config file: {}", path.display());
            BenchConfig::load_from_file(path)?
        }
        None => BenchConfig::default(),
    };

    if let Some(trials) = args.trials {
        config.run.trials = trials;
    }
    if !args.queries.is_empty() {
        config.queries = args.queries.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.target.base_url = base_url.clone();
    }
    if let Some(path) = &args.target_path {
        config.target.path = path.clone();
    }
    if args.no_warmup {
        config.run.warmup = false;
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: BenchConfig, args: &Args) -> Result<ExitCode> {
    info!(
        "Benchmarking {} scenarios x {} queries x {} trials against {}",
        config.scenarios.len(),
        config.queries.len(),
        config.run.trials,
        config.target.base_url
    );

    check_target(&config).await?;

    let stats_spec = config.stats_spec()?;
    let client = Arc::new(SandboxClient::new(
        config.target.base_url.clone(),
        config.target.request_timeout,
    ));
    let ScenarioSet {
        scenarios,
        searches,
    } = build_scenarios(&config, client);
    let order: Vec<ScenarioName> = scenarios.iter().map(|s| s.name().clone()).collect();
    let plan = config.plan(scenarios);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Interrupted, finishing the current trial");
        signal_cancel.cancel();
    });

    let observer = TracingObserver;
    let session = BenchmarkSession::new(config.session_options(), &observer, cancel.clone());
    let outcome = run_plan(&plan, &session).await?;

    let mut top_matches = Vec::new();
    if args.show_top_matches && !outcome.cancelled {
        for query in &config.queries {
            for (name, search) in &searches {
                match search.top_matches(query, TOP_MATCHES).await {
                    Ok(matches) => top_matches.push(TopMatches {
                        scenario: name.clone(),
                        query: query.clone(),
                        matches,
                    }),
                    Err(e) => warn!("Top matches of {} for '{}' unavailable: {}", name, query, e),
                }
            }
        }
    }

    let measured = outcome.measure(&stats_spec)?;
    let runs: Vec<RunReport> = measured.iter().map(RunReport::from_measured).collect();
    let groups = group_by_scenario(measured, &order);
    let (rows, summary) = match groups.iter().position(|g| g.scenario == plan.baseline) {
        Some(idx) => {
            let rows = compare(&groups[idx], &groups);
            let summary = summarize(&plan.baseline, &rows);
            (rows, summary)
        }
        None => (Vec::new(), summarize(&plan.baseline, &[])),
    };

    let report = BenchReport {
        started_at: outcome.started_at,
        cancelled: outcome.cancelled,
        config,
        runs,
        comparison: rows,
        summary,
        top_matches,
    };

    println!("{}", report.render());

    if let Some(path) = &args.json_out {
        let json = report.to_json().context("Failed to serialize report")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write JSON report: {}", path.display()))?;
        info!("JSON report written to {}", path.display());
    }

    if report.cancelled {
        info!("Benchmark interrupted; partial results reported");
        return Ok(ExitCode::SUCCESS);
    }
    if report.has_empty_runs() {
        warn!("At least one run had no successful trials");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn initialize_logging(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to create SIGTERM handler");
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
            .expect("Failed to create SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM signal");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT signal");
            }
        }
    }

    #[cfg(windows)]
    {
        let _ = signal::ctrl_c().await;
        info!("Received Ctrl+C signal");
    }
}
