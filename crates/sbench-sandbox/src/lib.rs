//! # sbench sandbox
//!
//! Adapter between the benchmark harness and the sandbox API: an HTTP
//! client with per-request timeouts, the endpoint schemas, one
//! [`sbench_harness::Operation`] per scenario kind, and the YAML
//! configuration that ties them together.

pub mod client;
pub mod config;
pub mod models;
pub mod operations;
pub mod preflight;
pub mod scenarios;

pub use client::SandboxClient;
pub use config::{BenchConfig, ScenarioConfig, ScenarioKind};
pub use operations::{ListDirectory, ProcessCommand, SearchKind, SearchOperation, SearchOptions};
pub use preflight::check_target;
pub use scenarios::{build_scenarios, ScenarioSet};
