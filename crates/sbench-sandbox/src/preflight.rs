//! Checks that must pass before any trial runs.

use sbench_common::{Error, Result};
use tracing::debug;

use crate::config::BenchConfig;

/// Fails with a precondition error when the configured target directory is
/// missing. Skipped when `check_path_exists` is off, e.g. when the sandbox
/// runs on another host.
pub async fn check_target(config: &BenchConfig) -> Result<()> {
    if !config.target.check_path_exists {
        debug!("Skipping target path check for {}", config.target.path);
        return Ok(());
    }

    match tokio::fs::metadata(&config.target.path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::precondition(format!(
            "target path {} is not a directory",
            config.target.path
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::precondition(format!(
            "target path {} does not exist",
            config.target.path
        ))),
        Err(e) => Err(Error::from(e).context(format!("checking {}", config.target.path))),
    }
}
