//! Custom assertions for E2E tests

use serde_json::Value;

/// Assert that a serialized measured run recorded `successes` successful
/// samples out of `total`.
pub fn assert_run_counts(measured: &Value, successes: usize, total: usize) -> Result<(), String> {
    let samples = measured["run"]["samples"]
        .as_array()
        .ok_or_else(|| format!("no samples in {}", measured))?;
    let got_ok = samples
        .iter()
        .filter(|s| s["succeeded"].as_bool() == Some(true))
        .count();
    if got_ok == successes && samples.len() == total {
        Ok(())
    } else {
        Err(format!(
            "expected {}/{} succeeded, got {}/{}",
            successes,
            total,
            got_ok,
            samples.len()
        ))
    }
}

/// Assert that percentiles in a serialized statistics object never decrease
/// and stay within `[min, max]`.
pub fn assert_percentiles_ordered(stats: &Value) -> Result<(), String> {
    let min = stats["min"].as_f64().ok_or("missing min")?;
    let max = stats["max"].as_f64().ok_or("missing max")?;
    let mut previous = min;
    for pv in stats["percentiles"].as_array().ok_or("missing percentiles")? {
        let value = pv["value"].as_f64().ok_or("percentile without value")?;
        if value < previous - 1e-9 || value > max + 1e-9 {
            return Err(format!(
                "percentile {} = {} outside [{}, {}] or below previous {}",
                pv["percentile"], value, min, max, previous
            ));
        }
        previous = value;
    }
    Ok(())
}
