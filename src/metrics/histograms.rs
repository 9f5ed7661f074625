//! Histogram helpers

use super::labels;

/// Record total run duration in milliseconds
pub fn run_duration(driver: &str, outcome: &'static str, duration_ms: u64) {
    metrics::histogram!(
        labels::RUN_DURATION,
        "driver" => driver.to_string(),
        "outcome" => outcome
    )
    .record(duration_ms as f64);
}
