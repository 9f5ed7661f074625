//! Counter helpers

use super::labels;

/// Record a completed phase
pub fn phase_completed(driver: &str, phase: &'static str) {
    metrics::counter!(
        labels::PHASE_COMPLETED,
        "driver" => driver.to_string(),
        "phase" => phase
    )
    .increment(1);
}

/// Record a failed phase
pub fn phase_failed(driver: &str, phase: &'static str) {
    metrics::counter!(
        labels::PHASE_FAILED,
        "driver" => driver.to_string(),
        "phase" => phase
    )
    .increment(1);
}

/// Record rows written to the output sink
pub fn rows_emitted(driver: &str, count: u64) {
    metrics::counter!(labels::ROWS_EMITTED, "driver" => driver.to_string()).increment(count);
}
