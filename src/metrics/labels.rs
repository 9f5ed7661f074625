//! Metric names and label values

/// Counter: phases that completed successfully
pub const PHASE_COMPLETED: &str = "dbping_phase_completed_total";
/// Counter: phases that failed
pub const PHASE_FAILED: &str = "dbping_phase_failed_total";
/// Counter: decoded rows written to the output sink
pub const ROWS_EMITTED: &str = "dbping_rows_emitted_total";
/// Histogram: wall-clock duration of a full run
pub const RUN_DURATION: &str = "dbping_run_duration_ms";

/// Driver resolution and configuration
pub const PHASE_SETUP: &str = "setup";
/// Connection open
pub const PHASE_OPEN: &str = "open";
/// Liveness check
pub const PHASE_VERIFY: &str = "verify";
/// Statement execution
pub const PHASE_QUERY: &str = "query";
/// Row iteration and decoding
pub const PHASE_ITERATE: &str = "iterate";
/// Cursor and connection release
pub const PHASE_CLOSE: &str = "close";

/// Run outcome: success
pub const OUTCOME_OK: &str = "ok";
/// Run outcome: failure
pub const OUTCOME_ERROR: &str = "error";
