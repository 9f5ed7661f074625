//! Metrics for harness runs
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! embedding application installs a recorder.

pub mod counters;
pub mod histograms;
pub mod labels;
