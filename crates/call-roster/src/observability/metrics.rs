//! Metrics definitions for the call roster core.
//!
//! All metrics follow Prometheus naming conventions:
//! - `roster_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `decision`: 2 values (approved, denied)
//! - `source`: 2 values (roster, join_requests)
//!
//! No exporter is installed here; the embedding process owns the recorder.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

// ============================================================================
// Layout Metrics
// ============================================================================

/// Set the current grid and overflow list sizes.
///
/// Metrics: `roster_grid_participants`, `roster_list_participants`
/// Labels: none
// usize to f64 conversion is safe for realistic call sizes
#[allow(clippy::cast_precision_loss)]
pub fn set_partition_sizes(grid: usize, list: usize) {
    gauge!("roster_grid_participants").set(grid as f64);
    gauge!("roster_list_participants").set(list as f64);
}

/// Record how long one partition update took.
///
/// Metric: `roster_partition_duration_seconds`
/// Labels: none
pub fn record_partition_duration(duration: Duration) {
    histogram!("roster_partition_duration_seconds").record(duration.as_secs_f64());
}

/// Count records dropped because their id was already present.
///
/// Metric: `roster_duplicate_participants_total`
/// Labels: `source` (roster, join_requests)
pub fn record_duplicates_dropped(source: &'static str, count: usize) {
    counter!("roster_duplicate_participants_total", "source" => source)
        .increment(u64::try_from(count).unwrap_or(u64::MAX));
}

// ============================================================================
// Admission Metrics
// ============================================================================

/// Set the number of join requests awaiting a decision.
///
/// Metric: `roster_pending_unresolved`
/// Labels: none
#[allow(clippy::cast_precision_loss)]
pub fn set_pending_unresolved(count: usize) {
    gauge!("roster_pending_unresolved").set(count as f64);
}

/// Count moderator decisions applied to join requests.
///
/// Metric: `roster_admission_decisions_total`
/// Labels: `decision` (approved, denied)
pub fn record_admission_decisions(decision: &'static str, count: usize) {
    counter!("roster_admission_decisions_total", "decision" => decision)
        .increment(u64::try_from(count).unwrap_or(u64::MAX));
}
