//! Observability for the call roster core.
//!
//! # Metrics
//!
//! | Metric | Type | Labels | Purpose |
//! |--------|------|--------|---------|
//! | `roster_grid_participants` | Gauge | none | Participants holding a video tile |
//! | `roster_list_participants` | Gauge | none | Participants in the overflow list |
//! | `roster_partition_duration_seconds` | Histogram | none | Time spent per partition update |
//! | `roster_duplicate_participants_total` | Counter | `source` | Duplicate ids dropped at the boundary |
//! | `roster_pending_unresolved` | Gauge | none | Join requests awaiting a decision |
//! | `roster_admission_decisions_total` | Counter | `decision` | Approvals and denials applied |

pub mod metrics;

pub use metrics::{
    record_admission_decisions, record_duplicates_dropped, record_partition_duration,
    set_partition_sizes, set_pending_unresolved,
};
