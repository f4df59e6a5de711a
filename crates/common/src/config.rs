//! Common configuration types for call roster components.

use serde::{Deserialize, Serialize};

/// Default tracing filter directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "call_roster=info";

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing filter directive (e.g. "call_roster=debug")
    pub log_filter: String,
    /// Enable JSON-formatted logs
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            json_logs: false,
        }
    }
}
