//! Call roster configuration.
//!
//! Configuration is loaded from environment variables with defaults for
//! everything.

use common::config::{ObservabilityConfig, DEFAULT_LOG_FILTER};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default number of video tiles.
pub const DEFAULT_GRID_CAPACITY: usize = 6;

/// Default trailing window for showing resolved join requests, in milliseconds.
pub const DEFAULT_RESOLVED_WINDOW_MS: u64 = 2_000;

/// Default call state actor mailbox size.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

/// Call roster configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum simultaneous grid tiles (default: 6, must be >= 1).
    pub grid_capacity: usize,

    /// How long resolved join requests stay visible (default: 2s).
    pub resolved_window: Duration,

    /// Call state actor mailbox size (default: 256, must be >= 1).
    pub mailbox_capacity: usize,

    /// Logging setup for binaries.
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_capacity: DEFAULT_GRID_CAPACITY,
            resolved_window: Duration::from_millis(DEFAULT_RESOLVED_WINDOW_MS),
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let grid_capacity: usize = parse_var(vars, "ROSTER_GRID_CAPACITY", DEFAULT_GRID_CAPACITY)?;
        if grid_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "ROSTER_GRID_CAPACITY must be at least 1".to_string(),
            ));
        }

        let resolved_window_ms: u64 =
            parse_var(vars, "ROSTER_RESOLVED_WINDOW_MS", DEFAULT_RESOLVED_WINDOW_MS)?;

        let mailbox_capacity: usize =
            parse_var(vars, "ROSTER_MAILBOX_CAPACITY", DEFAULT_MAILBOX_CAPACITY)?;
        if mailbox_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "ROSTER_MAILBOX_CAPACITY must be at least 1".to_string(),
            ));
        }

        let log_filter = vars
            .get("RUST_LOG")
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let json_logs = vars
            .get("ROSTER_JSON_LOGS")
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        Ok(Config {
            grid_capacity,
            resolved_window: Duration::from_millis(resolved_window_ms),
            mailbox_capacity,
            observability: ObservabilityConfig {
                log_filter,
                json_logs,
            },
        })
    }
}

fn parse_var<T: FromStr>(
    vars: &HashMap<String, String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{name}={raw}"))),
    }
}
