//! Tracker configuration — immutable for the lifetime of one tracker.

use serde::{Deserialize, Serialize};

/// Default collection endpoint for local development.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000/api/v1/tracking/collect";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Tracking API key identifying the workspace events belong to.
    pub api_key: String,
    /// Collection endpoint URL.
    pub endpoint: String,
    /// Bound on each outbound request, in seconds.
    pub timeout_secs: u64,
    /// Echo outgoing payloads and raw responses through `tracing`.
    pub debug: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debug: false,
        }
    }
}

impl TrackerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
