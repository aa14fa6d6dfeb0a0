//! Runner configuration: time budget, concurrency, environment pass-through.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default per-unit time budget in seconds.
const fn default_timeout_secs() -> u64 {
    10
}

fn default_passthrough_env() -> Vec<String> {
    ["PATH", "LANG", "LC_ALL", "SYSTEMROOT"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Per-unit time budget in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum units running at once. `0` means available parallelism.
    #[serde(default)]
    pub concurrency: usize,

    /// Report timed-out units as skipped instead of failing the run.
    #[serde(default)]
    pub timeouts_as_skipped: bool,

    /// Variables copied from the harness environment into every child.
    /// Everything else is cleared.
    #[serde(default = "default_passthrough_env")]
    pub passthrough_env: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrency: 0,
            timeouts_as_skipped: false,
            passthrough_env: default_passthrough_env(),
        }
    }
}

impl RunnerConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve `concurrency = 0` to the machine's available parallelism.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        if self.concurrency > 0 {
            return self.concurrency;
        }
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "runner.timeout_secs".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}
