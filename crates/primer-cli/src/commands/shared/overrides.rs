use std::time::Duration;

use primer_config::RunnerConfig;

/// Per-unit timeout: `--timeout` if given, else `runner.timeout_secs`.
#[must_use]
pub fn effective_timeout(local: Option<u64>, config: &RunnerConfig) -> Duration {
    local.map_or_else(|| config.timeout(), Duration::from_secs)
}

/// Worker count: `--concurrency` if given, else `runner.concurrency`.
#[must_use]
pub fn effective_concurrency(local: Option<u64>, config: &RunnerConfig) -> usize {
    local
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or_else(|| config.effective_concurrency())
        .max(1)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use primer_config::RunnerConfig;

    use super::{effective_concurrency, effective_timeout};

    #[test]
    fn flag_takes_precedence() {
        let config = RunnerConfig::default();
        assert_eq!(effective_timeout(Some(3), &config), Duration::from_secs(3));
        assert_eq!(effective_concurrency(Some(2), &config), 2);
    }

    #[test]
    fn config_used_when_flag_missing() {
        let config = RunnerConfig {
            timeout_secs: 7,
            concurrency: 5,
            ..RunnerConfig::default()
        };
        assert_eq!(effective_timeout(None, &config), Duration::from_secs(7));
        assert_eq!(effective_concurrency(None, &config), 5);
    }

    #[test]
    fn zero_concurrency_means_available_parallelism() {
        let config = RunnerConfig::default();
        assert!(effective_concurrency(None, &config) >= 1);
    }
}
