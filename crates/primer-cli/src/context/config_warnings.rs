use primer_config::PrimerConfig;

/// Warn about env keys that look like config but miss the `__` separator.
pub fn warn_unconfigured(config: &PrimerConfig) {
    for warning in collect_warnings(config, std::env::vars().map(|(key, _)| key)) {
        tracing::warn!("{warning}");
    }
}

fn collect_warnings<I>(config: &PrimerConfig, env_keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let keys = env_keys.into_iter().collect::<Vec<_>>();
    let mut warnings = Vec::new();

    for (section, example) in [
        ("RUNNER", "PRIMER_RUNNER__TIMEOUT_SECS"),
        ("CATALOG", "PRIMER_CATALOG__ROOT"),
        ("INTERPRETERS", "PRIMER_INTERPRETERS__PY__PROGRAM"),
    ] {
        let single = format!("PRIMER_{section}_");
        let double = format!("PRIMER_{section}__");
        if keys
            .iter()
            .any(|key| key.starts_with(&single) && !key.starts_with(&double))
        {
            warnings.push(format!(
                "PRIMER_{section}_* env vars are ignored. Use double underscores (example: {example})."
            ));
        }
    }

    if config.runner.concurrency > 256 {
        warnings.push(format!(
            "runner.concurrency = {} starts that many interpreters at once",
            config.runner.concurrency
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use primer_config::PrimerConfig;

    use super::collect_warnings;

    #[test]
    fn flags_single_underscore_section_keys() {
        let warnings = collect_warnings(
            &PrimerConfig::default(),
            ["PRIMER_RUNNER_TIMEOUT_SECS".to_string()],
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("PRIMER_RUNNER__TIMEOUT_SECS"));
    }

    #[test]
    fn correct_keys_are_quiet() {
        let warnings = collect_warnings(
            &PrimerConfig::default(),
            [
                "PRIMER_RUNNER__TIMEOUT_SECS".to_string(),
                "PRIMER_LOG".to_string(),
                "PATH".to_string(),
            ],
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn huge_concurrency_is_flagged() {
        let mut config = PrimerConfig::default();
        config.runner.concurrency = 1000;
        let warnings = collect_warnings(&config, Vec::new());
        assert_eq!(warnings.len(), 1);
    }
}
