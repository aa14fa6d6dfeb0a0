use std::path::{Path, PathBuf};

use anyhow::Context;
use primer_config::PrimerConfig;
use primer_registry::{LoadOptions, Registry};
use primer_runner::Runner;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: PrimerConfig,
    pub registry: Registry,
}

impl AppContext {
    /// Load the catalog. `root_override` wins over `catalog.root`.
    pub fn init(
        project_root: &Path,
        config: PrimerConfig,
        root_override: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let catalog_root: PathBuf = root_override
            .map_or_else(|| config.catalog_root(project_root), Path::to_path_buf);
        // Fixture paths are later resolved from worker tasks; keep them absolute.
        let catalog_root = std::path::absolute(&catalog_root)
            .with_context(|| format!("invalid catalog root {}", catalog_root.display()))?;
        tracing::debug!(
            project = %project_root.display(),
            catalog = %catalog_root.display(),
            "loading catalog"
        );

        let mut options = LoadOptions {
            fixtures_dir: config.catalog.fixtures_dir.clone(),
            ..LoadOptions::default()
        };
        options.extensions.extend(config.interpreters.keys().cloned());

        let registry = Registry::load_with(&catalog_root, &options).with_context(|| {
            format!("failed to load catalog at {}", catalog_root.display())
        })?;

        Ok(Self { config, registry })
    }

    /// Runner wired to this catalog's fixtures and the configured interpreters.
    #[must_use]
    pub fn runner(&self) -> Runner {
        Runner::from_config(&self.config)
            .with_fixtures_dir(self.registry.fixtures_dir().map(Path::to_path_buf))
    }
}
