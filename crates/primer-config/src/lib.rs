//! # primer-config
//!
//! Layered configuration loading for primer using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PRIMER_*` prefix, `__` as separator)
//! 2. Project-level `.primer/config.toml`
//! 3. User-level `~/.config/primer/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PRIMER_RUNNER__TIMEOUT_SECS` -> `runner.timeout_secs` and
//! `PRIMER_INTERPRETERS__PY__PROGRAM` -> `interpreters.py.program`.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use primer_config::PrimerConfig;
//!
//! let config = PrimerConfig::load_for_project(Path::new(".")).expect("config");
//! println!("timeout: {:?}", config.runner.timeout());
//! ```

mod catalog;
mod error;
mod interpreter;
mod runner;

pub use catalog::CatalogConfig;
pub use error::ConfigError;
pub use interpreter::{InterpreterConfig, default_interpreters};
pub use runner::RunnerConfig;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Directory holding project-local primer state.
pub const PROJECT_DIR: &str = ".primer";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrimerConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default = "default_interpreters")]
    pub interpreters: BTreeMap<String, InterpreterConfig>,
}

impl Default for PrimerConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            runner: RunnerConfig::default(),
            interpreters: default_interpreters(),
        }
    }
}

impl PrimerConfig {
    /// Load configuration for the project rooted at the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for_project(Path::new("."))
    }

    /// Load configuration for `project_root`, reading its `.env` first.
    ///
    /// A missing `.env` is not an error.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }

        let config: Self = Self::figment_for(project_root).extract()?;
        config.runner.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain for `project_root`.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = Self::project_config_path(project_root);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("PRIMER_").split("__"))
    }

    #[must_use]
    pub fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join("config.toml")
    }

    /// Catalog root resolved against `project_root` when relative.
    #[must_use]
    pub fn catalog_root(&self, project_root: &Path) -> PathBuf {
        let root = PathBuf::from(&self.catalog.root);
        if root.is_absolute() {
            root
        } else {
            project_root.join(root)
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("primer").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_builtin_interpreters() {
        let config = PrimerConfig::default();
        assert!(config.interpreters.contains_key("py"));
        assert!(config.interpreters.contains_key("sh"));
        assert_eq!(config.catalog.root, "lessons");
        assert_eq!(config.runner.timeout_secs, 10);
    }

    #[test]
    fn catalog_root_joins_relative_paths() {
        let config = PrimerConfig::default();
        assert_eq!(
            config.catalog_root(Path::new("/work/project")),
            PathBuf::from("/work/project/lessons")
        );
    }

    #[test]
    fn catalog_root_keeps_absolute_paths() {
        let mut config = PrimerConfig::default();
        config.catalog.root = "/srv/lessons".to_string();
        assert_eq!(
            config.catalog_root(Path::new("/work/project")),
            PathBuf::from("/srv/lessons")
        );
    }
}
