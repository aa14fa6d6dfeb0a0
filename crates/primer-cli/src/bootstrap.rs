use std::path::{Path, PathBuf};

use anyhow::Context;
use primer_config::PrimerConfig;

use crate::cli::GlobalFlags;
use crate::context;

/// Find the project root and load its layered configuration.
///
/// The project root is the nearest ancestor holding `.primer/`, searched from
/// the working directory and then from `--root`; without one, the working
/// directory is used.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<(PathBuf, PrimerConfig)> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let project_root = resolve_project_root(&cwd, flags.root.as_deref());

    let config = PrimerConfig::load_for_project(&project_root).with_context(|| {
        format!(
            "failed to load primer configuration for {}",
            project_root.display()
        )
    })?;
    Ok((project_root, config))
}

fn resolve_project_root(cwd: &Path, catalog_root: Option<&Path>) -> PathBuf {
    context::find_project_root(cwd)
        .or_else(|| catalog_root.and_then(context::find_project_root))
        .unwrap_or_else(|| cwd.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::resolve_project_root;

    #[test]
    fn falls_back_to_catalog_root_ancestors() {
        let cwd = TempDir::new().expect("tempdir should create");
        let project = TempDir::new().expect("tempdir should create");
        std::fs::create_dir_all(project.path().join(".primer")).expect("mkdir");
        std::fs::create_dir_all(project.path().join("lessons")).expect("mkdir");

        let root = resolve_project_root(cwd.path(), Some(&project.path().join("lessons")));
        assert_eq!(root, project.path());
    }

    #[test]
    fn defaults_to_working_directory() {
        let cwd = TempDir::new().expect("tempdir should create");
        assert_eq!(resolve_project_root(cwd.path(), None), cwd.path());
    }
}
