use std::path::{Path, PathBuf};

use primer_config::PROJECT_DIR;

/// Walk upwards from `start` until a `.primer` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::find_project_root;

    #[test]
    fn finds_project_root_in_current_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".primer")).expect(".primer should create");

        let found = find_project_root(temp.path());
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn finds_project_root_in_parent_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".primer")).expect(".primer should create");
        std::fs::create_dir_all(temp.path().join("lessons/io")).expect("nested dirs should create");

        let found = find_project_root(&temp.path().join("lessons/io"));
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn returns_none_when_not_found() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir_all(temp.path().join("a/b")).expect("nested dirs should create");

        assert!(find_project_root(&temp.path().join("a/b")).is_none());
    }
}
