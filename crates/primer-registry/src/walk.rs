//! Catalog walker.
//!
//! Uses the `ignore` crate with standard filters off (lessons are often
//! git-ignored scratch material) but hidden entries skipped, so `.primer/`
//! and editor state never turn into units. Entries are sorted by path so the
//! registry's insertion order is stable across machines.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::LoadError;

const SKIPPED_DIRS: [&str; 3] = ["__pycache__", "node_modules", "target"];

/// Collect unit source files under `root`, in sorted path order.
///
/// The top-level `fixtures_dir` is excluded, as are files whose extension is
/// not in `extensions`.
pub fn unit_files(
    root: &Path,
    fixtures_dir: &str,
    extensions: &BTreeSet<String>,
) -> Result<Vec<PathBuf>, LoadError> {
    let fixtures = root.join(fixtures_dir);
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(true)
        .sort_by_file_path(|a: &Path, b: &Path| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|kind| kind.is_dir());
            if !is_dir {
                return true;
            }
            if entry.path() == fixtures {
                return false;
            }
            !entry
                .file_name()
                .to_str()
                .is_some_and(|name| SKIPPED_DIRS.contains(&name))
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(ext));
        if matches {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
