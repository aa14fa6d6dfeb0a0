//! Private per-run directory.
//!
//! ```text
//! primer-XXXXXX/
//!   unit.<ext>     the unit source, outside the working directory
//!   work/          working directory and HOME; fixtures are staged here
//!   tmp/           TMPDIR
//! ```
//!
//! The whole tree is a [`TempDir`] and disappears when the sandbox drops.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use primer_core::ExampleUnit;
use tempfile::TempDir;

pub struct Sandbox {
    dir: TempDir,
    work: PathBuf,
    tmp: PathBuf,
}

impl Sandbox {
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("primer-").tempdir()?;
        let work = dir.path().join("work");
        let tmp = dir.path().join("tmp");
        fs::create_dir(&work)?;
        fs::create_dir(&tmp)?;
        Ok(Self { dir, work, tmp })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp
    }

    /// Write the unit source next to (not inside) the working directory.
    pub fn write_script(&self, unit: &ExampleUnit) -> io::Result<PathBuf> {
        let path = self.dir.path().join(format!("unit.{}", unit.language()));
        fs::write(&path, unit.source())?;
        Ok(path)
    }

    /// Copy every declared fixture that exists under `fixtures_dir` into the
    /// working directory. Absent fixtures are left for [`Self::missing_fixture`].
    pub fn stage_fixtures(&self, unit: &ExampleUnit, fixtures_dir: Option<&Path>) -> io::Result<()> {
        let Some(fixtures_dir) = fixtures_dir else {
            return Ok(());
        };

        for relative in unit.requires_fixture() {
            let source = fixtures_dir.join(relative);
            let target = self.work.join(relative);
            if source.is_file() {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(&source, &target)?;
                tracing::debug!(unit = unit.name(), fixture = %relative.display(), "staged fixture");
            } else if source.is_dir() {
                copy_dir(&source, &target)?;
                tracing::debug!(unit = unit.name(), fixture = %relative.display(), "staged fixture directory");
            }
        }
        Ok(())
    }

    /// First declared fixture not present in the working directory.
    pub fn missing_fixture<'a>(&self, unit: &'a ExampleUnit) -> Option<&'a PathBuf> {
        unit.requires_fixture()
            .iter()
            .find(|relative| !self.work.join(relative).exists())
    }

    /// Remove the sandbox, reporting cleanup failures instead of ignoring them.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}

fn copy_dir(source: &Path, target: &Path) -> io::Result<()> {
    fs::create_dir_all(target)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let destination = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &destination)?;
        } else {
            fs::copy(entry.path(), destination)?;
        }
    }
    Ok(())
}
