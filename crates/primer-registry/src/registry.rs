//! The in-memory unit registry.
//!
//! Built once at startup, read-only afterwards. Units are held behind `Arc` so
//! the runner's worker tasks can share them without copying sources.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use primer_core::{Category, Determinism, ExampleUnit};

use crate::determinism::detect_marker;
use crate::directives::{self, Directives};
use crate::error::{LoadError, RegistryError};
use crate::walk;

/// Options for [`Registry::load_with`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directory under the root that holds fixtures. Never scanned for units.
    pub fixtures_dir: String,
    /// Source extensions recognized as units.
    pub extensions: BTreeSet<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            fixtures_dir: "fixtures".to_string(),
            extensions: ["py", "js", "mjs", "ts", "sh", "rb"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    root: Option<PathBuf>,
    fixtures_dir: Option<PathBuf>,
    units: Vec<Arc<ExampleUnit>>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Load every unit under `source_root` with default options.
    pub fn load(source_root: &Path) -> Result<Self, LoadError> {
        Self::load_with(source_root, &LoadOptions::default())
    }

    /// Load every unit under `source_root`.
    ///
    /// Fails on the first duplicate name, empty source or malformed header.
    pub fn load_with(source_root: &Path, options: &LoadOptions) -> Result<Self, LoadError> {
        if !source_root.is_dir() {
            return Err(LoadError::MissingRoot(source_root.to_path_buf()));
        }

        let files = walk::unit_files(source_root, &options.fixtures_dir, &options.extensions)?;
        let mut registry = Self {
            root: Some(source_root.to_path_buf()),
            ..Self::default()
        };

        for path in files {
            let relative = path.strip_prefix(source_root).unwrap_or(&path).to_path_buf();
            let source = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let unit = build_unit(&relative, source)?;
            tracing::debug!(
                unit = unit.name(),
                category = %unit.category(),
                origin = %relative.display(),
                "loaded unit"
            );
            registry.insert(unit)?;
        }

        let fixtures = source_root.join(&options.fixtures_dir);
        if fixtures.is_dir() {
            registry.fixtures_dir = Some(fixtures);
        }

        tracing::info!(
            units = registry.len(),
            root = %source_root.display(),
            "registry loaded"
        );
        Ok(registry)
    }

    /// Build a registry from units constructed in code.
    pub fn from_units<I>(units: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = ExampleUnit>,
    {
        let mut registry = Self::default();
        for unit in units {
            registry.insert(unit)?;
        }
        Ok(registry)
    }

    /// Use `dir` as the fixture source for units built with [`Self::from_units`].
    #[must_use]
    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = Some(dir.into());
        self
    }

    fn insert(&mut self, unit: ExampleUnit) -> Result<(), LoadError> {
        if let Some(&existing) = self.index.get(unit.name()) {
            return Err(LoadError::DuplicateName {
                name: unit.name().to_string(),
                first: self.units[existing].origin().to_path_buf(),
                second: unit.origin().to_path_buf(),
            });
        }
        self.index.insert(unit.name().to_string(), self.units.len());
        self.units.push(Arc::new(unit));
        Ok(())
    }

    /// Look up a unit by name.
    pub fn get(&self, name: &str) -> Result<&Arc<ExampleUnit>, RegistryError> {
        self.index
            .get(name)
            .map(|&position| &self.units[position])
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Units in insertion order, optionally restricted to one category.
    ///
    /// The returned iterator is lazy and `Clone`, so it can be restarted.
    #[must_use]
    pub fn list(&self, category: Option<Category>) -> Units<'_> {
        Units {
            inner: self.units.iter(),
            category,
        }
    }

    /// Insertion position of `name`, used to order reports.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    #[must_use]
    pub fn fixtures_dir(&self) -> Option<&Path> {
        self.fixtures_dir.as_deref()
    }
}

/// Lazy, restartable view over registry units.
#[derive(Debug, Clone)]
pub struct Units<'a> {
    inner: std::slice::Iter<'a, Arc<ExampleUnit>>,
    category: Option<Category>,
}

impl<'a> Iterator for Units<'a> {
    type Item = &'a Arc<ExampleUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        let category = self.category;
        self.inner
            .find(|unit| category.is_none_or(|wanted| unit.category() == wanted))
    }
}

fn build_unit(relative: &Path, source: String) -> Result<ExampleUnit, LoadError> {
    let language = relative
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string();
    let Some(prefix) = directives::comment_prefix(&language) else {
        return Err(LoadError::Directive {
            path: relative.to_path_buf(),
            line: 0,
            message: format!("no comment syntax known for '.{language}' files"),
        });
    };

    let parsed = directives::parse(&source, prefix).map_err(|error| LoadError::Directive {
        path: relative.to_path_buf(),
        line: error.line,
        message: error.message,
    })?;

    let name = parsed.name.clone().unwrap_or_else(|| default_name(relative));
    if !directives::has_body(&source, &parsed) {
        return Err(LoadError::EmptySource {
            name,
            path: relative.to_path_buf(),
        });
    }

    let category = resolve_category(relative, &parsed)?;
    let determinism = resolve_determinism(&name, &language, &source, &parsed);
    let invalid = |source| LoadError::InvalidUnit {
        path: relative.to_path_buf(),
        source,
    };

    let mut unit = ExampleUnit::new(name, category, language, source)
        .map_err(invalid)?
        .with_origin(relative)
        .with_determinism(determinism);

    if let Some(lines) = parsed.expect {
        unit = unit.with_expected_output(lines);
    }
    if let Some(lines) = parsed.stdin {
        let mut input = lines.join("\n");
        input.push('\n');
        unit = unit.with_stdin(input);
    }
    for fixture in parsed.fixtures {
        unit = unit.with_fixture(fixture).map_err(invalid)?;
    }
    Ok(unit)
}

/// File stem, lowercased, with `_` replaced by `-`.
fn default_name(relative: &Path) -> String {
    relative
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
        .replace('_', "-")
}

/// Explicit `@category`, else the top-level directory the file sits under.
fn resolve_category(relative: &Path, parsed: &Directives) -> Result<Category, LoadError> {
    let directive_error = |message: String| LoadError::Directive {
        path: relative.to_path_buf(),
        line: 0,
        message,
    };

    if let Some(raw) = &parsed.category {
        return raw
            .parse()
            .map_err(|error: primer_core::CoreError| directive_error(error.to_string()));
    }

    let mut components = relative.components();
    let top = components.next();
    let has_parent = components.next().is_some();
    let Some(dir) = top.filter(|_| has_parent) else {
        return Err(directive_error(
            "no @category and the file is not inside a category directory".to_string(),
        ));
    };
    let dir = dir.as_os_str().to_string_lossy();
    dir.parse().map_err(|error: primer_core::CoreError| {
        directive_error(format!("directory does not name a category: {error}"))
    })
}

fn resolve_determinism(name: &str, language: &str, source: &str, parsed: &Directives) -> Determinism {
    if parsed.nondeterministic {
        return Determinism::Declared;
    }
    if parsed.deterministic || parsed.expect.is_none() {
        return Determinism::Deterministic;
    }
    match detect_marker(language, source) {
        Some(marker) => {
            tracing::warn!(
                unit = name,
                %marker,
                "unit declares expected output but looks non-deterministic; output will not be compared"
            );
            Determinism::Detected { marker }
        }
        None => Determinism::Deterministic,
    }
}
