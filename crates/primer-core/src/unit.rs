//! The example unit: one runnable lesson fragment.
//!
//! Units are built once while the registry loads and are never mutated
//! afterwards; every field is private and exposed through accessors.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::enums::Category;
use crate::errors::CoreError;

/// Whether a unit's output can be compared line by line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Determinism {
    #[default]
    Deterministic,
    /// The author tagged the unit `@nondeterministic`.
    Declared,
    /// The loader found a wall-clock or randomness marker in the source.
    Detected { marker: String },
}

impl Determinism {
    #[must_use]
    pub const fn is_deterministic(&self) -> bool {
        matches!(self, Self::Deterministic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleUnit {
    name: String,
    category: Category,
    language: String,
    source: String,
    expected_output: Option<Vec<String>>,
    requires_fixture: BTreeSet<PathBuf>,
    stdin: Option<String>,
    determinism: Determinism,
    origin: PathBuf,
}

impl ExampleUnit {
    /// Create a unit with no expected output, fixtures or stdin.
    ///
    /// `language` is the source file extension (`py`, `js`, `sh`, ...) and
    /// selects the interpreter at run time.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        language: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let source = source.into();
        let language = language.into();

        validate_name(&name)?;
        if source.trim().is_empty() {
            return Err(CoreError::InvalidUnit {
                name,
                reason: "source is empty".to_string(),
            });
        }
        if language.is_empty() {
            return Err(CoreError::InvalidUnit {
                name,
                reason: "language is empty".to_string(),
            });
        }

        let origin = PathBuf::from(format!("{name}.{language}"));
        Ok(Self {
            name,
            category,
            language,
            source,
            expected_output: None,
            requires_fixture: BTreeSet::new(),
            stdin: None,
            determinism: Determinism::Deterministic,
            origin,
        })
    }

    #[must_use]
    pub fn with_expected_output<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_output = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    /// Declare a file the unit expects in its working directory.
    ///
    /// The path must be relative and must not climb out of the directory.
    pub fn with_fixture(mut self, path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let escapes = path
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if path.as_os_str().is_empty() || escapes {
            return Err(CoreError::InvalidUnit {
                name: self.name,
                reason: format!(
                    "fixture '{}' must be a relative path inside the working directory",
                    path.display()
                ),
            });
        }
        self.requires_fixture.insert(path);
        Ok(self)
    }

    #[must_use]
    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    #[must_use]
    pub fn with_determinism(mut self, determinism: Determinism) -> Self {
        self.determinism = determinism;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = origin.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn expected_output(&self) -> Option<&[String]> {
        self.expected_output.as_deref()
    }

    #[must_use]
    pub const fn requires_fixture(&self) -> &BTreeSet<PathBuf> {
        &self.requires_fixture
    }

    #[must_use]
    pub fn stdin(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    #[must_use]
    pub const fn determinism(&self) -> &Determinism {
        &self.determinism
    }

    #[must_use]
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    #[must_use]
    pub const fn is_deterministic(&self) -> bool {
        self.determinism.is_deterministic()
    }

    /// True when stdout is checked line by line rather than exit status only.
    #[must_use]
    pub const fn is_comparable(&self) -> bool {
        self.expected_output.is_some() && self.determinism.is_deterministic()
    }
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    let valid_chars = name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    let starts_well = name.chars().next().is_some_and(|ch| ch.is_ascii_alphanumeric());

    if valid_chars && starts_well {
        Ok(())
    } else {
        Err(CoreError::InvalidUnit {
            name: name.to_string(),
            reason: "name must start with a letter or digit and contain only [A-Za-z0-9._-]"
                .to_string(),
        })
    }
}
