use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems found while building the registry.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("catalog root '{0}' is not a directory")]
    MissingRoot(PathBuf),
    #[error("io error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("catalog walk failed: {0}")]
    Walk(#[from] ignore::Error),
    #[error("{path}:{line}: {message}")]
    Directive {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("duplicate unit name '{name}' in '{first}' and '{second}'")]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("unit '{name}' in '{path}' has no source to run")]
    EmptySource { name: String, path: PathBuf },
    #[error("invalid unit in '{path}': {source}")]
    InvalidUnit {
        path: PathBuf,
        source: primer_core::CoreError,
    },
}

/// Lookup failures. Never fatal to the harness.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unit not found: {0}")]
    NotFound(String),
}
