use std::path::PathBuf;

use thiserror::Error;

/// Per-unit run failures. None of these abort the harness.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("unit '{unit}' requires fixture '{path}' which is not available")]
    MissingFixture { unit: String, path: PathBuf },
    #[error("no interpreter configured for '.{language}' (unit '{unit}')")]
    NoInterpreter { unit: String, language: String },
    #[error("failed to prepare sandbox for unit '{unit}': {source}")]
    Sandbox {
        unit: String,
        source: std::io::Error,
    },
    #[error("failed to spawn '{program}' for unit '{unit}': {source}")]
    Spawn {
        unit: String,
        program: String,
        source: std::io::Error,
    },
    #[error("failed while waiting on unit '{unit}': {source}")]
    Io {
        unit: String,
        source: std::io::Error,
    },
    #[error("unit '{unit}' was cancelled before it started")]
    Cancelled { unit: String },
}

impl RunError {
    /// Short machine-readable kind, used in reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingFixture { .. } => "missing_fixture",
            Self::NoInterpreter { .. } => "no_interpreter",
            Self::Sandbox { .. } => "sandbox",
            Self::Spawn { .. } => "spawn",
            Self::Io { .. } => "io",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}
