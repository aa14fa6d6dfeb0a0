//! Turning one run into a verdict.

use primer_core::{Determinism, ExampleUnit, UnitState};
use primer_runner::{ExecutionResult, ExitStatus, RunError};
use serde::Serialize;

use crate::compare::{Divergence, compare};

/// Knobs that change how runs are classified.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPolicy {
    /// Count timeouts as skipped instead of failing the run.
    pub timeouts_as_skipped: bool,
}

/// Why a unit that ran was not compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    NoExpectedOutput,
    DeclaredNondeterministic,
    DetectedNondeterministic { marker: String },
    TimedOut,
}

impl SkipReason {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::NoExpectedOutput => "no expected output".to_string(),
            Self::DeclaredNondeterministic => "declared nondeterministic".to_string(),
            Self::DetectedNondeterministic { marker } => {
                format!("nondeterministic ({marker})")
            }
            Self::TimedOut => "timed out".to_string(),
        }
    }
}

/// Final verdict for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed { divergence: Divergence },
    Skipped { skip: SkipReason },
    TimedOut,
    Errored { kind: String, message: String },
}

impl Verdict {
    /// Terminal state this verdict puts the unit in.
    #[must_use]
    pub const fn state(&self) -> UnitState {
        match self {
            Self::Passed => UnitState::Passed,
            Self::Failed { .. } => UnitState::Failed,
            Self::Skipped { .. } => UnitState::Skipped,
            Self::TimedOut => UnitState::TimedOut,
            Self::Errored { .. } => UnitState::Errored,
        }
    }

    /// One-line explanation for tables and `run-one`.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Passed => String::new(),
            Self::Failed { divergence } => divergence.to_string(),
            Self::Skipped { skip } => skip.describe(),
            Self::TimedOut => "killed after timeout".to_string(),
            Self::Errored { message, .. } => message.clone(),
        }
    }

    fn errored(kind: &str, message: impl Into<String>) -> Self {
        Self::Errored {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

/// Whether the child process was started for this result.
///
/// Decides between `pending -> errored` and `pending -> running -> ...`.
#[must_use]
pub const fn was_spawned(result: &Result<ExecutionResult, RunError>) -> bool {
    matches!(result, Ok(_) | Err(RunError::Io { .. }))
}

/// Classify a finished run.
#[must_use]
pub fn classify(
    unit: &ExampleUnit,
    result: &Result<ExecutionResult, RunError>,
    policy: ReportPolicy,
) -> Verdict {
    let execution = match result {
        Ok(execution) => execution,
        Err(error) => return Verdict::errored(error.kind(), error.to_string()),
    };

    match execution.exit_status {
        ExitStatus::Success => {}
        ExitStatus::TimedOut if policy.timeouts_as_skipped => {
            return Verdict::Skipped {
                skip: SkipReason::TimedOut,
            };
        }
        ExitStatus::TimedOut => return Verdict::TimedOut,
        ExitStatus::Cancelled => return Verdict::errored("cancelled", "cancelled while running"),
        ExitStatus::Failure { code, signal } => {
            let mut message = match (code, signal) {
                (Some(code), _) => format!("exited with code {code}"),
                (None, Some(signal)) => format!("killed by signal {signal}"),
                (None, None) => "exited abnormally".to_string(),
            };
            if let Some(last) = execution.stderr.lines().rev().find(|line| !line.trim().is_empty()) {
                message.push_str(": ");
                message.push_str(last.trim());
            }
            return Verdict::errored("exit", message);
        }
    }

    match unit.determinism() {
        Determinism::Deterministic => {}
        Determinism::Declared => {
            return Verdict::Skipped {
                skip: SkipReason::DeclaredNondeterministic,
            };
        }
        Determinism::Detected { marker } => {
            return Verdict::Skipped {
                skip: SkipReason::DetectedNondeterministic {
                    marker: marker.clone(),
                },
            };
        }
    }

    let Some(expected) = unit.expected_output() else {
        return Verdict::Skipped {
            skip: SkipReason::NoExpectedOutput,
        };
    };
    match compare(expected, &execution.stdout) {
        None => Verdict::Passed,
        Some(divergence) => Verdict::Failed { divergence },
    }
}
