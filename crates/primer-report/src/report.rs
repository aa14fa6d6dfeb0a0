//! Aggregating verdicts into a run report.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use primer_core::{Category, ExampleUnit, UnitState};
use primer_runner::{ExecutionResult, RunError};
use serde::Serialize;
use thiserror::Error;

use crate::outcome::{ReportPolicy, Verdict, classify, was_spawned};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unit '{0}' is not part of this run")]
    UnknownUnit(String),

    #[error("unit '{name}': {source}")]
    Transition {
        name: String,
        source: primer_core::CoreError,
    },
}

/// Verdict plus the captured execution for one unit.
#[derive(Debug, Clone, Serialize)]
pub struct UnitOutcome {
    pub name: String,
    pub category: Category,
    pub origin: PathBuf,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub execution: Option<ExecutionResult>,
}

impl UnitOutcome {
    #[must_use]
    pub const fn state(&self) -> UnitState {
        self.verdict.state()
    }
}

/// Counts per terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub timed_out: usize,
    pub errored: usize,
}

impl Summary {
    pub fn tally<'a>(outcomes: impl IntoIterator<Item = &'a UnitOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.total += 1;
            match outcome.state() {
                UnitState::Passed => summary.passed += 1,
                UnitState::Failed => summary.failed += 1,
                UnitState::Skipped => summary.skipped += 1,
                UnitState::TimedOut => summary.timed_out += 1,
                UnitState::Errored | UnitState::Pending | UnitState::Running => {
                    summary.errored += 1;
                }
            }
        }
        summary
    }

    /// True when nothing failed, errored or timed out.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0 && self.timed_out == 0
    }
}

/// Finished run, ordered by registry position.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub wall_time_ms: u64,
    pub summary: Summary,
    pub units: Vec<UnitOutcome>,
}

impl Report {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.summary.is_success()
    }

    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&UnitOutcome> {
        self.units.iter().find(|outcome| outcome.name == name)
    }
}

struct Slot {
    unit: Arc<ExampleUnit>,
    state: UnitState,
    outcome: Option<UnitOutcome>,
}

/// Collects results as they complete, in any order.
///
/// Every unit starts `pending`; [`Collector::record`] walks it through the
/// state machine to its terminal state and refuses to record a unit twice.
pub struct Collector {
    policy: ReportPolicy,
    started_at: DateTime<Utc>,
    started: Instant,
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl Collector {
    /// Start collecting for `units`, which fixes the report order.
    pub fn new<I>(units: I, policy: ReportPolicy) -> Self
    where
        I: IntoIterator<Item = Arc<ExampleUnit>>,
    {
        let slots: Vec<Slot> = units
            .into_iter()
            .map(|unit| Slot {
                unit,
                state: UnitState::Pending,
                outcome: None,
            })
            .collect();
        let index = slots
            .iter()
            .enumerate()
            .map(|(position, slot)| (slot.unit.name().to_string(), position))
            .collect();
        Self {
            policy,
            started_at: Utc::now(),
            started: Instant::now(),
            slots,
            index,
        }
    }

    /// Classify and store one finished run.
    pub fn record(
        &mut self,
        name: &str,
        result: &Result<ExecutionResult, RunError>,
    ) -> Result<&UnitOutcome, ReportError> {
        let position = *self
            .index
            .get(name)
            .ok_or_else(|| ReportError::UnknownUnit(name.to_string()))?;
        let slot = &mut self.slots[position];
        let verdict = classify(&slot.unit, result, self.policy);

        let transition = |state: UnitState, next| {
            state.transition(next).map_err(|source| ReportError::Transition {
                name: name.to_string(),
                source,
            })
        };
        let mut state = slot.state;
        if was_spawned(result) {
            state = transition(state, UnitState::Running)?;
        }
        state = transition(state, verdict.state())?;
        slot.state = state;

        tracing::debug!(unit = name, %state, "unit finished");
        let outcome = slot.outcome.insert(UnitOutcome {
            name: name.to_string(),
            category: slot.unit.category(),
            origin: slot.unit.origin().to_path_buf(),
            verdict,
            execution: result.as_ref().ok().cloned(),
        });
        Ok(&*outcome)
    }

    /// Number of units recorded so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.slots.iter().filter(|slot| slot.state.is_terminal()).count()
    }

    /// Close the run. Units that never reported are errored.
    #[must_use]
    pub fn finish(self) -> Report {
        let units: Vec<UnitOutcome> = self
            .slots
            .into_iter()
            .map(|slot| {
                slot.outcome.unwrap_or_else(|| {
                    tracing::warn!(unit = slot.unit.name(), "unit produced no result");
                    UnitOutcome {
                        name: slot.unit.name().to_string(),
                        category: slot.unit.category(),
                        origin: slot.unit.origin().to_path_buf(),
                        verdict: Verdict::Errored {
                            kind: "no_result".to_string(),
                            message: "the unit never reported a result".to_string(),
                        },
                        execution: None,
                    }
                })
            })
            .collect();

        Report {
            started_at: self.started_at,
            finished_at: Utc::now(),
            wall_time_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
            summary: Summary::tally(&units),
            units,
        }
    }
}
