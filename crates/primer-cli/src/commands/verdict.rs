use primer_core::UnitState;
use primer_report::UnitOutcome;

/// Table row shared by `run-one` and `run-all`.
pub fn outcome_row(outcome: &UnitOutcome) -> Vec<String> {
    vec![
        outcome.name.clone(),
        outcome.category.to_string(),
        outcome.state().to_string(),
        outcome.execution.as_ref().map_or_else(
            || "-".to_string(),
            |execution| execution.duration.as_millis().to_string(),
        ),
        outcome.verdict.detail(),
    ]
}

pub const OUTCOME_HEADERS: &[&str] = &["unit", "category", "verdict", "ms", "detail"];

/// Passed and skipped units do not fail a run.
#[must_use]
pub const fn is_acceptable(state: UnitState) -> bool {
    matches!(state, UnitState::Passed | UnitState::Skipped)
}
