//! Category tags and the per-unit run state machine.
//!
//! Category values serialize in kebab-case (`control-flow`, `error-handling`),
//! the same spelling used by `@category` directives and `--category` flags.
//! [`UnitState`] provides `allowed_next_states()` so the runner and reporter
//! can refuse transitions out of a terminal state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Lesson topic a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ControlFlow,
    DataStructures,
    Functions,
    Oop,
    ErrorHandling,
    Io,
    TextProcessing,
    Serialization,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::ControlFlow,
        Self::DataStructures,
        Self::Functions,
        Self::Oop,
        Self::ErrorHandling,
        Self::Io,
        Self::TextProcessing,
        Self::Serialization,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ControlFlow => "control-flow",
            Self::DataStructures => "data-structures",
            Self::Functions => "functions",
            Self::Oop => "oop",
            Self::ErrorHandling => "error-handling",
            Self::Io => "io",
            Self::TextProcessing => "text-processing",
            Self::Serialization => "serialization",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Accepts the kebab-case name, or the same name with `_` separators.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownCategory(raw.to_string()))
    }
}

// ---------------------------------------------------------------------------
// UnitState
// ---------------------------------------------------------------------------

/// State of a single unit run.
///
/// ```text
/// pending → running → passed
///                   → failed
///                   → timed_out
///                   → errored
///                   → skipped
/// pending → errored   (failed before the child was spawned)
/// ```
///
/// There are no retries: running a unit again starts a fresh `pending` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Pending,
    Running,
    Passed,
    Failed,
    TimedOut,
    Errored,
    Skipped,
}

impl UnitState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Running, Self::Errored],
            Self::Running => &[
                Self::Passed,
                Self::Failed,
                Self::TimedOut,
                Self::Errored,
                Self::Skipped,
            ],
            Self::Passed | Self::Failed | Self::TimedOut | Self::Errored | Self::Skipped => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Move to `next`, or report the illegal transition.
    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_next_states().is_empty()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
            Self::Errored => "errored",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("control-flow", Category::ControlFlow)]
    #[case("data_structures", Category::DataStructures)]
    #[case("OOP", Category::Oop)]
    #[case(" text-processing ", Category::TextProcessing)]
    fn category_parses_spellings(#[case] raw: &str, #[case] expected: Category) {
        assert_eq!(raw.parse::<Category>().expect("category should parse"), expected);
    }

    #[test]
    fn category_rejects_unknown() {
        let err = "networking".parse::<Category>().expect_err("should fail");
        assert!(err.to_string().contains("networking"));
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_string(&Category::ErrorHandling).expect("serialize");
        assert_eq!(json, "\"error-handling\"");
    }

    #[test]
    fn category_display_matches_as_str() {
        for category in Category::ALL {
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn pending_moves_to_running_or_errored_only() {
        assert!(UnitState::Pending.can_transition_to(UnitState::Running));
        assert!(UnitState::Pending.can_transition_to(UnitState::Errored));
        assert!(!UnitState::Pending.can_transition_to(UnitState::Passed));
    }

    #[test]
    fn terminal_states_have_no_successors() {
        for state in [
            UnitState::Passed,
            UnitState::Failed,
            UnitState::TimedOut,
            UnitState::Errored,
            UnitState::Skipped,
        ] {
            assert!(state.is_terminal(), "{state} should be terminal");
            assert!(state.transition(UnitState::Running).is_err());
        }
    }

    #[test]
    fn running_reaches_every_terminal_state() {
        for next in [
            UnitState::Passed,
            UnitState::Failed,
            UnitState::TimedOut,
            UnitState::Errored,
            UnitState::Skipped,
        ] {
            assert_eq!(UnitState::Running.transition(next).expect("allowed"), next);
        }
    }

    #[test]
    fn state_serializes_snake_case() {
        let json = serde_json::to_string(&UnitState::TimedOut).expect("serialize");
        assert_eq!(json, "\"timed_out\"");
    }
}
