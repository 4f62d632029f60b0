//! Lifecycle of a single scenario run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a scenario run currently is
///
/// ```text
/// Pending -> Executing -> Aggregating -> Done
///               |             |
///               +--> Error    +--> Done (aggregation failure is non-fatal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Pending,
    Executing,
    Aggregating,
    Done,
    Error,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Pending => "pending",
            RunState::Executing => "executing",
            RunState::Aggregating => "aggregating",
            RunState::Done => "done",
            RunState::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Error)
    }

    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Pending, RunState::Executing)
                | (RunState::Executing, RunState::Aggregating)
                | (RunState::Executing, RunState::Done)
                | (RunState::Executing, RunState::Error)
                | (RunState::Aggregating, RunState::Done)
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(RunState::Pending.can_transition_to(RunState::Executing));
        assert!(RunState::Executing.can_transition_to(RunState::Aggregating));
        assert!(RunState::Aggregating.can_transition_to(RunState::Done));
        assert!(RunState::Executing.can_transition_to(RunState::Done));
    }

    #[test]
    fn test_aggregation_never_errors_the_run() {
        assert!(!RunState::Aggregating.can_transition_to(RunState::Error));
    }

    #[test]
    fn test_terminal_states() {
        assert!(RunState::Done.is_terminal());
        assert!(RunState::Error.is_terminal());
        assert!(!RunState::Done.can_transition_to(RunState::Executing));
        assert!(!RunState::Pending.is_terminal());
    }
}
