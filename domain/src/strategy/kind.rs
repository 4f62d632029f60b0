//! Strategy kind enumeration

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Execution topology governing how configured models are invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// All models answer the same prompt concurrently
    #[default]
    Parallel,
    /// Models run in order, each refining the previous answer
    Sequential,
    /// Parallel answers judged by an aggregator model
    Voting,
    /// Role-specific agents with their own system prompts
    Specialized,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Parallel => "parallel",
            StrategyKind::Sequential => "sequential",
            StrategyKind::Voting => "voting",
            StrategyKind::Specialized => "specialized",
        }
    }

    /// Named scenarios only support sequential and parallel execution
    pub fn is_scenario_strategy(&self) -> bool {
        matches!(self, StrategyKind::Sequential | StrategyKind::Parallel)
    }

    pub fn all() -> [StrategyKind; 4] {
        [
            StrategyKind::Parallel,
            StrategyKind::Sequential,
            StrategyKind::Voting,
            StrategyKind::Specialized,
        ]
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parallel" => Ok(StrategyKind::Parallel),
            "sequential" => Ok(StrategyKind::Sequential),
            "voting" => Ok(StrategyKind::Voting),
            "specialized" => Ok(StrategyKind::Specialized),
            other => Err(DomainError::UnknownStrategy(other.to_string())),
        }
    }
}
