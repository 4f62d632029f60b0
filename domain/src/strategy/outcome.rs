//! Strategy execution outcomes

use super::kind::StrategyKind;
use crate::invocation::result::InvocationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a voting run: the parallel answers plus the aggregator's verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingOutcome {
    /// Every underlying result, in input order (failures included)
    pub original_responses: Vec<InvocationResult>,
    /// The aggregator's synthesized answer, `None` when its call failed
    pub aggregated_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_error: Option<String>,
    /// Confidence score (0-100) found in the aggregator's prose, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    pub aggregator_provider: String,
    pub aggregator_model: String,
    pub timestamp: DateTime<Utc>,
}

/// What a strategy produced: an index-stable list or a role map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum StrategyOutcome {
    Parallel { results: Vec<InvocationResult> },
    Sequential { results: Vec<InvocationResult> },
    Voting(VotingOutcome),
    Specialized { roles: BTreeMap<String, InvocationResult> },
}

impl StrategyOutcome {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyOutcome::Parallel { .. } => StrategyKind::Parallel,
            StrategyOutcome::Sequential { .. } => StrategyKind::Sequential,
            StrategyOutcome::Voting(_) => StrategyKind::Voting,
            StrategyOutcome::Specialized { .. } => StrategyKind::Specialized,
        }
    }

    /// All per-model results, flattened (role-map entries in key order)
    pub fn results(&self) -> Vec<&InvocationResult> {
        match self {
            StrategyOutcome::Parallel { results } | StrategyOutcome::Sequential { results } => {
                results.iter().collect()
            }
            StrategyOutcome::Voting(outcome) => outcome.original_responses.iter().collect(),
            StrategyOutcome::Specialized { roles } => roles.values().collect(),
        }
    }

    /// Owned copy of the per-model results
    pub fn into_results(self) -> Vec<InvocationResult> {
        match self {
            StrategyOutcome::Parallel { results } | StrategyOutcome::Sequential { results } => {
                results
            }
            StrategyOutcome::Voting(outcome) => outcome.original_responses,
            StrategyOutcome::Specialized { roles } => roles.into_values().collect(),
        }
    }

    pub fn successful_count(&self) -> usize {
        self.results().iter().filter(|r| r.success).count()
    }
}
