//! Ad-hoc MOA configuration
//!
//! The loosely-shaped, non-persisted form a caller edits before running.
//! It supports all four strategies and is only executable once its
//! strategy's "configured" predicate holds.

use super::config::StrategyConfig;
use super::kind::StrategyKind;
use crate::core::error::DomainError;
use crate::invocation::config::ModelInvocationConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum number of models (or roles) for any multi-agent strategy
pub const MIN_AGENTS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdHocMoaConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Used by parallel, sequential and voting
    #[serde(default)]
    pub models: Vec<ModelInvocationConfig>,
    /// Required only for voting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator_config: Option<ModelInvocationConfig>,
    /// Role name → agent, used only for specialized
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub agent_roles: BTreeMap<String, ModelInvocationConfig>,
}

impl AdHocMoaConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: ModelInvocationConfig) -> Self {
        self.models.push(model);
        self
    }

    pub fn with_aggregator(mut self, aggregator: ModelInvocationConfig) -> Self {
        self.aggregator_config = Some(aggregator);
        self
    }

    pub fn with_role(mut self, name: impl Into<String>, agent: ModelInvocationConfig) -> Self {
        self.agent_roles.insert(name.into(), agent);
        self
    }

    /// Reasons this config cannot run under its strategy (empty when runnable)
    pub fn configuration_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        match self.strategy {
            StrategyKind::Parallel | StrategyKind::Sequential => {
                if self.models.len() < MIN_AGENTS {
                    issues.push(format!(
                        "{} strategy requires at least {} models (found {})",
                        self.strategy,
                        MIN_AGENTS,
                        self.models.len()
                    ));
                }
            }
            StrategyKind::Voting => {
                if self.models.len() < MIN_AGENTS {
                    issues.push(format!(
                        "voting strategy requires at least {} models (found {})",
                        MIN_AGENTS,
                        self.models.len()
                    ));
                }
                if self.aggregator_config.is_none() {
                    issues.push("voting strategy requires an aggregator model".to_string());
                }
            }
            StrategyKind::Specialized => {
                if self.agent_roles.len() < MIN_AGENTS {
                    issues.push(format!(
                        "specialized strategy requires at least {} agent roles (found {})",
                        MIN_AGENTS,
                        self.agent_roles.len()
                    ));
                }
            }
        }

        issues
    }

    /// Whether this config satisfies its strategy's predicate
    pub fn is_configured(&self) -> bool {
        self.configuration_issues().is_empty()
    }

    /// Convert into the tagged execution plan.
    ///
    /// Agent roles without a `role` label inherit their map key.
    pub fn to_strategy_config(&self) -> Result<StrategyConfig, DomainError> {
        let issues = self.configuration_issues();
        if !issues.is_empty() {
            return Err(DomainError::NotConfigured(issues));
        }

        let config = match self.strategy {
            StrategyKind::Parallel => StrategyConfig::Parallel {
                models: self.models.clone(),
            },
            StrategyKind::Sequential => StrategyConfig::Sequential {
                models: self.models.clone(),
            },
            StrategyKind::Voting => {
                let aggregator = self.aggregator_config.clone().ok_or_else(|| {
                    DomainError::NotConfigured(vec![
                        "voting strategy requires an aggregator model".to_string(),
                    ])
                })?;
                StrategyConfig::Voting {
                    models: self.models.clone(),
                    aggregator,
                }
            }
            StrategyKind::Specialized => StrategyConfig::Specialized {
                roles: self
                    .agent_roles
                    .iter()
                    .map(|(name, agent)| {
                        let mut agent = agent.clone();
                        if agent.role.trim().is_empty() {
                            agent.role = name.clone();
                        }
                        (name.clone(), agent)
                    })
                    .collect(),
            },
        };

        Ok(config)
    }
}
