//! Strategy configuration (tagged variants)

use super::kind::StrategyKind;
use crate::invocation::config::ModelInvocationConfig;
use crate::providers::CredentialMap;
use std::collections::BTreeMap;

/// A fully-formed execution plan for one strategy.
///
/// Each variant carries exactly the fields its strategy needs, so an
/// executor never checks for missing pieces at runtime. Build one from an
/// [`AdHocMoaConfig`](super::adhoc::AdHocMoaConfig) or a validated
/// [`Scenario`](crate::scenario::Scenario).
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyConfig {
    Parallel {
        models: Vec<ModelInvocationConfig>,
    },
    Sequential {
        models: Vec<ModelInvocationConfig>,
    },
    Voting {
        models: Vec<ModelInvocationConfig>,
        aggregator: ModelInvocationConfig,
    },
    Specialized {
        roles: BTreeMap<String, ModelInvocationConfig>,
    },
}

impl StrategyConfig {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyConfig::Parallel { .. } => StrategyKind::Parallel,
            StrategyConfig::Sequential { .. } => StrategyKind::Sequential,
            StrategyConfig::Voting { .. } => StrategyKind::Voting,
            StrategyConfig::Specialized { .. } => StrategyKind::Specialized,
        }
    }

    /// Number of underlying invocations (excluding the voting aggregator)
    pub fn model_count(&self) -> usize {
        match self {
            StrategyConfig::Parallel { models }
            | StrategyConfig::Sequential { models }
            | StrategyConfig::Voting { models, .. } => models.len(),
            StrategyConfig::Specialized { roles } => roles.len(),
        }
    }

    /// Copy of this plan with every entry's credential resolved from `credentials`
    pub fn with_injected_credentials(&self, credentials: &CredentialMap) -> Self {
        let inject = |models: &[ModelInvocationConfig]| {
            models
                .iter()
                .map(|m| m.with_injected_credential(credentials))
                .collect::<Vec<_>>()
        };

        match self {
            StrategyConfig::Parallel { models } => StrategyConfig::Parallel {
                models: inject(models),
            },
            StrategyConfig::Sequential { models } => StrategyConfig::Sequential {
                models: inject(models),
            },
            StrategyConfig::Voting { models, aggregator } => StrategyConfig::Voting {
                models: inject(models),
                aggregator: aggregator.with_injected_credential(credentials),
            },
            StrategyConfig::Specialized { roles } => StrategyConfig::Specialized {
                roles: roles
                    .iter()
                    .map(|(name, m)| (name.clone(), m.with_injected_credential(credentials)))
                    .collect(),
            },
        }
    }
}
