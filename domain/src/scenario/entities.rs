//! Scenario entity

use super::validation::ValidationReport;
use crate::aggregation::entities::AggregationConfig;
use crate::core::error::DomainError;
use crate::invocation::config::ModelInvocationConfig;
use crate::providers::Provider;
use crate::strategy::{StrategyConfig, StrategyKind};
use crate::util::slugify;
use serde::{Deserialize, Deserializer, Serialize};

/// A named, reusable multi-model execution plan (Entity)
///
/// `name` is the logical primary key in storage. Scenarios are persisted
/// secret-free: credentials are injected per run.
///
/// Missing or unrecognized fields deserialize to empty values so that
/// [`Scenario::validate`] can report every problem at once.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default, deserialize_with = "crate::util::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::util::null_as_default")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient_strategy",
        skip_serializing_if = "Option::is_none"
    )]
    pub strategy: Option<StrategyKind>,
    /// Ordered; order is the chain order for sequential scenarios
    #[serde(default, deserialize_with = "crate::util::null_as_default")]
    pub models: Vec<ModelInvocationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggregationConfig>,
}

fn lenient_strategy<'de, D>(deserializer: D) -> Result<Option<StrategyKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

impl Scenario {
    /// Seed used to initialize a new scenario
    pub fn default_template() -> Self {
        Self {
            name: "New Scenario".to_string(),
            description: String::new(),
            strategy: Some(StrategyKind::Sequential),
            models: vec![
                ModelInvocationConfig::new("Assistant", Provider::OpenAi, "gpt-3.5-turbo")
                    .with_system_prompt("")
                    .with_temperature(0.7)
                    .with_max_tokens(2000),
            ],
            aggregation: Some(AggregationConfig {
                enabled: false,
                provider: Some(Provider::OpenAi),
                model: "gpt-4".to_string(),
                credential: None,
                prompt: Some("Combine all responses into a final, coherent answer:".to_string()),
            }),
        }
    }

    /// Check the structural rules, accumulating every violation
    pub fn validate(&self) -> ValidationReport {
        ValidationReport::for_scenario(self)
    }

    /// Aggregation settings, if aggregation is switched on
    pub fn enabled_aggregation(&self) -> Option<&AggregationConfig> {
        self.aggregation.as_ref().filter(|a| a.enabled)
    }

    /// Validate and convert into an executable plan
    pub fn to_strategy_config(&self) -> Result<StrategyConfig, DomainError> {
        self.validate().into_result()?;

        let models = self.models.clone();
        match self.strategy {
            Some(StrategyKind::Sequential) => Ok(StrategyConfig::Sequential { models }),
            Some(StrategyKind::Parallel) => Ok(StrategyConfig::Parallel { models }),
            Some(other) => Err(DomainError::UnknownStrategy(other.to_string())),
            None => Err(DomainError::UnknownStrategy(String::new())),
        }
    }

    /// Copy with every model and aggregator credential cleared
    pub fn without_credentials(&self) -> Self {
        let mut scenario = self.clone();
        for model in &mut scenario.models {
            model.credential = None;
        }
        if let Some(aggregation) = &mut scenario.aggregation {
            aggregation.credential = None;
        }
        scenario
    }

    /// Suggested file name when exporting this scenario
    pub fn export_file_name(&self) -> String {
        format!("moa-scenario-{}.json", slugify(&self.name, "-"))
    }
}
