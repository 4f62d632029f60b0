//! Fluent construction of validated scenarios.

use super::entities::Scenario;
use crate::aggregation::entities::AggregationConfig;
use crate::core::error::DomainError;
use crate::invocation::config::ModelInvocationConfig;
use crate::strategy::StrategyKind;

/// Builder for [`Scenario`]; `build` runs the full validation
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    scenario: Scenario,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scenario: Scenario {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.scenario.description = description.into();
        self
    }

    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.scenario.strategy = Some(strategy);
        self
    }

    pub fn sequential(self) -> Self {
        self.strategy(StrategyKind::Sequential)
    }

    pub fn parallel(self) -> Self {
        self.strategy(StrategyKind::Parallel)
    }

    pub fn model(mut self, model: ModelInvocationConfig) -> Self {
        self.scenario.models.push(model);
        self
    }

    pub fn aggregation(mut self, aggregation: AggregationConfig) -> Self {
        self.scenario.aggregation = Some(aggregation);
        self
    }

    pub fn build(self) -> Result<Scenario, DomainError> {
        self.scenario.validate().into_result()?;
        Ok(self.scenario)
    }
}
