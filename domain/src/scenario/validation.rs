//! Structural validation for [`Scenario`].
//!
//! Rules (all violations are collected, never just the first):
//!
//! 1. `name` is non-empty after trimming
//! 2. `strategy` is `sequential` or `parallel`
//! 3. `models` is non-empty
//! 4. every model (1-indexed in messages) has a role, provider and model

use super::entities::Scenario;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Accumulated validation outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn for_scenario(scenario: &Scenario) -> Self {
        let mut errors = Vec::new();

        if scenario.name.trim().is_empty() {
            errors.push("Scenario name is required".to_string());
        }

        if !scenario
            .strategy
            .is_some_and(|strategy| strategy.is_scenario_strategy())
        {
            errors.push("Invalid strategy (must be sequential or parallel)".to_string());
        }

        if scenario.models.is_empty() {
            errors.push("At least one model is required".to_string());
        }

        for (index, model) in scenario.models.iter().enumerate() {
            let n = index + 1;
            if model.role.trim().is_empty() {
                errors.push(format!("Model {}: Role is required", n));
            }
            if model.provider.as_ref().is_none_or(|p| p.is_blank()) {
                errors.push(format!("Model {}: Provider is required", n));
            }
            if model.model.trim().is_empty() {
                errors.push(format!("Model {}: Model is required", n));
            }
        }

        Self::from_errors(errors)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// `Err(InvalidScenario)` carrying every message when invalid
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.valid {
            Ok(())
        } else {
            Err(DomainError::InvalidScenario(self.errors))
        }
    }
}
