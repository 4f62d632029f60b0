//! JSON export and import of scenarios.

use super::entities::Scenario;
use thiserror::Error;

/// Errors when importing a scenario document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Invalid JSON file: {0}")]
    InvalidJson(String),

    #[error("Invalid scenario: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

/// Pretty-printed JSON document for a scenario
pub fn export_json(scenario: &Scenario) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(scenario)
}

/// Parse and validate a scenario document
pub fn import_json(content: &str) -> Result<Scenario, ImportError> {
    let scenario: Scenario =
        serde_json::from_str(content).map_err(|e| ImportError::InvalidJson(e.to_string()))?;

    let report = scenario.validate();
    if !report.is_valid() {
        return Err(ImportError::Invalid(report.errors));
    }

    Ok(scenario)
}
