//! Scenario catalog use case
//!
//! Save, load, list, delete, import and export scenarios through an
//! injected [`ScenarioRepository`]. Nothing invalid is ever written.

use moa_domain::{
    ImportError, RepositoryError, Scenario, ScenarioRepository, ValidationReport, export_json,
    import_json,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while managing scenarios
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Scenario not found: {0}")]
    NotFound(String),

    #[error("Scenario already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid scenario: {}", .0.join(", "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// An exported scenario document and its suggested file name
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedScenario {
    pub file_name: String,
    pub json: String,
}

/// Use case for managing persisted scenarios
pub struct ScenarioCatalog {
    repository: Arc<dyn ScenarioRepository>,
}

impl ScenarioCatalog {
    pub fn new(repository: Arc<dyn ScenarioRepository>) -> Self {
        Self { repository }
    }

    /// Validate, then insert or overwrite by name
    pub async fn save(&self, scenario: &Scenario) -> Result<(), CatalogError> {
        let report = scenario.validate();
        if !report.is_valid() {
            return Err(CatalogError::Invalid(report.errors));
        }
        self.repository.put(scenario).await?;
        info!("Saved scenario '{}'", scenario.name);
        Ok(())
    }

    pub async fn load(&self, name: &str) -> Result<Scenario, CatalogError> {
        self.repository
            .get(name)
            .await?
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// All scenarios, sorted by name
    pub async fn list(&self) -> Result<Vec<Scenario>, CatalogError> {
        let mut scenarios = self.repository.list().await?;
        scenarios.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("Listed {} scenarios", scenarios.len());
        Ok(scenarios)
    }

    pub async fn delete(&self, name: &str) -> Result<(), CatalogError> {
        self.repository.delete(name).await?;
        info!("Deleted scenario '{}'", name);
        Ok(())
    }

    /// Seed a new scenario from the default template and store it
    pub async fn create(&self, name: &str) -> Result<Scenario, CatalogError> {
        if self.repository.get(name).await?.is_some() {
            return Err(CatalogError::AlreadyExists(name.to_string()));
        }
        let scenario = Scenario {
            name: name.to_string(),
            ..Scenario::default_template()
        };
        self.save(&scenario).await?;
        Ok(scenario)
    }

    /// Check a scenario document without storing it
    pub fn check(&self, json: &str) -> Result<ValidationReport, CatalogError> {
        match import_json(json) {
            Ok(scenario) => Ok(scenario.validate()),
            Err(ImportError::Invalid(errors)) => Ok(ValidationReport::from_errors(errors)),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse, validate, and store a scenario document
    pub async fn import(&self, json: &str) -> Result<Scenario, CatalogError> {
        let scenario = import_json(json)?;
        self.repository.put(&scenario).await?;
        info!("Imported scenario '{}'", scenario.name);
        Ok(scenario)
    }

    pub async fn export(&self, name: &str) -> Result<ExportedScenario, CatalogError> {
        let scenario = self.load(name).await?;
        let json = export_json(&scenario).map_err(|e| CatalogError::Export(e.to_string()))?;
        Ok(ExportedScenario {
            file_name: scenario.export_file_name(),
            json,
        })
    }
}
