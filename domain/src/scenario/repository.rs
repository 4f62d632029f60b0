//! Scenario repository trait

use super::entities::Scenario;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by scenario storage
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The backing store could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The scenario has no usable name to key it by
    #[error("Scenario name is required")]
    MissingName,
}

/// Repository for persisted scenarios, keyed by scenario name
///
/// Implementations live in the infrastructure layer. Stored documents never
/// carry credentials.
#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    /// Look a scenario up by name
    async fn get(&self, name: &str) -> Result<Option<Scenario>, RepositoryError>;

    /// Insert or overwrite the scenario stored under its name
    async fn put(&self, scenario: &Scenario) -> Result<(), RepositoryError>;

    /// Remove a scenario; removing an unknown name is not an error
    async fn delete(&self, name: &str) -> Result<(), RepositoryError>;

    /// All stored scenarios
    async fn list(&self) -> Result<Vec<Scenario>, RepositoryError>;
}
