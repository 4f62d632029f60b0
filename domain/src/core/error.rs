//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No models configured")]
    NoModels,

    #[error("All models failed to respond")]
    AllModelsFailed,

    #[error("Invalid scenario: {}", .0.join(", "))]
    InvalidScenario(Vec<String>),

    #[error("MOA configuration incomplete: {}", .0.join(", "))]
    NotConfigured(Vec<String>),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
}

impl DomainError {
    /// The accumulated human-readable reasons, if this is a configuration error
    pub fn reasons(&self) -> &[String] {
        match self {
            DomainError::InvalidScenario(errors) | DomainError::NotConfigured(errors) => errors,
            _ => &[],
        }
    }
}
