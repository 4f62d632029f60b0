//! Scenario domain
//!
//! A scenario is a named, persisted plan (sequential or parallel) over an
//! ordered list of models, with optional aggregation.

pub mod builder;
pub mod entities;
pub mod repository;
pub mod run_state;
pub mod transfer;
pub mod validation;

pub use builder::ScenarioBuilder;
pub use entities::Scenario;
pub use repository::{RepositoryError, ScenarioRepository};
pub use run_state::RunState;
pub use transfer::{ImportError, export_json, import_json};
pub use validation::ValidationReport;
