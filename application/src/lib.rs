//! Application layer for moa
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    model_invoker::{InvocationRequest, InvokerError, ModelInvoker},
    progress::{
        ProgressEvent, ProgressReceiver, ProgressSender, ProgressStatus, Stage, progress_channel,
    },
    run_logger::{NoRunLogger, RunEvent, RunLogger},
};
pub use use_cases::aggregate_responses::{AggregateError, ResponseAggregator};
pub use use_cases::execute_strategy::{ExecuteError, StrategyExecutor};
pub use use_cases::manage_scenarios::{CatalogError, ExportedScenario, ScenarioCatalog};
pub use use_cases::run_moa::{RunMoaError, RunMoaUseCase};
pub use use_cases::run_scenario::{RunScenarioError, RunScenarioUseCase, ScenarioRunOutput};
