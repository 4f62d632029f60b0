//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod aggregate_responses;
pub mod execute_strategy;
pub mod manage_scenarios;
pub mod run_moa;
pub mod run_scenario;
#[cfg(test)]
pub(crate) mod testing;
