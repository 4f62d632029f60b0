//! Domain layer for moa
//!
//! This crate contains the core business logic, entities, and value objects
//! of Mixture-of-Agents orchestration. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Strategies
//!
//! A prompt is fanned out to several configured models:
//!
//! - **Parallel**: every model answers the same prompt concurrently
//! - **Sequential**: each model refines the previous model's answer
//! - **Voting**: parallel answers judged by an aggregator model
//! - **Specialized**: each role answers with its own system prompt
//!
//! ## Aggregation
//!
//! Individual answers are combined into one, either by an aggregator model
//! or by deterministic text heuristics (scoring, merging, consensus).
//!
//! ## Scenarios
//!
//! Named, persisted plans that can be validated, exported, and re-run.

pub mod aggregation;
pub mod config;
pub mod core;
pub mod invocation;
pub mod prompt;
pub mod providers;
pub mod scenario;
pub mod strategy;
pub mod util;

// Re-export commonly used types
pub use aggregation::{
    AggregationConfig, AggregationResult, MergeMethod, ResponseComparison, UniquePoints,
    analyze_response, calculate_consensus, compare_responses, find_best_response,
    merge_responses, parse_confidence_score, simple_aggregation,
};
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    message::{ChatMessage, MessageRole},
};
pub use invocation::{
    config::ModelInvocationConfig,
    result::{InvocationResult, successful},
};
pub use prompt::PromptTemplate;
pub use providers::{Credential, CredentialMap, Provider};
pub use scenario::{
    ImportError, RepositoryError, RunState, Scenario, ScenarioBuilder, ScenarioRepository,
    ValidationReport, export_json, import_json,
};
pub use strategy::{AdHocMoaConfig, StrategyConfig, StrategyKind, StrategyOutcome, VotingOutcome};
