//! Run Scenario use case
//!
//! Binds per-run credentials into a saved scenario, executes its strategy,
//! and optionally aggregates the answers. Aggregation failure never fails
//! the run.

use super::aggregate_responses::ResponseAggregator;
use super::execute_strategy::{ExecuteError, StrategyExecutor};
use crate::ports::model_invoker::ModelInvoker;
use crate::ports::progress::{ProgressSender, ProgressStatus, Stage};
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use chrono::{DateTime, Utc};
use moa_domain::{
    AggregationResult, CredentialMap, DomainError, InvocationResult, RunState, Scenario,
    StrategyKind,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that fail a scenario run
#[derive(Error, Debug)]
pub enum RunScenarioError {
    /// The scenario did not pass validation; nothing was invoked
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecuteError),
}

/// Result of one scenario run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRunOutput {
    pub scenario_name: String,
    pub strategy: StrategyKind,
    pub individual_results: Vec<InvocationResult>,
    /// `None` when aggregation is disabled or failed
    pub aggregated_result: Option<AggregationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_error: Option<String>,
    pub state: RunState,
    pub timestamp: DateTime<Utc>,
}

impl ScenarioRunOutput {
    pub fn aggregated_text(&self) -> Option<&str> {
        self.aggregated_result
            .as_ref()
            .and_then(|a| a.aggregated_text.as_deref())
    }
}

/// Use case for running saved scenarios
pub struct RunScenarioUseCase<I: ModelInvoker + 'static> {
    executor: StrategyExecutor<I>,
    aggregator: ResponseAggregator<I>,
    progress: ProgressSender,
    logger: Arc<dyn RunLogger>,
}

impl<I: ModelInvoker + 'static> RunScenarioUseCase<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self {
            executor: StrategyExecutor::new(Arc::clone(&invoker)),
            aggregator: ResponseAggregator::new(invoker),
            progress: ProgressSender::disabled(),
            logger: Arc::new(NoRunLogger),
        }
    }

    /// Publish stage and per-model progress to `progress`
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.executor = self.executor.with_progress(progress.clone());
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run one scenario against `prompt` with the caller's credentials
    pub async fn execute(
        &self,
        scenario: &Scenario,
        prompt: &str,
        credentials: &CredentialMap,
    ) -> Result<ScenarioRunOutput, RunScenarioError> {
        let mut state = RunState::Pending;

        let plan = scenario
            .to_strategy_config()?
            .with_injected_credentials(credentials);
        let strategy = plan.kind();

        advance(&mut state, RunState::Executing);
        info!("Running scenario '{}' ({})", scenario.name, strategy);
        self.progress.stage(
            Stage::Execution,
            ProgressStatus::Running,
            format!(
                "Executing {} strategy with {} models",
                strategy,
                plan.model_count()
            ),
        );

        let outcome = match self.executor.execute(&plan, prompt).await {
            Ok(outcome) => outcome,
            Err(e) => {
                advance(&mut state, RunState::Error);
                warn!("Scenario '{}' failed: {}", scenario.name, e);
                self.progress
                    .stage(Stage::Error, ProgressStatus::Failed, e.to_string());
                self.log_results(&scenario.name, e.partial_results());
                self.logger.log(RunEvent::new(
                    "run_failed",
                    json!({ "scenario": scenario.name, "error": e.to_string() }),
                ));
                return Err(e.into());
            }
        };
        let individual_results = outcome.into_results();
        self.log_results(&scenario.name, &individual_results);
        self.progress.stage(
            Stage::Execution,
            ProgressStatus::Completed,
            format!(
                "{} of {} models responded",
                individual_results.iter().filter(|r| r.success).count(),
                individual_results.len()
            ),
        );

        let mut aggregated_result = None;
        let mut aggregation_error = None;

        if let Some(aggregation) = scenario.enabled_aggregation() {
            advance(&mut state, RunState::Aggregating);
            self.progress.stage(
                Stage::Aggregation,
                ProgressStatus::Running,
                "Aggregating responses",
            );

            let aggregation = aggregation.with_injected_credential(credentials);
            match self
                .aggregator
                .aggregate(&individual_results, &aggregation, prompt)
                .await
            {
                Ok(result) => {
                    self.progress.stage(
                        Stage::Aggregation,
                        ProgressStatus::Completed,
                        "Aggregation complete",
                    );
                    if let Some(result) = &result {
                        self.logger.log(RunEvent::new(
                            "aggregation_result",
                            json!({
                                "scenario": scenario.name,
                                "provider": result.provider,
                                "model": result.model,
                                "text": result.aggregated_text,
                            }),
                        ));
                    }
                    aggregated_result = result;
                }
                Err(e) => {
                    warn!("Aggregation failed for '{}': {}", scenario.name, e);
                    self.progress
                        .stage(Stage::Aggregation, ProgressStatus::Failed, e.to_string());
                    self.logger.log(RunEvent::new(
                        "aggregation_failed",
                        json!({ "scenario": scenario.name, "error": e.to_string() }),
                    ));
                    aggregation_error = Some(e.to_string());
                }
            }
        }

        advance(&mut state, RunState::Done);
        self.logger.log(RunEvent::new(
            "run_completed",
            json!({
                "scenario": scenario.name,
                "strategy": strategy.as_str(),
                "succeeded": individual_results.iter().filter(|r| r.success).count(),
                "total": individual_results.len(),
                "aggregated": aggregated_result.is_some(),
            }),
        ));

        Ok(ScenarioRunOutput {
            scenario_name: scenario.name.clone(),
            strategy,
            individual_results,
            aggregated_result,
            aggregation_error,
            state,
            timestamp: Utc::now(),
        })
    }

    /// Run several scenarios one after another.
    ///
    /// A failing scenario is reported and skipped; the successful outputs
    /// are returned in input order.
    pub async fn execute_many(
        &self,
        scenarios: &[Scenario],
        prompt: &str,
        credentials: &CredentialMap,
    ) -> Vec<ScenarioRunOutput> {
        let total = scenarios.len();
        let mut outputs = Vec::with_capacity(total);

        for (i, scenario) in scenarios.iter().enumerate() {
            let index = i + 1;
            self.progress
                .scenario(index, total, &scenario.name, ProgressStatus::Running, None);

            match self.execute(scenario, prompt, credentials).await {
                Ok(output) => {
                    self.progress.scenario(
                        index,
                        total,
                        &scenario.name,
                        ProgressStatus::Completed,
                        None,
                    );
                    outputs.push(output);
                }
                Err(e) => {
                    warn!("Scenario {}/{} '{}' failed: {}", index, total, scenario.name, e);
                    self.progress.scenario(
                        index,
                        total,
                        &scenario.name,
                        ProgressStatus::Failed,
                        Some(e.to_string()),
                    );
                }
            }
        }

        outputs
    }

    fn log_results(&self, scenario: &str, results: &[InvocationResult]) {
        for result in results {
            self.logger.log(RunEvent::new(
                "invocation_result",
                json!({
                    "scenario": scenario,
                    "role": result.role,
                    "provider": result.provider,
                    "model": result.model,
                    "success": result.success,
                    "response": result.response,
                    "error": result.error,
                }),
            ));
        }
    }
}

fn advance(state: &mut RunState, next: RunState) {
    if !state.can_transition_to(next) {
        warn!("Unexpected run state transition {} -> {}", state, next);
    }
    debug!("Run state {} -> {}", state, next);
    *state = next;
}
