//! Run MOA use case
//!
//! Executes a non-persisted [`AdHocMoaConfig`], which may use any of the
//! four strategies. The config must satisfy its strategy's predicate before
//! anything is invoked.

use super::execute_strategy::{ExecuteError, StrategyExecutor};
use crate::ports::model_invoker::ModelInvoker;
use crate::ports::progress::ProgressSender;
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use moa_domain::{AdHocMoaConfig, CredentialMap, DomainError, StrategyOutcome};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during an ad-hoc MOA run
#[derive(Error, Debug)]
pub enum RunMoaError {
    #[error(transparent)]
    NotConfigured(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecuteError),
}

/// Use case for running ad-hoc MOA configurations
pub struct RunMoaUseCase<I: ModelInvoker + 'static> {
    executor: StrategyExecutor<I>,
    logger: Arc<dyn RunLogger>,
}

impl<I: ModelInvoker + 'static> RunMoaUseCase<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self {
            executor: StrategyExecutor::new(invoker),
            logger: Arc::new(NoRunLogger),
        }
    }

    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.executor = self.executor.with_progress(progress);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn execute(
        &self,
        config: &AdHocMoaConfig,
        prompt: &str,
        credentials: &CredentialMap,
    ) -> Result<StrategyOutcome, RunMoaError> {
        let plan = config
            .to_strategy_config()?
            .with_injected_credentials(credentials);

        info!("Running ad-hoc {} MOA", plan.kind());
        let outcome = self.executor.execute(&plan, prompt).await?;

        for result in outcome.results() {
            self.logger.log(RunEvent::new(
                "invocation_result",
                json!({
                    "role": result.role,
                    "provider": result.provider,
                    "model": result.model,
                    "success": result.success,
                    "response": result.response,
                    "error": result.error,
                }),
            ));
        }
        if let StrategyOutcome::Voting(voting) = &outcome {
            let event_type = if voting.aggregated_response.is_some() {
                "aggregation_result"
            } else {
                "aggregation_failed"
            };
            self.logger.log(RunEvent::new(
                event_type,
                json!({
                    "provider": voting.aggregator_provider,
                    "model": voting.aggregator_model,
                    "text": voting.aggregated_response,
                    "error": voting.aggregation_error,
                    "confidence": voting.confidence,
                }),
            ));
        }
        self.logger.log(RunEvent::new(
            "run_completed",
            json!({
                "strategy": outcome.kind().as_str(),
                "succeeded": outcome.successful_count(),
                "total": outcome.results().len(),
            }),
        ));

        Ok(outcome)
    }
}
