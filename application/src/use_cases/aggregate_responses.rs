//! Response aggregation use case
//!
//! Sends every successful answer, labeled and separated, to a designated
//! aggregator model and returns its consolidated answer.

use crate::ports::model_invoker::{InvocationRequest, InvokerError, ModelInvoker};
use moa_domain::{
    AggregationConfig, AggregationResult, ChatMessage, InvocationResult, PromptTemplate,
    successful,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during aggregation
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("No successful responses to aggregate")]
    NothingToAggregate,

    #[error("Aggregation failed: {0}")]
    Invoker(#[from] InvokerError),
}

/// Use case for synthesizing model answers into one
pub struct ResponseAggregator<I: ModelInvoker + 'static> {
    invoker: Arc<I>,
}

impl<I: ModelInvoker + 'static> ResponseAggregator<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self { invoker }
    }

    /// Aggregate `results` with the configured model.
    ///
    /// Returns `Ok(None)` when aggregation is disabled. Errors propagate;
    /// callers decide whether they are fatal.
    pub async fn aggregate(
        &self,
        results: &[InvocationResult],
        config: &AggregationConfig,
        original_prompt: &str,
    ) -> Result<Option<AggregationResult>, AggregateError> {
        if !config.enabled {
            return Ok(None);
        }

        let successes: Vec<&InvocationResult> = successful(results).collect();
        if successes.is_empty() {
            return Err(AggregateError::NothingToAggregate);
        }

        let prompt =
            PromptTemplate::aggregation_prompt(config.instruction(), original_prompt, &successes);
        let aggregator = config.invocation_config();
        let request = InvocationRequest::from_config(&aggregator, vec![ChatMessage::user(prompt)])?;

        info!(
            "Aggregating {} responses with {} ({})",
            successes.len(),
            aggregator.provider_label(),
            aggregator.model
        );

        let text = self.invoker.invoke(request).await?;

        Ok(Some(AggregationResult::new(
            text,
            aggregator.provider_label(),
            &aggregator.model,
        )))
    }
}
