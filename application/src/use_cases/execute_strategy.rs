//! Strategy execution use case
//!
//! Runs a set of configured models according to a [`StrategyConfig`]:
//!
//! - **Parallel**: every model gets the same prompt concurrently; failures
//!   stay in their own result slot and the list keeps input order.
//! - **Sequential**: models run in order, each receiving the previous
//!   model's answer; the chain stops at the first failure.
//! - **Voting**: a parallel run judged by a single aggregator call.
//! - **Specialized**: each role answers with its own instructions prepended.

use crate::ports::model_invoker::{InvocationRequest, ModelInvoker};
use crate::ports::progress::{ProgressSender, ProgressStatus, Stage};
use chrono::Utc;
use futures::future::join_all;
use moa_domain::{
    ChatMessage, InvocationResult, ModelInvocationConfig, PromptTemplate, StrategyConfig,
    StrategyOutcome, VotingOutcome, parse_confidence_score, successful,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that stop a strategy from producing a coherent outcome
///
/// Partial failure is not an error: it is reported inside the results.
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("No models configured")]
    NoModels,

    /// Every underlying model of a voting run failed, so there was nothing
    /// to hand to the aggregator
    #[error("All models failed to respond")]
    AllModelsFailed { results: Vec<InvocationResult> },

    /// A sequential chain stopped; `results` holds the successful prefix
    /// followed by the failing entry
    #[error("Sequential chain stopped at step {step} ({role}): {error}")]
    ChainBroken {
        step: usize,
        role: String,
        error: String,
        results: Vec<InvocationResult>,
    },
}

impl ExecuteError {
    /// Results gathered before the failure
    pub fn partial_results(&self) -> &[InvocationResult] {
        match self {
            ExecuteError::NoModels => &[],
            ExecuteError::AllModelsFailed { results } | ExecuteError::ChainBroken { results, .. } => {
                results
            }
        }
    }
}

/// Use case for executing a strategy against a model invoker
pub struct StrategyExecutor<I: ModelInvoker + 'static> {
    invoker: Arc<I>,
    progress: ProgressSender,
}

impl<I: ModelInvoker + 'static> StrategyExecutor<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self {
            invoker,
            progress: ProgressSender::disabled(),
        }
    }

    /// Publish per-model progress events to `progress`
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = progress;
        self
    }

    pub async fn execute(
        &self,
        config: &StrategyConfig,
        prompt: &str,
    ) -> Result<StrategyOutcome, ExecuteError> {
        if config.model_count() == 0 {
            return Err(ExecuteError::NoModels);
        }

        info!(
            "Executing {} strategy with {} models",
            config.kind(),
            config.model_count()
        );

        let outcome = match config {
            StrategyConfig::Parallel { models } => StrategyOutcome::Parallel {
                results: self.parallel(models, prompt).await,
            },
            StrategyConfig::Sequential { models } => StrategyOutcome::Sequential {
                results: self.sequential(models, prompt).await?,
            },
            StrategyConfig::Voting { models, aggregator } => {
                StrategyOutcome::Voting(self.voting(models, aggregator, prompt).await?)
            }
            StrategyConfig::Specialized { roles } => StrategyOutcome::Specialized {
                roles: self.specialized(roles, prompt).await,
            },
        };

        Ok(outcome)
    }

    /// Invoke one model with its own isolated message list.
    ///
    /// Never fails: an invoker error becomes a result with `success: false`.
    pub async fn invoke_model(&self, config: &ModelInvocationConfig, prompt: &str) -> InvocationResult {
        self.invoke_messages(config, config.messages_for(prompt)).await
    }

    /// Same prompt to every model concurrently; results in input order
    pub async fn parallel(
        &self,
        models: &[ModelInvocationConfig],
        prompt: &str,
    ) -> Vec<InvocationResult> {
        let total = models.len();
        let calls = models.iter().enumerate().map(|(i, config)| {
            self.invoke_tracked(i + 1, total, config, config.messages_for(prompt))
        });

        let results = join_all(calls).await;

        info!(
            "Parallel run finished: {}/{} models succeeded",
            successful(&results).count(),
            total
        );
        results
    }

    /// Chain the models in order, stopping at the first failure
    pub async fn sequential(
        &self,
        models: &[ModelInvocationConfig],
        prompt: &str,
    ) -> Result<Vec<InvocationResult>, ExecuteError> {
        let total = models.len();
        let mut results = Vec::with_capacity(total);
        let mut current = prompt.to_string();

        for (i, config) in models.iter().enumerate() {
            let step = i + 1;
            let result = self
                .invoke_tracked(step, total, config, config.messages_for(&current))
                .await;

            if result.success {
                current = PromptTemplate::sequential_context(
                    &config.role,
                    result.text().unwrap_or_default(),
                );
                results.push(result);
                continue;
            }

            let error = result.error.clone().unwrap_or_default();
            warn!(
                "Sequential chain stopped at step {}/{} ({}): {}",
                step, total, config.role, error
            );
            results.push(result);
            return Err(ExecuteError::ChainBroken {
                step,
                role: config.role.clone(),
                error,
                results,
            });
        }

        Ok(results)
    }

    /// Parallel run, then one aggregator call over the successful answers
    pub async fn voting(
        &self,
        models: &[ModelInvocationConfig],
        aggregator: &ModelInvocationConfig,
        prompt: &str,
    ) -> Result<VotingOutcome, ExecuteError> {
        let results = self.parallel(models, prompt).await;

        let successes: Vec<&InvocationResult> = successful(&results).collect();
        if successes.is_empty() {
            warn!("Voting skipped: all {} models failed", results.len());
            return Err(ExecuteError::AllModelsFailed { results });
        }

        self.progress.stage(
            Stage::Aggregation,
            ProgressStatus::Running,
            format!("Voting over {} responses", successes.len()),
        );
        let voting_prompt = PromptTemplate::voting_prompt(prompt, &successes);
        let verdict = self
            .invoke_messages(aggregator, aggregator.messages_for(&voting_prompt))
            .await;

        let (aggregated_response, aggregation_error) = if verdict.success {
            self.progress
                .stage(Stage::Aggregation, ProgressStatus::Completed, "Voting complete");
            (verdict.response, None)
        } else {
            warn!("Voting aggregator failed, returning raw responses");
            self.progress.stage(
                Stage::Aggregation,
                ProgressStatus::Failed,
                verdict.error.as_deref().unwrap_or("Aggregator failed"),
            );
            (None, verdict.error)
        };
        let confidence = aggregated_response
            .as_deref()
            .and_then(parse_confidence_score);

        Ok(VotingOutcome {
            original_responses: results,
            aggregated_response,
            aggregation_error,
            confidence,
            aggregator_provider: aggregator.provider_label().to_string(),
            aggregator_model: aggregator.model.clone(),
            timestamp: Utc::now(),
        })
    }

    /// Every role concurrently, each with its own instructions prepended
    pub async fn specialized(
        &self,
        roles: &BTreeMap<String, ModelInvocationConfig>,
        prompt: &str,
    ) -> BTreeMap<String, InvocationResult> {
        let total = roles.len();
        let calls = roles.iter().enumerate().map(|(i, (name, config))| async move {
            let mut config = config.clone();
            if config.role.trim().is_empty() {
                config.role = name.clone();
            }
            let user_prompt =
                PromptTemplate::specialized_prompt(config.effective_system_prompt(), prompt);
            let result = self
                .invoke_tracked(i + 1, total, &config, vec![ChatMessage::user(user_prompt)])
                .await;
            (name.clone(), result)
        });

        join_all(calls).await.into_iter().collect()
    }

    async fn invoke_tracked(
        &self,
        step: usize,
        total: usize,
        config: &ModelInvocationConfig,
        messages: Vec<ChatMessage>,
    ) -> InvocationResult {
        self.progress
            .model(step, total, &config.role, ProgressStatus::Running, None);

        let result = self.invoke_messages(config, messages).await;

        let status = if result.success {
            ProgressStatus::Completed
        } else {
            ProgressStatus::Failed
        };
        self.progress
            .model(step, total, &config.role, status, result.error.clone());
        result
    }

    async fn invoke_messages(
        &self,
        config: &ModelInvocationConfig,
        messages: Vec<ChatMessage>,
    ) -> InvocationResult {
        let outcome = match InvocationRequest::from_config(config, messages) {
            Ok(request) => self.invoker.invoke(request).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(text) => {
                debug!("Model {} ({}) responded", config.role, config.model);
                InvocationResult::success(config, text)
            }
            Err(e) => {
                warn!("Model {} ({}) failed: {}", config.role, config.model, e);
                InvocationResult::failure(config, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::{ProgressEvent, progress_channel};
    use crate::use_cases::testing::ScriptedInvoker;
    use moa_domain::{MessageRole, Provider};

    fn model(role: &str, model: &str) -> ModelInvocationConfig {
        ModelInvocationConfig::new(role, Provider::OpenAi, model)
    }

    fn executor(invoker: &Arc<ScriptedInvoker>) -> StrategyExecutor<ScriptedInvoker> {
        StrategyExecutor::new(Arc::clone(invoker))
    }

    #[tokio::test]
    async fn test_parallel_isolates_failures_and_keeps_order() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("m1", "one")
                .fail("m2", "rate limited")
                .reply("m3", "three")
                .fail("m4", "timeout"),
        );
        let models = vec![
            model("A", "m1"),
            model("B", "m2"),
            model("C", "m3"),
            model("D", "m4"),
        ];

        let results = executor(&invoker).parallel(&models, "question").await;

        assert_eq!(results.len(), 4);
        let roles: Vec<_> = results.iter().map(|r| r.role.as_str()).collect();
        assert_eq!(roles, ["A", "B", "C", "D"]);

        assert_eq!(results[0].text(), Some("one"));
        assert_eq!(results[2].text(), Some("three"));
        assert!(!results[1].success);
        assert_eq!(
            results[1].error.as_deref(),
            Some("Request failed: rate limited")
        );
        assert!(results[1].response.is_none());
        assert_eq!(results[3].error.as_deref(), Some("Request failed: timeout"));
    }

    #[tokio::test]
    async fn test_parallel_all_failed_is_not_an_error() {
        let invoker = Arc::new(ScriptedInvoker::new().fail("m1", "x").fail("m2", "y"));
        let config = StrategyConfig::Parallel {
            models: vec![model("A", "m1"), model("B", "m2")],
        };

        let outcome = executor(&invoker).execute(&config, "q").await.unwrap();
        assert_eq!(outcome.results().len(), 2);
        assert_eq!(outcome.successful_count(), 0);
    }

    #[tokio::test]
    async fn test_parallel_sends_same_prompt_with_own_system_prompt() {
        let invoker = Arc::new(ScriptedInvoker::new().reply("m1", "a").reply("m2", "b"));
        let models = vec![
            model("A", "m1").with_system_prompt("Be terse."),
            model("B", "m2"),
        ];

        executor(&invoker).parallel(&models, "shared").await;

        let first_calls = invoker.calls_for("m1");
        let first = &first_calls[0];
        assert_eq!(first.messages.len(), 2);
        assert_eq!(first.messages[0].role, MessageRole::System);
        assert_eq!(first.messages[0].content, "Be terse.");
        assert_eq!(first.user_prompt(), "shared");

        let second_calls = invoker.calls_for("m2");
        let second = &second_calls[0];
        assert_eq!(second.messages.len(), 1);
        assert_eq!(second.user_prompt(), "shared");
    }

    #[tokio::test]
    async fn test_sequential_stops_at_first_failure() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("m1", "draft")
                .fail("m2", "overloaded")
                .reply("m3", "never"),
        );
        let config = StrategyConfig::Sequential {
            models: vec![model("A", "m1"), model("B", "m2"), model("C", "m3")],
        };

        let err = executor(&invoker).execute(&config, "q").await.unwrap_err();

        match &err {
            ExecuteError::ChainBroken { step, role, results, .. } => {
                assert_eq!(*step, 2);
                assert_eq!(role, "B");
                assert_eq!(results.len(), 2);
                assert!(results[0].success);
                assert!(!results[1].success);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.partial_results().len(), 2);
        assert!(invoker.calls_for("m3").is_empty());
    }

    #[tokio::test]
    async fn test_sequential_passes_previous_response() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("m1", "first answer")
                .reply("m2", "second answer")
                .reply("m3", "final"),
        );
        let models = vec![model("Drafter", "m1"), model("Editor", "m2"), model("Polisher", "m3")];

        let results = executor(&invoker).sequential(&models, "topic").await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(invoker.calls_for("m1")[0].user_prompt(), "topic");
        assert!(
            invoker.calls_for("m2")[0]
                .user_prompt()
                .contains("Previous step (Drafter):\nfirst answer")
        );
        assert!(
            invoker.calls_for("m3")[0]
                .user_prompt()
                .contains("Previous step (Editor):\nsecond answer")
        );
    }

    #[tokio::test]
    async fn test_sequential_coder_reviewer_chain() {
        let code = "function reverse(s){return s.split('').reverse().join('')}";
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("gpt-4", code)
                .reply("claude-3-sonnet", "Looks good."),
        );
        let config = StrategyConfig::Sequential {
            models: vec![
                ModelInvocationConfig::new("Coder", Provider::OpenAi, "gpt-4"),
                ModelInvocationConfig::new("Reviewer", Provider::Claude, "claude-3-sonnet"),
            ],
        };

        executor(&invoker)
            .execute(&config, "Write a function to reverse a string.")
            .await
            .unwrap();

        let reviewer_prompt = invoker.calls_for("claude-3-sonnet")[0]
            .user_prompt()
            .to_string();
        assert!(reviewer_prompt.contains("Previous step (Coder):\nfunction reverse(s)"));
        assert!(reviewer_prompt.ends_with("Now complete your task based on this."));
    }

    #[tokio::test]
    async fn test_voting_all_failed_skips_aggregator() {
        let invoker = Arc::new(ScriptedInvoker::new().fail("m1", "a").fail("m2", "b"));
        let config = StrategyConfig::Voting {
            models: vec![model("A", "m1"), model("B", "m2")],
            aggregator: model("Judge", "judge"),
        };

        let err = executor(&invoker).execute(&config, "q").await.unwrap_err();

        assert!(matches!(err, ExecuteError::AllModelsFailed { .. }));
        assert_eq!(err.partial_results().len(), 2);
        assert!(invoker.calls_for("judge").is_empty());
    }

    #[tokio::test]
    async fn test_voting_with_one_failure() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("m1", "Use a loop.")
                .fail("m2", "quota exceeded")
                .reply("m3", "Use recursion.")
                .reply("judge", "## Best Answer\nUse a loop.\n\nConfidence: 80/100"),
        );
        let config = StrategyConfig::Voting {
            models: vec![model("A", "m1"), model("B", "m2"), model("C", "m3")],
            aggregator: model("Judge", "judge"),
        };

        let outcome = executor(&invoker).execute(&config, "How?").await.unwrap();

        let StrategyOutcome::Voting(voting) = outcome else {
            panic!("expected a voting outcome");
        };
        assert_eq!(voting.original_responses.len(), 3);
        assert!(!voting.original_responses[1].success);
        assert!(voting.aggregated_response.as_deref().unwrap().contains("Use a loop."));
        assert_eq!(voting.confidence, Some(80));

        let judge_prompt = invoker.calls_for("judge")[0].user_prompt().to_string();
        assert!(judge_prompt.contains("Use recursion."));
        assert!(!judge_prompt.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_voting_aggregator_failure_keeps_responses() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("m1", "a")
                .reply("m2", "b")
                .fail("judge", "down"),
        );

        let voting = executor(&invoker)
            .voting(
                &[model("A", "m1"), model("B", "m2")],
                &model("Judge", "judge"),
                "q",
            )
            .await
            .unwrap();

        assert_eq!(voting.original_responses.len(), 2);
        assert!(voting.aggregated_response.is_none());
        assert_eq!(voting.aggregation_error.as_deref(), Some("Request failed: down"));
        assert!(voting.confidence.is_none());
    }

    #[tokio::test]
    async fn test_voting_reports_aggregation_stage_status() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("m1", "a")
                .fail("judge", "down"),
        );
        let (sender, mut rx) = progress_channel();

        executor(&invoker)
            .with_progress(sender)
            .voting(&[model("A", "m1")], &model("Judge", "judge"), "q")
            .await
            .unwrap();

        let mut stages = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let ProgressEvent::Stage { stage, status, message } = event {
                stages.push((stage, status, message));
            }
        }
        assert_eq!(
            stages,
            [
                (
                    Stage::Aggregation,
                    ProgressStatus::Running,
                    "Voting over 1 responses".to_string()
                ),
                (
                    Stage::Aggregation,
                    ProgressStatus::Failed,
                    "Request failed: down".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_specialized_prepends_role_instructions() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("sec", "no issues")
                .reply("perf", "fast enough"),
        );
        let mut roles = BTreeMap::new();
        roles.insert(
            "security".to_string(),
            ModelInvocationConfig {
                provider: Some(Provider::OpenAi),
                model: "sec".to_string(),
                system_prompt: Some("Audit for vulnerabilities.".to_string()),
                ..Default::default()
            },
        );
        roles.insert("performance".to_string(), model("Perf", "perf"));

        let results = executor(&invoker).specialized(&roles, "Review this code").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results["security"].role, "security");
        assert_eq!(results["performance"].text(), Some("fast enough"));

        let security_calls = invoker.calls_for("sec");
        let security_call = &security_calls[0];
        assert_eq!(security_call.messages.len(), 1);
        assert_eq!(
            security_call.user_prompt(),
            "Audit for vulnerabilities.\n\nReview this code"
        );
        assert_eq!(invoker.calls_for("perf")[0].user_prompt(), "Review this code");
    }

    #[tokio::test]
    async fn test_missing_provider_becomes_failed_result() {
        let invoker = Arc::new(ScriptedInvoker::new());
        let config = ModelInvocationConfig {
            role: "Ghost".to_string(),
            model: "m1".to_string(),
            ..Default::default()
        };

        let result = executor(&invoker).invoke_model(&config, "q").await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Provider is required"));
        assert!(invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_plan_is_rejected() {
        let invoker = Arc::new(ScriptedInvoker::new());
        let config = StrategyConfig::Parallel { models: vec![] };
        let err = executor(&invoker).execute(&config, "q").await.unwrap_err();
        assert!(matches!(err, ExecuteError::NoModels));
    }

    #[tokio::test]
    async fn test_progress_events_per_model() {
        let invoker = Arc::new(ScriptedInvoker::new().reply("m1", "ok").fail("m2", "bad"));
        let (sender, mut rx) = progress_channel();
        let executor = executor(&invoker).with_progress(sender);

        let _ = executor
            .sequential(&[model("A", "m1"), model("B", "m2")], "q")
            .await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[3],
            ProgressEvent::Model {
                step: 2,
                total: 2,
                role: "B".to_string(),
                status: ProgressStatus::Failed,
                error: Some("Request failed: bad".to_string()),
            }
        );
    }
}
