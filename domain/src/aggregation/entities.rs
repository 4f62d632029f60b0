//! Aggregation configuration and result types

use crate::invocation::config::ModelInvocationConfig;
use crate::providers::{Credential, CredentialMap, Provider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Instruction used when a scenario does not supply its own
pub const DEFAULT_AGGREGATION_INSTRUCTION: &str =
    "Combine and synthesize the following responses into a single, coherent, and comprehensive answer:";

/// Role label attached to the aggregator's invocation
pub const AGGREGATOR_ROLE: &str = "Aggregator";

/// Optional synthesis step of a scenario
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationConfig {
    #[serde(default, deserialize_with = "crate::util::null_as_default")]
    pub enabled: bool,
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default, deserialize_with = "crate::util::null_as_default")]
    pub model: String,
    #[serde(skip)]
    pub credential: Option<Credential>,
    /// Instruction template placed at the top of the aggregation prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl AggregationConfig {
    pub fn enabled(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            enabled: true,
            provider: Some(provider),
            model: model.into(),
            credential: None,
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// The configured instruction, or the default when blank
    pub fn instruction(&self) -> &str {
        self.prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_AGGREGATION_INSTRUCTION)
    }

    /// The aggregator as a plain invocation config
    pub fn invocation_config(&self) -> ModelInvocationConfig {
        ModelInvocationConfig {
            role: AGGREGATOR_ROLE.to_string(),
            provider: self.provider.clone(),
            model: self.model.clone(),
            credential: self.credential.clone(),
            ..Default::default()
        }
    }

    pub fn with_injected_credential(&self, credentials: &CredentialMap) -> Self {
        let mut copy = self.clone();
        if let Some(provider) = &self.provider
            && let Some(credential) = credentials.credential_for(provider)
        {
            copy.credential = Some(credential);
        }
        copy
    }
}

/// Outcome of the synthesis step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub aggregated_text: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub provider: String,
    pub model: String,
}

impl AggregationResult {
    pub fn new(
        text: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            aggregated_text: Some(text.into()),
            timestamp: Utc::now(),
            provider: provider.into(),
            model: model.into(),
        }
    }
}
