//! Model invocation configuration

use crate::core::message::ChatMessage;
use crate::providers::{Credential, CredentialMap, Provider};
use serde::{Deserialize, Serialize};

/// One configured backend call (Value Object)
///
/// Serialized with camelCase keys so persisted scenario documents keep
/// their `systemPrompt` / `maxTokens` spelling. The credential is never
/// serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInvocationConfig {
    /// Display label, e.g. "Reviewer"
    #[serde(default, deserialize_with = "crate::util::null_as_default")]
    pub role: String,
    /// Backend to route to
    #[serde(default)]
    pub provider: Option<Provider>,
    /// Provider-specific model identifier
    #[serde(default, deserialize_with = "crate::util::null_as_default")]
    pub model: String,
    #[serde(skip)]
    pub credential: Option<Credential>,
    /// Base URL override for self-hosted backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelInvocationConfig {
    pub fn new(role: impl Into<String>, provider: Provider, model: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            provider: Some(provider),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Provider identifier for display, empty when unset
    pub fn provider_label(&self) -> &str {
        self.provider.as_ref().map(Provider::as_str).unwrap_or("")
    }

    /// The system prompt, if it carries any non-whitespace text
    pub fn effective_system_prompt(&self) -> Option<&str> {
        self.system_prompt
            .as_deref()
            .filter(|prompt| !prompt.trim().is_empty())
    }

    /// Build the isolated message list for one invocation.
    ///
    /// The model-specific system prompt (if any) comes first, followed by
    /// the user prompt.
    pub fn messages_for(&self, prompt: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.effective_system_prompt() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));
        messages
    }

    /// Copy of this config with the run's credential for its provider.
    ///
    /// An already attached credential is kept when the map has none.
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
