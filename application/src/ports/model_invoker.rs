//! Model invoker port
//!
//! Defines the single capability the orchestration core needs from the
//! outside world: send a message list to one model and get text back.

use async_trait::async_trait;
use moa_domain::{ChatMessage, Credential, ModelInvocationConfig, Provider};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during a model invocation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvokerError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Provider is required")]
    MissingProvider,

    #[error("No credential configured for provider: {0}")]
    MissingCredential(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response from {0}")]
    EmptyResponse(String),
}

/// One fully resolved call: who to ask, with what, and how
///
/// Serializes without the credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationRequest {
    pub provider: Provider,
    #[serde(skip)]
    pub credential: Option<Credential>,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl InvocationRequest {
    /// Build a request from a config and an already assembled message list
    pub fn from_config(
        config: &ModelInvocationConfig,
        messages: Vec<ChatMessage>,
    ) -> Result<Self, InvokerError> {
        let provider = config
            .provider
            .clone()
            .filter(|p| !p.is_blank())
            .ok_or(InvokerError::MissingProvider)?;

        Ok(Self {
            provider,
            credential: config.credential.clone(),
            model: config.model.clone(),
            messages,
            endpoint: config.endpoint.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Text of the last user message
    pub fn user_prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == moa_domain::MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Capability to invoke one model
///
/// Implementations (transports) live in the infrastructure layer. They must
/// resolve with the generated text, reject on any transport or provider
/// error, and never retry on their own.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, request: InvocationRequest) -> Result<String, InvokerError>;
}
