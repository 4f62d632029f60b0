//! Invocation outcome value objects

use super::config::ModelInvocationConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one model call within a run
///
/// Exactly one of `response` / `error` is populated, gated by `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub role: String,
    pub provider: String,
    pub model: String,
    pub response: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl InvocationResult {
    /// Creates a successful result for the given config.
    pub fn success(config: &ModelInvocationConfig, response: impl Into<String>) -> Self {
        Self {
            role: config.role.clone(),
            provider: config.provider_label().to_string(),
            model: config.model.clone(),
            response: Some(response.into()),
            success: true,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates a failed result carrying the invocation error message.
    pub fn failure(config: &ModelInvocationConfig, error: impl Into<String>) -> Self {
        Self {
            role: config.role.clone(),
            provider: config.provider_label().to_string(),
            model: config.model.clone(),
            response: None,
            success: false,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }

    /// Response text of a successful result
    pub fn text(&self) -> Option<&str> {
        if self.success {
            self.response.as_deref()
        } else {
            None
        }
    }

    /// `role (provider - model)` label used in prompts and reports
    pub fn label(&self) -> String {
        format!("{} ({} - {})", self.role, self.provider, self.model)
    }
}

/// Successful results only, in input order
pub fn successful(results: &[InvocationResult]) -> impl Iterator<Item = &InvocationResult> {
    results.iter().filter(|r| r.success)
}
