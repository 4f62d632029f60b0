//! Provider catalogue and credentials.
//!
//! A [`Provider`] identifies the backend a model invocation is routed to.
//! Credentials are never part of a persisted scenario; they are supplied
//! per run through a [`CredentialMap`].

mod credential;

pub use credential::{Credential, CredentialMap};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Supported model backends (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    OpenAi,
    Claude,
    Gemini,
    Mistral,
    Cohere,
    OpenRouter,
    Ollama,
    /// Any other backend registered by the host application
    Custom(String),
}

impl Provider {
    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Claude => "claude",
            Provider::Gemini => "gemini",
            Provider::Mistral => "mistral",
            Provider::Cohere => "cohere",
            Provider::OpenRouter => "openrouter",
            Provider::Ollama => "ollama",
            Provider::Custom(s) => s,
        }
    }

    /// All built-in providers
    pub fn builtin() -> Vec<Provider> {
        vec![
            Provider::OpenAi,
            Provider::Claude,
            Provider::Gemini,
            Provider::Mistral,
            Provider::Cohere,
            Provider::OpenRouter,
            Provider::Ollama,
        ]
    }

    /// Whether an invocation against this provider needs a secret.
    ///
    /// Locally hosted backends (Ollama) accept requests without one.
    pub fn requires_credential(&self) -> bool {
        !matches!(self, Provider::Ollama)
    }

    /// Conventional environment variable holding this provider's API key
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Claude => Some("ANTHROPIC_API_KEY"),
            Provider::Gemini => Some("GEMINI_API_KEY"),
            Provider::Mistral => Some("MISTRAL_API_KEY"),
            Provider::Cohere => Some("COHERE_API_KEY"),
            Provider::OpenRouter => Some("OPENROUTER_API_KEY"),
            Provider::Ollama | Provider::Custom(_) => None,
        }
    }

    /// Default base URL for self-hosted backends
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            Provider::Ollama => Some("http://localhost:11434"),
            _ => None,
        }
    }

    /// `true` for a custom provider with a blank identifier
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Provider {
    fn from(s: &str) -> Self {
        match s {
            "openai" => Provider::OpenAi,
            "claude" | "anthropic" => Provider::Claude,
            "gemini" => Provider::Gemini,
            "mistral" => Provider::Mistral,
            "cohere" => Provider::Cohere,
            "openrouter" => Provider::OpenRouter,
            "ollama" => Provider::Ollama,
            other => Provider::Custom(other.to_string()),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Provider::from(s))
    }
}

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Provider::from(s.as_str()))
    }
}
