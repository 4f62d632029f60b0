//! Provider configuration from TOML (`[providers.<id>]` sections)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-provider settings.
///
/// ```toml
/// [providers.openai]
/// api_key_env = "OPENAI_API_KEY"
/// command = "my-openai-bridge"
///
/// [providers.ollama]
/// endpoint = "http://gpu-box:11434"
/// command = "ollama-bridge"
/// ```
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key (defaults per provider).
    pub api_key_env: Option<String>,
    /// Direct API key (not recommended, use `api_key_env` instead).
    pub api_key: Option<String>,
    /// Base URL used when a model entry does not set its own endpoint.
    pub endpoint: Option<String>,
    /// Shell command that performs the invocation (request JSON on stdin).
    pub command: Option<String>,
}

impl fmt::Debug for FileProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileProviderConfig")
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("endpoint", &self.endpoint)
            .field("command", &self.command)
            .finish()
    }
}

/// `[providers]` table keyed by provider id
pub type FileProvidersConfig = BTreeMap<String, FileProviderConfig>;
