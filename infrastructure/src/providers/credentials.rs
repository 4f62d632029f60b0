//! Credential resolution from config and environment.
//!
//! Secrets are looked up when a run starts and handed to the runner as a
//! [`CredentialMap`]; they never enter a scenario or a log line.

use crate::config::{FileProviderConfig, FileProvidersConfig};
use moa_domain::{Credential, CredentialMap, Provider};
use std::sync::Arc;
use tracing::debug;

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Builds a [`CredentialMap`] from `[providers]` and environment variables.
///
/// Resolution order per provider:
/// 1. `api_key` from config
/// 2. the variable named by `api_key_env`, else the provider's conventional
///    variable (`OPENAI_API_KEY`, ...)
/// 3. [`Credential::NotRequired`] for keyless providers, and for custom
///    providers that configure no key at all
#[derive(Clone)]
pub struct EnvCredentialResolver {
    providers: FileProvidersConfig,
    lookup: Lookup,
}

impl EnvCredentialResolver {
    pub fn new(providers: FileProvidersConfig) -> Self {
        Self {
            providers,
            lookup: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Replace the environment lookup (used in tests).
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookup = Arc::new(lookup);
        self
    }

    pub fn credential_for(&self, provider: &Provider) -> Option<Credential> {
        let config = self.providers.get(provider.as_str());

        if let Some(key) = config
            .and_then(|c| c.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
        {
            return Some(Credential::secret(key));
        }

        let env_name = config
            .and_then(|c| c.api_key_env.as_deref())
            .or_else(|| provider.default_api_key_env());
        if let Some(name) = env_name
            && let Some(value) = (self.lookup)(name).filter(|v| !v.trim().is_empty())
        {
            return Some(Credential::secret(value));
        }

        if !provider.requires_credential() {
            return Some(Credential::NotRequired);
        }

        match (provider, config) {
            (Provider::Custom(_), Some(c)) if !declares_key(c) => Some(Credential::NotRequired),
            _ => None,
        }
    }

    /// Resolve every built-in and configured provider.
    ///
    /// Providers without a credential are left out of the map.
    pub fn resolve(&self) -> CredentialMap {
        let mut providers = Provider::builtin();
        for id in self.providers.keys() {
            let provider = Provider::from(id.as_str());
            if !provider.is_blank() && !providers.contains(&provider) {
                providers.push(provider);
            }
        }

        let mut map = CredentialMap::new();
        for provider in providers {
            match self.credential_for(&provider) {
                Some(credential) => map.insert(provider, credential),
                None => debug!(provider = %provider, "No credential found"),
            }
        }
        map
    }
}

fn declares_key(config: &FileProviderConfig) -> bool {
    config.api_key.is_some() || config.api_key_env.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn provider_config(api_key: Option<&str>, api_key_env: Option<&str>) -> FileProviderConfig {
        FileProviderConfig {
            api_key: api_key.map(str::to_string),
            api_key_env: api_key_env.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_env_var() {
        let resolver = EnvCredentialResolver::new(FileProvidersConfig::new())
            .with_lookup(env(&[("OPENAI_API_KEY", "sk-env")]));
        assert_eq!(
            resolver.credential_for(&Provider::OpenAi),
            Some(Credential::secret("sk-env"))
        );
        assert_eq!(resolver.credential_for(&Provider::Claude), None);
    }

    #[test]
    fn test_configured_env_var_overrides_default() {
        let mut providers = FileProvidersConfig::new();
        providers.insert("claude".to_string(), provider_config(None, Some("WORK_CLAUDE")));
        let resolver = EnvCredentialResolver::new(providers).with_lookup(env(&[
            ("ANTHROPIC_API_KEY", "personal"),
            ("WORK_CLAUDE", "work"),
        ]));
        assert_eq!(
            resolver.credential_for(&Provider::Claude),
            Some(Credential::secret("work"))
        );
    }

    #[test]
    fn test_direct_key_wins() {
        let mut providers = FileProvidersConfig::new();
        providers.insert("gemini".to_string(), provider_config(Some("inline"), None));
        let resolver = EnvCredentialResolver::new(providers)
            .with_lookup(env(&[("GEMINI_API_KEY", "from-env")]));
        assert_eq!(
            resolver.credential_for(&Provider::Gemini),
            Some(Credential::secret("inline"))
        );
    }

    #[test]
    fn test_blank_env_value_ignored() {
        let resolver = EnvCredentialResolver::new(FileProvidersConfig::new())
            .with_lookup(env(&[("MISTRAL_API_KEY", "  ")]));
        assert_eq!(resolver.credential_for(&Provider::Mistral), None);
    }

    #[test]
    fn test_keyless_and_custom_providers() {
        let mut providers = FileProvidersConfig::new();
        providers.insert("lmstudio".to_string(), FileProviderConfig::default());
        providers.insert("acme".to_string(), provider_config(None, Some("ACME_KEY")));
        let resolver = EnvCredentialResolver::new(providers).with_lookup(env(&[]));

        assert_eq!(
            resolver.credential_for(&Provider::Ollama),
            Some(Credential::NotRequired)
        );
        assert_eq!(
            resolver.credential_for(&Provider::Custom("lmstudio".to_string())),
            Some(Credential::NotRequired)
        );
        assert_eq!(
            resolver.credential_for(&Provider::Custom("acme".to_string())),
            None
        );
    }

    #[test]
    fn test_resolve_builds_map() {
        let mut providers = FileProvidersConfig::new();
        providers.insert("lmstudio".to_string(), FileProviderConfig::default());
        let resolver = EnvCredentialResolver::new(providers)
            .with_lookup(env(&[("COHERE_API_KEY", "co-1")]));

        let map = resolver.resolve();
        assert_eq!(
            map.credential_for(&Provider::Cohere),
            Some(Credential::secret("co-1"))
        );
        assert_eq!(
            map.credential_for(&Provider::Custom("lmstudio".to_string())),
            Some(Credential::NotRequired)
        );
        assert_eq!(map.credential_for(&Provider::OpenAi), None);
        // cohere, ollama, lmstudio
        assert_eq!(map.len(), 3);
    }
}
