use super::command::CommandInvoker;
use crate::config::FileProvidersConfig;
use async_trait::async_trait;
use moa_application::{InvocationRequest, InvokerError, ModelInvoker};
use moa_domain::Provider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Provider → transport map, resolved once at startup.
///
/// Dispatches every request to the invoker registered for its provider and
/// fills in the provider's default endpoint when the model entry has none.
#[derive(Default, Clone)]
pub struct InvokerRegistry {
    invokers: HashMap<Provider, Arc<dyn ModelInvoker>>,
    /// Per-provider endpoint overrides from `[providers.<id>] endpoint`
    endpoints: HashMap<Provider, String>,
}

impl InvokerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with a [`CommandInvoker`] for every provider that
    /// has a `command` configured.
    pub fn from_config(providers: &FileProvidersConfig) -> Self {
        let mut registry = Self::new();

        for (id, config) in providers {
            let provider = Provider::from(id.as_str());
            if provider.is_blank() {
                continue;
            }

            if let Some(endpoint) = config.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
                registry.endpoints.insert(provider.clone(), endpoint.to_string());
            }

            if let Some(command) = config.command.as_deref().filter(|c| !c.trim().is_empty()) {
                debug!(provider = %provider, "Registering command transport");
                registry.insert(provider, Arc::new(CommandInvoker::new(command)));
            }
        }

        registry
    }

    pub fn register(mut self, provider: Provider, invoker: Arc<dyn ModelInvoker>) -> Self {
        self.insert(provider, invoker);
        self
    }

    pub fn insert(&mut self, provider: Provider, invoker: Arc<dyn ModelInvoker>) {
        self.invokers.insert(provider, invoker);
    }

    pub fn with_endpoint(mut self, provider: Provider, endpoint: impl Into<String>) -> Self {
        self.endpoints.insert(provider, endpoint.into());
        self
    }

    pub fn supports(&self, provider: &Provider) -> bool {
        self.invokers.contains_key(provider)
    }

    /// Registered providers, sorted
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.invokers.keys().cloned().collect();
        providers.sort();
        providers
    }

    fn endpoint_for(&self, provider: &Provider) -> Option<String> {
        self.endpoints
            .get(provider)
            .cloned()
            .or_else(|| provider.default_endpoint().map(str::to_string))
    }
}

#[async_trait]
impl ModelInvoker for InvokerRegistry {
    async fn invoke(&self, mut request: InvocationRequest) -> Result<String, InvokerError> {
        let invoker = self
            .invokers
            .get(&request.provider)
            .ok_or_else(|| InvokerError::UnsupportedProvider(request.provider.to_string()))?;

        if request.endpoint.is_none() {
            request.endpoint = self.endpoint_for(&request.provider);
        }

        invoker.invoke(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileProviderConfig;
    use moa_domain::{Credential, ModelInvocationConfig};
    use std::sync::Mutex;

    // -- Mock invoker ----------------------------------------------------------

    #[derive(Default)]
    struct RecordingInvoker {
        label: &'static str,
        seen: Mutex<Vec<InvocationRequest>>,
    }

    impl RecordingInvoker {
        fn new(label: &'static str) -> Arc<Self> {
            Arc::new(Self {
                label,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelInvoker for RecordingInvoker {
        async fn invoke(&self, request: InvocationRequest) -> Result<String, InvokerError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.label.to_string())
        }
    }

    fn request(provider: Provider) -> InvocationRequest {
        let config = ModelInvocationConfig::new("Analyst", provider, "some-model")
            .with_credential(Credential::secret("k"));
        InvocationRequest::from_config(&config, config.messages_for("hi")).unwrap()
    }

    // -- Tests -----------------------------------------------------------------

    #[tokio::test]
    async fn test_dispatch_by_provider() {
        let registry = InvokerRegistry::new()
            .register(Provider::OpenAi, RecordingInvoker::new("openai"))
            .register(Provider::Claude, RecordingInvoker::new("claude"));

        assert_eq!(registry.invoke(request(Provider::Claude)).await.unwrap(), "claude");
        assert_eq!(registry.invoke(request(Provider::OpenAi)).await.unwrap(), "openai");
    }

    #[tokio::test]
    async fn test_unregistered_provider_is_unsupported() {
        let registry = InvokerRegistry::new().register(Provider::OpenAi, RecordingInvoker::new("x"));
        let err = registry
            .invoke(request(Provider::Custom("acme".to_string())))
            .await
            .unwrap_err();
        assert_eq!(err, InvokerError::UnsupportedProvider("acme".to_string()));
        assert_eq!(err.to_string(), "Unsupported provider: acme");
    }

    #[tokio::test]
    async fn test_default_endpoint_filled_in() {
        let recorder = RecordingInvoker::new("ollama");
        let registry = InvokerRegistry::new().register(Provider::Ollama, recorder.clone());

        registry.invoke(request(Provider::Ollama)).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0].endpoint.as_deref(), Some("http://localhost:11434"));
    }

    #[tokio::test]
    async fn test_configured_endpoint_overrides_default_but_not_model_entry() {
        let recorder = RecordingInvoker::new("ollama");
        let registry = InvokerRegistry::new()
            .register(Provider::Ollama, recorder.clone())
            .with_endpoint(Provider::Ollama, "http://gpu-box:11434");

        registry.invoke(request(Provider::Ollama)).await.unwrap();
        let mut explicit = request(Provider::Ollama);
        explicit.endpoint = Some("http://laptop:11434".to_string());
        registry.invoke(explicit).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0].endpoint.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(seen[1].endpoint.as_deref(), Some("http://laptop:11434"));
    }

    #[test]
    fn test_from_config_registers_commands_only() {
        let mut providers = FileProvidersConfig::new();
        providers.insert(
            "openai".to_string(),
            FileProviderConfig {
                command: Some("openai-bridge".to_string()),
                ..Default::default()
            },
        );
        providers.insert(
            "claude".to_string(),
            FileProviderConfig {
                api_key_env: Some("CLAUDE_KEY".to_string()),
                ..Default::default()
            },
        );
        providers.insert(
            "lmstudio".to_string(),
            FileProviderConfig {
                command: Some("lmstudio-bridge".to_string()),
                endpoint: Some("http://localhost:1234".to_string()),
                ..Default::default()
            },
        );

        let registry = InvokerRegistry::from_config(&providers);

        assert!(registry.supports(&Provider::OpenAi));
        assert!(!registry.supports(&Provider::Claude));
        let lmstudio = Provider::Custom("lmstudio".to_string());
        assert!(registry.supports(&lmstudio));
        assert_eq!(
            registry.endpoint_for(&lmstudio).as_deref(),
            Some("http://localhost:1234")
        );
        assert_eq!(registry.providers().len(), 2);
    }
}
