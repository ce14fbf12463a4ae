//! Provider construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::M5STACK_DEFAULT_API_KEY;
use crate::util::env_prefix;
use crate::{ModelProvider, NoopOperationHooks, ProviderError, ProviderId, ProviderOperationHooks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderBuildConfig {
    pub provider_id: ProviderId,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout: Duration,
}

impl ProviderBuildConfig {
    pub fn new(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            api_key: None,
            base_url: None,
            model: None,
            timeout: Duration::from_secs(90),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The key to send, or an authentication error for hosted backends
    /// that need one.
    fn resolved_api_key(&self) -> Result<Option<String>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        match (self.provider_id, api_key) {
            (_, Some(api_key)) => Ok(Some(api_key)),
            (ProviderId::Ollama, None) => Ok(None),
            (ProviderId::M5Stack, None) => Ok(Some(M5STACK_DEFAULT_API_KEY.to_string())),
            (provider, None) => Err(ProviderError::authentication(format!(
                "{}_API_KEY must be set to use the {provider} backend",
                env_prefix(provider).unwrap_or("PROVIDER")
            ))),
        }
    }
}

pub fn build_provider_with_config(
    config: ProviderBuildConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    build_provider_with_hooks(config, Arc::new(NoopOperationHooks))
}

pub fn build_provider_with_hooks(
    config: ProviderBuildConfig,
    hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    let api_key = config.resolved_api_key()?;
    let http = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    match config.provider_id {
        ProviderId::Ollama => build_ollama_provider(config, http, hooks),
        _ => build_openai_compatible_provider(config, api_key, http, hooks),
    }
}

#[cfg(feature = "provider-openai")]
fn build_openai_compatible_provider(
    config: ProviderBuildConfig,
    api_key: Option<String>,
    http: Client,
    hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    use pprovider::adapters::openai::{OpenAiHttpTransport, OpenAiProvider, default_base_url};

    let base_url = config
        .base_url
        .unwrap_or_else(|| default_base_url(config.provider_id).to_string());
    let transport = Arc::new(OpenAiHttpTransport::new(http).with_base_url(base_url));

    let mut provider = OpenAiProvider::new(config.provider_id, transport).with_hooks(hooks);
    if let Some(api_key) = api_key {
        provider = provider.with_api_key(api_key);
    }
    if let Some(model) = config.model {
        provider = provider.with_fallback_model(model);
    }

    Ok(Arc::new(provider))
}

#[cfg(not(feature = "provider-openai"))]
fn build_openai_compatible_provider(
    config: ProviderBuildConfig,
    _api_key: Option<String>,
    _http: Client,
    _hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Err(ProviderError::invalid_request(format!(
        "provider-openai feature is required for the {} backend",
        config.provider_id
    )))
}

#[cfg(feature = "provider-ollama")]
fn build_ollama_provider(
    config: ProviderBuildConfig,
    http: Client,
    hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    use pprovider::adapters::ollama::{OLLAMA_DEFAULT_ENDPOINT, OllamaHttpTransport, OllamaProvider};

    let endpoint = config
        .base_url
        .unwrap_or_else(|| OLLAMA_DEFAULT_ENDPOINT.to_string());
    let transport = Arc::new(OllamaHttpTransport::new(http).with_endpoint(endpoint));

    let mut provider = OllamaProvider::new(transport).with_hooks(hooks);
    if let Some(model) = config.model {
        provider = provider.with_fallback_model(model);
    }

    Ok(Arc::new(provider))
}

#[cfg(not(feature = "provider-ollama"))]
fn build_ollama_provider(
    _config: ProviderBuildConfig,
    _http: Client,
    _hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-ollama feature is required for the ollama backend",
    ))
}

#[cfg(test)]
mod tests {
    use crate::ProviderErrorKind;

    use super::*;

    #[test]
    fn hosted_backends_require_a_key() {
        let error = build_provider_with_config(ProviderBuildConfig::new(ProviderId::Grok))
            .err()
            .expect("missing key should fail");

        assert_eq!(error.kind, ProviderErrorKind::Authentication);
        assert!(error.message.contains("GROK_API_KEY"));
    }

    #[test]
    fn whitespace_key_counts_as_missing() {
        let error = build_provider_with_config(
            ProviderBuildConfig::new(ProviderId::OpenAi).with_api_key("   "),
        )
        .err()
        .expect("blank key should fail");

        assert_eq!(error.kind, ProviderErrorKind::Authentication);
    }

    #[test]
    fn local_backends_build_without_a_key() {
        let ollama = build_provider_with_config(ProviderBuildConfig::new(ProviderId::Ollama))
            .expect("ollama should build");
        assert_eq!(ollama.id(), ProviderId::Ollama);

        let m5stack = build_provider_with_config(ProviderBuildConfig::new(ProviderId::M5Stack))
            .expect("m5stack should build");
        assert_eq!(m5stack.id(), ProviderId::M5Stack);
        assert!(!m5stack.supports_tools());
    }

    #[test]
    fn keyed_backend_builds_with_overrides() {
        let provider = build_provider_with_config(
            ProviderBuildConfig::new(ProviderId::Gemini)
                .with_api_key("gemini-key")
                .with_base_url("http://localhost:9999/v1")
                .with_model("gemini-2.5-flash")
                .with_timeout(Duration::from_secs(5)),
        )
        .expect("gemini should build");

        assert_eq!(provider.id(), ProviderId::Gemini);
        assert!(provider.supports_tools());
    }
}
