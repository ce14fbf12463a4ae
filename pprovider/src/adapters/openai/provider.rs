//! OpenAI-compatible provider implementation over transport and shared models.

use std::sync::Arc;
use std::time::Instant;

use async_stream::try_stream;
use futures_util::StreamExt;

use crate::adapters::observe_stream;
use crate::{
    BoxedEventStream, DeltaEvent, ModelProvider, ModelRequest, NoopOperationHooks, ProviderError,
    ProviderFuture, ProviderId, ProviderOperationHooks, SecretString,
};

use super::transport::OpenAiTransport;
use super::types::{OpenAiMessage, OpenAiRequest, OpenAiTool};

/// Base URL used when no override is configured for an OpenAI-compatible backend.
pub fn default_base_url(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::OpenAi => "https://api.openai.com/v1",
        ProviderId::Grok => "https://api.x.ai/v1",
        ProviderId::Volcengine => "https://ark.cn-beijing.volces.com/api/v3",
        ProviderId::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        ProviderId::M5Stack => "http://127.0.0.1:8000/v1",
        ProviderId::Ollama => "http://127.0.0.1:11434/v1",
    }
}

pub fn default_model(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::OpenAi => "gpt-4o-mini",
        ProviderId::Grok => "grok-3-mini",
        ProviderId::Volcengine => "doubao-1-5-lite-32k-250115",
        ProviderId::Gemini => "gemini-2.0-flash",
        ProviderId::M5Stack => "qwen3-1.7B-Int8-ctx-axcl",
        ProviderId::Ollama => "qwen3:1.7b",
    }
}

/// Streams chat completions from any backend speaking the OpenAI
/// `chat/completions` SSE dialect.
#[derive(Clone)]
pub struct OpenAiProvider {
    id: ProviderId,
    api_key: Option<SecretString>,
    transport: Arc<dyn OpenAiTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
    fallback_model: String,
    tools_enabled: bool,
}

impl OpenAiProvider {
    pub fn new(id: ProviderId, transport: Arc<dyn OpenAiTransport>) -> Self {
        Self {
            id,
            api_key: None,
            transport,
            hooks: Arc::new(NoopOperationHooks),
            fallback_model: default_model(id).to_string(),
            tools_enabled: id != ProviderId::M5Stack,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_tools_enabled(mut self, enabled: bool) -> Self {
        self.tools_enabled = enabled;
        self
    }

    pub(crate) fn build_openai_request(&self, request: ModelRequest) -> OpenAiRequest {
        let model = if request.model.trim().is_empty() {
            self.fallback_model.clone()
        } else {
            request.model
        };

        let messages = request
            .messages
            .into_iter()
            .map(OpenAiMessage::from)
            .collect::<Vec<_>>();

        let tools = if self.tools_enabled {
            request.tools.into_iter().map(OpenAiTool::from).collect()
        } else {
            Vec::new()
        };

        OpenAiRequest {
            model,
            messages,
            tools,
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
            stream: true,
        }
    }
}

impl ModelProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn supports_tools(&self) -> bool {
        self.tools_enabled
    }

    fn stream_completion<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            let started = Instant::now();
            let openai_request = self.build_openai_request(request);
            let model = openai_request.model.clone();
            self.hooks.on_request_start(self.id, &model);

            let opened = async {
                if model.trim().is_empty() {
                    return Err(ProviderError::invalid_request("model must not be empty"));
                }
                self.transport
                    .stream(openai_request, self.api_key.clone())
                    .await
            };

            let mut chunks = match opened.await {
                Ok(chunks) => chunks,
                Err(error) => {
                    self.hooks
                        .on_failure(self.id, &model, &error, started.elapsed());
                    return Err(error);
                }
            };

            let events = try_stream! {
                while let Some(chunk) = chunks.next().await {
                    let event = DeltaEvent::from(chunk?);
                    if !event.is_empty() {
                        yield event;
                    }
                }
            };

            Ok(observe_stream(
                self.id,
                model,
                self.hooks.clone(),
                started,
                Box::pin(events),
            ))
        })
    }
}
