//! Ollama provider over the native chat transport.

use std::sync::Arc;
use std::time::Instant;

use async_stream::try_stream;
use futures_util::StreamExt;

use crate::adapters::observe_stream;
use crate::{
    BoxedEventStream, ModelProvider, ModelRequest, NoopOperationHooks, ProviderError,
    ProviderFuture, ProviderId, ProviderOperationHooks,
};

use super::serde_api::{OllamaChatRequest, OllamaOptions, OllamaTool, build_messages};
use super::transport::OllamaTransport;

pub const OLLAMA_DEFAULT_ENDPOINT: &str = "http://127.0.0.1:11434";

#[derive(Clone)]
pub struct OllamaProvider {
    transport: Arc<dyn OllamaTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
    fallback_model: String,
}

impl OllamaProvider {
    pub fn new(transport: Arc<dyn OllamaTransport>) -> Self {
        Self {
            transport,
            hooks: Arc::new(NoopOperationHooks),
            fallback_model: "qwen3:1.7b".to_string(),
        }
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub(crate) fn build_request(
        &self,
        request: ModelRequest,
    ) -> Result<OllamaChatRequest, ProviderError> {
        let model = if request.model.trim().is_empty() {
            self.fallback_model.clone()
        } else {
            request.model
        };

        let tools = request
            .tools
            .into_iter()
            .map(OllamaTool::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let options = request.options;
        let options = (options.temperature.is_some() || options.max_tokens.is_some()).then_some(
            OllamaOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        );

        Ok(OllamaChatRequest {
            model,
            messages: build_messages(request.messages),
            tools,
            stream: true,
            options,
        })
    }
}

impl ModelProvider for OllamaProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn stream_completion<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            let started = Instant::now();
            let model = if request.model.trim().is_empty() {
                self.fallback_model.clone()
            } else {
                request.model.clone()
            };
            self.hooks.on_request_start(ProviderId::Ollama, &model);

            let opened = async {
                let ollama_request = self.build_request(request)?;
                self.transport.stream(ollama_request).await
            };

            let mut chunks = match opened.await {
                Ok(chunks) => chunks,
                Err(error) => {
                    self.hooks
                        .on_failure(ProviderId::Ollama, &model, &error, started.elapsed());
                    return Err(error);
                }
            };

            let events = try_stream! {
                let mut next_index = 0_u32;
                while let Some(chunk) = chunks.next().await {
                    let event = chunk?.into_delta(&mut next_index);
                    if !event.is_empty() {
                        yield event;
                    }
                }
            };

            Ok(observe_stream(
                ProviderId::Ollama,
                model,
                self.hooks.clone(),
                started,
                Box::pin(events),
            ))
        })
    }
}
