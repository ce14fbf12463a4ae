//! Runtime wiring from configuration to a ready chat service.
//!
//! [`build_chat_service`] constructs the configured backend, a filesystem
//! transcript store named after the backend, and panic-safe tracing hooks for
//! every seam.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::config::{ConfigError, ParleyConfig};
use crate::providers::build_provider_with_hooks;
use crate::{
    ChatService, FilesystemTranscriptStore, InMemoryTranscriptStore, MemoryError, ModelProvider,
    ProviderError, SafeChatHooks, SafeProviderHooks, SafeToolHooks, ToolRegistry,
    TracingObservabilityHooks, TranscriptStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    Config,
    Provider,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub message: String,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::new(RuntimeErrorKind::Config, value.to_string())
    }
}

impl From<ProviderError> for RuntimeError {
    fn from(value: ProviderError) -> Self {
        Self::new(RuntimeErrorKind::Provider, value.to_string())
    }
}

impl From<MemoryError> for RuntimeError {
    fn from(value: MemoryError) -> Self {
        Self::new(RuntimeErrorKind::Storage, value.to_string())
    }
}

/// A service over `provider` that keeps its transcript in memory.
pub fn chat_service(provider: Arc<dyn ModelProvider>) -> ChatService {
    chat_service_with_store(provider, Arc::new(InMemoryTranscriptStore::new()))
}

pub fn chat_service_with_store(
    provider: Arc<dyn ModelProvider>,
    store: Arc<dyn TranscriptStore>,
) -> ChatService {
    ChatService::new(provider, store)
}

/// Builds the configured backend and wires it into a service.
pub fn build_chat_service(
    config: &ParleyConfig,
    tools: ToolRegistry,
) -> Result<ChatService, RuntimeError> {
    let provider = build_provider_with_hooks(
        config.provider_build_config(),
        Arc::new(SafeProviderHooks::new(TracingObservabilityHooks)),
    )?;

    build_chat_service_with_provider(config, provider, tools)
}

/// Wires an already constructed provider using the rest of `config`.
pub fn build_chat_service_with_provider(
    config: &ParleyConfig,
    provider: Arc<dyn ModelProvider>,
    tools: ToolRegistry,
) -> Result<ChatService, RuntimeError> {
    let store = FilesystemTranscriptStore::new(&config.history_dir, config.provider.as_str())?;
    tracing::info!(
        provider = %config.provider,
        transcript = %store.path().display(),
        tools = tools.len(),
        "chat runtime ready"
    );

    Ok(ChatService::builder(provider)
        .store(Arc::new(store))
        .tools(tools)
        .tool_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)))
        .hooks(Arc::new(SafeChatHooks::new(TracingObservabilityHooks)))
        .policy(config.chat_policy())
        .build())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::{
        BoxedEventStream, DeltaEvent, ModelRequest, ProviderFuture, ProviderId, Role,
        TurnCallbacks, VecEventStream, load_transcript, user_message,
    };

    use super::*;

    struct EchoProvider;

    impl ModelProvider for EchoProvider {
        fn id(&self) -> ProviderId {
            ProviderId::Ollama
        }

        fn stream_completion<'a>(
            &'a self,
            request: ModelRequest,
        ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
            Box::pin(async move {
                let last = request
                    .messages
                    .last()
                    .map(|message| message.content.clone())
                    .unwrap_or_default();
                let stream: BoxedEventStream<'a> = Box::pin(VecEventStream::new(vec![Ok(
                    DeltaEvent::text(format!("you said: {last}")),
                )]));
                Ok(stream)
            })
        }
    }

    fn config_in(dir: PathBuf) -> ParleyConfig {
        let mut config = ParleyConfig::for_provider(ProviderId::Ollama);
        config.history_dir = dir;
        config.system_prompt = "Answer in one line.".to_string();
        config.reset_after = Duration::from_secs(60);
        config
    }

    #[test]
    fn errors_convert_with_their_layer() {
        let error = RuntimeError::from(ProviderError::authentication("bad key"));
        assert_eq!(error.kind, RuntimeErrorKind::Provider);
        assert_eq!(error.to_string(), "Provider: Authentication: bad key");

        let error = RuntimeError::from(MemoryError::storage("read-only"));
        assert_eq!(error.kind, RuntimeErrorKind::Storage);
    }

    #[test]
    fn missing_key_fails_before_any_store_is_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = config_in(dir.path().join("history"));
        config.provider = ProviderId::OpenAi;
        config.api_key = None;

        let error = build_chat_service(&config, ToolRegistry::new())
            .err()
            .expect("missing key should fail");

        assert_eq!(error.kind, RuntimeErrorKind::Provider);
        assert!(!dir.path().join("history").exists());
    }

    #[tokio::test]
    async fn configured_service_persists_into_history_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_in(dir.path().to_path_buf());

        let service =
            build_chat_service_with_provider(&config, Arc::new(EchoProvider), ToolRegistry::new())
                .expect("service");
        assert_eq!(service.policy().system_prompt, "Answer in one line.");
        assert_eq!(service.policy().reset_after, Duration::from_secs(60));

        let result = service
            .run_turn(vec![user_message("hi")], &TurnCallbacks::silent())
            .await
            .expect("turn");
        assert_eq!(result.assistant_message, "you said: hi");

        let files = std::fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").path())
            .collect::<Vec<_>>();
        assert_eq!(files.len(), 1);
        let name = files[0]
            .file_name()
            .and_then(|name| name.to_str())
            .expect("file name");
        assert!(name.starts_with("ollama_chat_history_"));

        let transcript = load_transcript(&files[0]).expect("transcript");
        let roles = transcript
            .iter()
            .map(|message| message.role)
            .collect::<Vec<_>>();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn in_memory_service_runs_without_touching_disk() {
        let service = chat_service(Arc::new(EchoProvider));

        let result = service
            .run_turn(vec![user_message("ping")], &TurnCallbacks::silent())
            .await
            .expect("turn");

        assert_eq!(result.assistant_message, "you said: ping");
        assert_eq!(service.snapshot().await.len(), 3);
    }
}
