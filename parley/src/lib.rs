//! Unified facade over the parley workspace crates.
//!
//! Most applications only need this crate. It re-exports the turn loop,
//! providers, tools, persistence and observability hooks, and adds
//! environment configuration, provider construction and runtime wiring.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use parley::prelude::*;
//!
//! struct Canned;
//!
//! impl ModelProvider for Canned {
//!     fn id(&self) -> ProviderId {
//!         ProviderId::Ollama
//!     }
//!
//!     fn stream_completion<'a>(
//!         &'a self,
//!         _request: ModelRequest,
//!     ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
//!         Box::pin(async move {
//!             let stream: BoxedEventStream<'a> =
//!                 Box::pin(VecEventStream::new(vec![Ok(DeltaEvent::text("Hello!"))]));
//!             Ok(stream)
//!         })
//!     }
//! }
//!
//! let service = chat_service(Arc::new(Canned));
//! let callbacks = TurnCallbacks::new(|slice| print!("{slice}"), |_| println!());
//! let _turn = service.run_turn(parley_messages![user => "hi"], &callbacks);
//! ```

mod macros;

pub mod collaborators;
pub mod config;
pub mod prelude;
pub mod providers;
pub mod runtime;
pub mod tools;
pub mod util;

pub use pchat;
pub use pcommon;
pub use pmemory;
pub use pobserve;
pub use pprovider;
pub use ptooling;

pub use pchat::{
    ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder, ChatTurnHooks,
    ChatTurnResult, Clock, ConversationState, DEFAULT_SYSTEM_PROMPT, HistoryResetPolicy,
    InMemoryTranscriptStore, ManualClock, NoopChatTurnHooks, SystemClock, TranscriptStore,
    TurnCallbacks, TurnState, combine_fragments,
};
pub use pcommon::{BoxFuture, GenerationOptions, SessionId};
pub use pmemory::{
    FilesystemTranscriptStore, MemoryError, MemoryErrorKind, load_transcript, save_transcript,
};
pub use pobserve::{
    MetricsObservabilityHooks, SafeChatHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};
pub use pprovider::{
    BoxedEventStream, DeltaEvent, Message, ModelProvider, ModelRequest, NoopOperationHooks,
    ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, ProviderOperationHooks,
    ProviderRegistry, Role, ToolCall, ToolCallFragment, ToolDefinition, VecEventStream,
};
pub use ptooling::{
    FunctionTool, NoopToolRuntimeHooks, Tool, ToolDispatchResult, ToolError, ToolErrorKind,
    ToolExecutionContext, ToolFuture, ToolRegistry, ToolReturnTag, ToolRuntimeHooks,
    optional_string, required_string,
};

pub use collaborators::{
    CollaboratorError, CollaboratorErrorKind, SpeechAudio, SpeechToText, TextToSpeech,
};
pub use config::{ConfigError, ConfigErrorKind, ParleyConfig};
pub use providers::{ProviderBuildConfig, build_provider_with_config, build_provider_with_hooks};
pub use runtime::{
    RuntimeError, RuntimeErrorKind, build_chat_service, build_chat_service_with_provider,
    chat_service, chat_service_with_store,
};
pub use tools::{CurrentTimeTool, builtin_tools};
pub use util::{
    assistant_message, parse_provider_id, system_message, tool_message, user_message,
};
