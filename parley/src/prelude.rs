//! Common imports for most parley applications.

pub use crate::{parley_messages, parley_msg};
pub use crate::{
    BoxFuture, BoxedEventStream, ChatError, ChatErrorKind, ChatPolicy, ChatService,
    ChatServiceBuilder, ChatTurnHooks, ChatTurnResult, DeltaEvent, FilesystemTranscriptStore,
    InMemoryTranscriptStore, Message, ModelProvider, ModelRequest, ParleyConfig, ProviderError,
    ProviderFuture, ProviderId, Role, SessionId, Tool, ToolCall, ToolDefinition, ToolError,
    ToolExecutionContext, ToolRegistry, ToolReturnTag, TranscriptStore, TurnCallbacks, TurnState,
    VecEventStream,
};
pub use crate::{
    ProviderBuildConfig, assistant_message, build_chat_service, build_provider_with_config,
    builtin_tools, chat_service, chat_service_with_store, system_message, tool_message,
    user_message,
};
