//! Common `pprovider` imports for downstream crates.

pub use crate::{
    BoxedEventStream, DeltaEvent, Message, ModelEventStream, ModelProvider, ModelRequest,
    ModelRequestBuilder, NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderId, ProviderOperationHooks, ProviderRegistry, Role, ToolCall, ToolCallFragment,
    ToolDefinition, VecEventStream,
};
pub use pcommon::{BoxFuture, GenerationOptions};
