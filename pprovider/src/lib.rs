//! Provider abstractions for streamed chat completions.
//!
//! Every backend is normalized to one lazy stream of [`DeltaEvent`]s. Tool
//! calls arrive as [`ToolCallFragment`]s exactly as the backend delivered them:
//! many positional slices for OpenAI-compatible servers, one atomic fragment per
//! call for Ollama.
//!
//! ```rust
//! use pprovider::{BoxedEventStream, DeltaEvent, ToolCallFragment, VecEventStream};
//!
//! let fragment = ToolCallFragment::new(0)
//!     .with_name("getWeather")
//!     .with_arguments("{\"ci");
//! let events = vec![Ok(DeltaEvent::text("Checking")), Ok(DeltaEvent::fragment(fragment))];
//!
//! assert!(events.iter().all(|event| event.as_ref().is_ok_and(|e| !e.is_empty())));
//! let _stream: BoxedEventStream<'static> = Box::pin(VecEventStream::new(events));
//! ```

pub mod adapters;
pub mod credentials;
pub mod error;
pub mod hooks;
pub mod model;
pub mod prelude;
pub mod provider;
pub mod registry;
pub mod stream;

pub use credentials::SecretString;
pub use error::{ProviderError, ProviderErrorKind};
pub use hooks::{NoopOperationHooks, ProviderOperationHooks};
pub use model::{
    Message, ModelRequest, ModelRequestBuilder, ProviderId, Role, ToolCall, ToolCallFragment,
    ToolDefinition,
};
pub use provider::{ModelProvider, ProviderFuture};
pub use registry::ProviderRegistry;
pub use stream::{BoxedEventStream, DeltaEvent, ModelEventStream, VecEventStream};
