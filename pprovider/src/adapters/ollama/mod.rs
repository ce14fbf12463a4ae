//! Adapter for Ollama's native `/api/chat` NDJSON streaming endpoint.
//!
//! Ollama delivers every tool call whole, so each one becomes a single
//! atomic [`crate::ToolCallFragment`].

mod provider;
mod serde_api;
mod transport;

pub use provider::{OLLAMA_DEFAULT_ENDPOINT, OllamaProvider};
pub use transport::{OllamaChunkStream, OllamaHttpTransport, OllamaTransport};
pub use serde_api::{OllamaChatRequest, OllamaChunk, OllamaMessage, OllamaToolCall};
