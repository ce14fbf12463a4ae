mod provider;
mod serde_api;
mod tests;
mod transport;
mod types;

pub use provider::{OpenAiProvider, default_base_url, default_model};
pub use transport::{OpenAiChunkStream, OpenAiHttpTransport, OpenAiTransport};
pub use types::{
    OpenAiMessage, OpenAiRequest, OpenAiRole, OpenAiStreamChunk, OpenAiTool, OpenAiToolCall,
    OpenAiToolCallDelta,
};
