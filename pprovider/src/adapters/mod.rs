//! Concrete backend adapters and the plumbing they share.

#[cfg(any(feature = "provider-openai", feature = "provider-ollama"))]
mod lines;
#[cfg(any(feature = "provider-openai", feature = "provider-ollama"))]
mod observed;

#[cfg(any(feature = "provider-openai", feature = "provider-ollama"))]
pub(crate) use lines::LineBuffer;
#[cfg(any(feature = "provider-openai", feature = "provider-ollama"))]
pub(crate) use observed::{map_send_error, observe_stream};

#[cfg(feature = "provider-openai")]
pub mod openai;

#[cfg(feature = "provider-ollama")]
pub mod ollama;
