//! Observability hooks around one streamed provider request.
//!
//! ```rust
//! use pprovider::{NoopOperationHooks, ProviderId, ProviderOperationHooks};
//!
//! let hooks = NoopOperationHooks;
//! hooks.on_request_start(ProviderId::Ollama, "llama3.2");
//! ```

use std::time::Duration;

use crate::{ProviderError, ProviderId};

pub trait ProviderOperationHooks: Send + Sync {
    fn on_request_start(&self, _provider: ProviderId, _model: &str) {}

    fn on_stream_complete(
        &self,
        _provider: ProviderId,
        _model: &str,
        _events: usize,
        _elapsed: Duration,
    ) {
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _model: &str,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}
