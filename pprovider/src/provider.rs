use std::future::Future;
use std::pin::Pin;

use crate::{BoxedEventStream, ModelRequest, ProviderError, ProviderId};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A chat backend that streams completions as normalized [`crate::DeltaEvent`]s.
///
/// Tool-call fragments are surfaced as received; combining them is the
/// caller's job.
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Whether tool definitions are forwarded to the backend.
    fn supports_tools(&self) -> bool {
        true
    }

    fn stream_completion<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>>;
}
