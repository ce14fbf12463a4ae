use std::sync::Arc;
use std::time::Instant;

use async_stream::stream;
use futures_util::StreamExt;

use crate::{BoxedEventStream, ProviderError, ProviderId, ProviderOperationHooks};

/// Wraps an adapter stream so hooks see its completion or failure.
pub(crate) fn observe_stream<'a>(
    provider: ProviderId,
    model: String,
    hooks: Arc<dyn ProviderOperationHooks>,
    started: Instant,
    mut inner: BoxedEventStream<'a>,
) -> BoxedEventStream<'a> {
    let observed = stream! {
        let mut events = 0_usize;
        while let Some(item) = inner.next().await {
            match item {
                Ok(event) => {
                    events += 1;
                    yield Ok(event);
                }
                Err(error) => {
                    hooks.on_failure(provider, &model, &error, started.elapsed());
                    yield Err(error);
                    return;
                }
            }
        }

        hooks.on_stream_complete(provider, &model, events, started.elapsed());
    };

    Box::pin(observed)
}

pub(crate) fn map_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else if err.is_connect() {
        ProviderError::unavailable(err.to_string())
    } else {
        ProviderError::transport(err.to_string())
    }
}
