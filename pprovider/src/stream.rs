//! Normalized delta-event contracts and in-memory stream utilities.
//!
//! ```rust
//! use pprovider::{BoxedEventStream, DeltaEvent, VecEventStream};
//!
//! let stream = VecEventStream::new(vec![Ok(DeltaEvent::text("hello"))]);
//! let _boxed: BoxedEventStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::{ProviderError, ToolCallFragment};

/// One incremental unit of a streamed completion, in backend-neutral shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeltaEvent {
    pub content: Option<String>,
    pub reasoning: Option<String>,
    pub tool_calls: Vec<ToolCallFragment>,
}

impl DeltaEvent {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn reasoning(reasoning: impl Into<String>) -> Self {
        Self {
            reasoning: Some(reasoning.into()),
            ..Self::default()
        }
    }

    pub fn fragment(fragment: ToolCallFragment) -> Self {
        Self::fragments(vec![fragment])
    }

    pub fn fragments(tool_calls: Vec<ToolCallFragment>) -> Self {
        Self {
            tool_calls,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty)
            && self.reasoning.as_deref().is_none_or(str::is_empty)
            && self.tool_calls.is_empty()
    }
}

/// Provider stream contract.
///
/// Invariants for consumers:
/// - Events are emitted in source order.
/// - An `Err` item means the transport dropped; nothing follows it.
/// - Once the stream yields `None`, it must not yield additional items.
pub trait ModelEventStream: Stream<Item = Result<DeltaEvent, ProviderError>> + Send {}

impl<T> ModelEventStream for T where T: Stream<Item = Result<DeltaEvent, ProviderError>> + Send {}

pub type BoxedEventStream<'a> = Pin<Box<dyn ModelEventStream + 'a>>;

#[derive(Debug)]
pub struct VecEventStream {
    events: VecDeque<Result<DeltaEvent, ProviderError>>,
}

impl VecEventStream {
    pub fn new(events: Vec<Result<DeltaEvent, ProviderError>>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl Stream for VecEventStream {
    type Item = Result<DeltaEvent, ProviderError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<DeltaEvent, ProviderError>>> {
        Poll::Ready(self.events.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;

    #[test]
    fn empty_slices_make_an_empty_event() {
        assert!(DeltaEvent::default().is_empty());
        assert!(DeltaEvent::text("").is_empty());
        assert!(!DeltaEvent::text("hi").is_empty());
        assert!(!DeltaEvent::fragment(ToolCallFragment::new(0)).is_empty());
    }

    #[tokio::test]
    async fn vec_event_stream_yields_events_in_order() {
        let mut stream = VecEventStream::new(vec![
            Ok(DeltaEvent::text("one")),
            Ok(DeltaEvent::text("two")),
        ]);

        assert_eq!(stream.next().await, Some(Ok(DeltaEvent::text("one"))));
        assert_eq!(stream.next().await, Some(Ok(DeltaEvent::text("two"))));
        assert_eq!(stream.next().await, None);
    }
}
