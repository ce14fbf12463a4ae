//! Folds a provider delta stream into text, reasoning, and raw fragments.

use futures_core::Stream;
use futures_util::StreamExt;
use pprovider::{DeltaEvent, ProviderError, ToolCallFragment};

use crate::TurnCallbacks;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Accumulated {
    pub text: String,
    pub reasoning: String,
    pub fragments: Vec<ToolCallFragment>,
    /// Set when the stream ended with a transport error.
    pub interruption: Option<ProviderError>,
}

impl Accumulated {
    pub fn is_interrupted(&self) -> bool {
        self.interruption.is_some()
    }
}

/// Drains `stream`, forwarding every non-empty content slice as it arrives.
///
/// An `Err` item stops accumulation and is returned in
/// [`Accumulated::interruption`] alongside whatever arrived before it.
pub async fn accumulate<S>(mut stream: S, callbacks: &TurnCallbacks) -> Accumulated
where
    S: Stream<Item = Result<DeltaEvent, ProviderError>> + Unpin,
{
    let mut accumulated = Accumulated::default();

    while let Some(item) = stream.next().await {
        let event = match item {
            Ok(event) => event,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    received = accumulated.text.len(),
                    "provider stream interrupted"
                );
                accumulated.interruption = Some(error);
                break;
            }
        };

        if let Some(reasoning) = event.reasoning.as_deref().filter(|slice| !slice.is_empty()) {
            accumulated.reasoning.push_str(reasoning);
            callbacks.partial_reasoning(reasoning);
        }

        if let Some(content) = event.content.as_deref().filter(|slice| !slice.is_empty()) {
            accumulated.text.push_str(content);
            callbacks.partial_text(content);
        }

        accumulated.fragments.extend(event.tool_calls);
    }

    accumulated
}
