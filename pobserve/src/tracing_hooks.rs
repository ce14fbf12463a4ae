//! Tracing-based observability hooks.
//!
//! ```rust
//! use pchat::ChatTurnHooks;
//! use pobserve::TracingObservabilityHooks;
//!
//! fn accepts_chat_hooks(_hooks: &dyn ChatTurnHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_chat_hooks(&hooks);
//! ```

use std::time::Duration;

use pchat::{ChatError, ChatTurnHooks, ChatTurnResult, TurnState};
use pcommon::SessionId;
use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use ptooling::{ToolError, ToolExecutionContext, ToolReturnTag, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_request_start(&self, provider: ProviderId, model: &str) {
        tracing::info!(
            phase = "provider",
            event = "request_start",
            provider = %provider,
            model
        );
    }

    fn on_stream_complete(
        &self,
        provider: ProviderId,
        model: &str,
        events: usize,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "provider",
            event = "stream_complete",
            provider = %provider,
            model,
            events,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            model,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = %tool_call.name,
            tool_call_id = tool_call.id.as_deref().unwrap_or_default(),
            session_id = %context.session_id,
            round = context.round
        );
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        output: &str,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = %tool_call.name,
            tool_call_id = tool_call.id.as_deref().unwrap_or_default(),
            session_id = %context.session_id,
            tag = ToolReturnTag::classify(output).map(ToolReturnTag::as_str),
            output_len = output.len(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::warn!(
            phase = "tool",
            event = "execution_failure",
            tool_name = %tool_call.name,
            tool_call_id = tool_call.id.as_deref().unwrap_or_default(),
            session_id = %context.session_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}

impl ChatTurnHooks for TracingObservabilityHooks {
    fn on_turn_start(&self, session_id: &SessionId, inbound_messages: usize) {
        tracing::info!(
            phase = "chat",
            event = "turn_start",
            session_id = %session_id,
            inbound_messages
        );
    }

    fn on_state(&self, session_id: &SessionId, state: TurnState) {
        tracing::debug!(phase = "chat", event = "state", session_id = %session_id, state = %state);
    }

    fn on_history_reset(&self, session_id: &SessionId, idle: Duration) {
        tracing::info!(
            phase = "chat",
            event = "history_reset",
            session_id = %session_id,
            idle_secs = idle.as_secs()
        );
    }

    fn on_tool_batch(&self, session_id: &SessionId, round: u32, calls: usize) {
        tracing::info!(
            phase = "chat",
            event = "tool_batch",
            session_id = %session_id,
            round,
            calls
        );
    }

    fn on_turn_success(&self, session_id: &SessionId, result: &ChatTurnResult, elapsed: Duration) {
        tracing::info!(
            phase = "chat",
            event = "turn_success",
            session_id = %session_id,
            rounds = result.rounds,
            tool_results = result.tool_results.len(),
            answer_len = result.assistant_message.len(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_turn_failure(&self, session_id: &SessionId, error: &ChatError, elapsed: Duration) {
        tracing::error!(
            phase = "chat",
            event = "turn_failure",
            session_id = %session_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_persist_failure(&self, session_id: &SessionId, error: &ChatError) {
        tracing::warn!(
            phase = "chat",
            event = "persist_failure",
            session_id = %session_id,
            error = %error
        );
    }
}
