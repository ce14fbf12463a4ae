//! Metrics-based observability hooks. Every series is prefixed `parley_`.
//!
//! ```rust
//! use pobserve::MetricsObservabilityHooks;
//! use pprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use pchat::{ChatError, ChatTurnHooks, ChatTurnResult};
use pcommon::SessionId;
use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use ptooling::{ToolError, ToolExecutionContext, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_request_start(&self, provider: ProviderId, model: &str) {
        metrics::counter!(
            "parley_provider_request_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
    }

    fn on_stream_complete(
        &self,
        provider: ProviderId,
        model: &str,
        events: usize,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_provider_stream_complete_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "parley_provider_stream_events",
            "provider" => provider.to_string()
        )
        .record(events as f64);
        metrics::histogram!(
            "parley_provider_stream_duration_seconds",
            "provider" => provider.to_string()
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ProviderError,
        _elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_provider_failure_total",
            "provider" => provider.to_string(),
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!(
            "parley_tool_execution_start_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _output: &str,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_tool_execution_success_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "parley_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "outcome" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_tool_execution_failure_total",
            "tool_name" => tool_call.name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "parley_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "outcome" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl ChatTurnHooks for MetricsObservabilityHooks {
    fn on_history_reset(&self, _session_id: &SessionId, _idle: Duration) {
        metrics::counter!("parley_chat_history_reset_total").increment(1);
    }

    fn on_tool_batch(&self, _session_id: &SessionId, _round: u32, calls: usize) {
        metrics::histogram!("parley_chat_tool_batch_size").record(calls as f64);
    }

    fn on_turn_success(&self, _session_id: &SessionId, result: &ChatTurnResult, elapsed: Duration) {
        metrics::counter!("parley_chat_turn_success_total").increment(1);
        metrics::histogram!("parley_chat_turn_rounds").record(f64::from(result.rounds));
        metrics::histogram!("parley_chat_turn_duration_seconds", "outcome" => "success")
            .record(elapsed.as_secs_f64());
    }

    fn on_turn_failure(&self, _session_id: &SessionId, error: &ChatError, elapsed: Duration) {
        metrics::counter!(
            "parley_chat_turn_failure_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!("parley_chat_turn_duration_seconds", "outcome" => "failure")
            .record(elapsed.as_secs_f64());
    }

    fn on_persist_failure(&self, _session_id: &SessionId, _error: &ChatError) {
        metrics::counter!("parley_chat_persist_failure_total").increment(1);
    }
}
