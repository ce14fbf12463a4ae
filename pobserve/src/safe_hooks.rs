//! Wrappers that keep a panicking hook from unwinding into the turn loop.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use pchat::{ChatError, ChatTurnHooks, ChatTurnResult, TurnState};
use pcommon::SessionId;
use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use ptooling::{ToolError, ToolExecutionContext, ToolRuntimeHooks};

fn contain(hook: &'static str, callback: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(callback)).is_err() {
        tracing::warn!(hook, "observability hook panicked");
    }
}

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_request_start(&self, provider: ProviderId, model: &str) {
        contain("provider.request_start", || {
            self.inner.on_request_start(provider, model)
        });
    }

    fn on_stream_complete(
        &self,
        provider: ProviderId,
        model: &str,
        events: usize,
        elapsed: Duration,
    ) {
        contain("provider.stream_complete", || {
            self.inner
                .on_stream_complete(provider, model, events, elapsed)
        });
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        contain("provider.failure", || {
            self.inner.on_failure(provider, model, error, elapsed)
        });
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        contain("tool.execution_start", || {
            self.inner.on_execution_start(tool_call, context)
        });
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        output: &str,
        elapsed: Duration,
    ) {
        contain("tool.execution_success", || {
            self.inner
                .on_execution_success(tool_call, context, output, elapsed)
        });
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        contain("tool.execution_failure", || {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        });
    }
}

pub struct SafeChatHooks<H> {
    inner: H,
}

impl<H> SafeChatHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ChatTurnHooks for SafeChatHooks<H>
where
    H: ChatTurnHooks,
{
    fn on_turn_start(&self, session_id: &SessionId, inbound_messages: usize) {
        contain("chat.turn_start", || {
            self.inner.on_turn_start(session_id, inbound_messages)
        });
    }

    fn on_state(&self, session_id: &SessionId, state: TurnState) {
        contain("chat.state", || self.inner.on_state(session_id, state));
    }

    fn on_history_reset(&self, session_id: &SessionId, idle: Duration) {
        contain("chat.history_reset", || {
            self.inner.on_history_reset(session_id, idle)
        });
    }

    fn on_tool_batch(&self, session_id: &SessionId, round: u32, calls: usize) {
        contain("chat.tool_batch", || {
            self.inner.on_tool_batch(session_id, round, calls)
        });
    }

    fn on_turn_success(&self, session_id: &SessionId, result: &ChatTurnResult, elapsed: Duration) {
        contain("chat.turn_success", || {
            self.inner.on_turn_success(session_id, result, elapsed)
        });
    }

    fn on_turn_failure(&self, session_id: &SessionId, error: &ChatError, elapsed: Duration) {
        contain("chat.turn_failure", || {
            self.inner.on_turn_failure(session_id, error, elapsed)
        });
    }

    fn on_persist_failure(&self, session_id: &SessionId, error: &ChatError) {
        contain("chat.persist_failure", || {
            self.inner.on_persist_failure(session_id, error)
        });
    }
}
