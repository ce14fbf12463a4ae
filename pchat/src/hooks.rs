//! Observability hooks for the turn loop.
//!
//! ```rust
//! use pchat::{ChatTurnHooks, NoopChatTurnHooks, TurnState};
//! use pcommon::SessionId;
//!
//! let hooks = NoopChatTurnHooks;
//! hooks.on_state(&SessionId::from("kitchen"), TurnState::Requesting);
//! ```

use std::time::Duration;

use pcommon::SessionId;

use crate::{ChatError, ChatTurnResult, TurnState};

pub trait ChatTurnHooks: Send + Sync {
    fn on_turn_start(&self, _session_id: &SessionId, _inbound_messages: usize) {}

    fn on_state(&self, _session_id: &SessionId, _state: TurnState) {}

    fn on_history_reset(&self, _session_id: &SessionId, _idle: Duration) {}

    fn on_tool_batch(&self, _session_id: &SessionId, _round: u32, _calls: usize) {}

    fn on_turn_success(
        &self,
        _session_id: &SessionId,
        _result: &ChatTurnResult,
        _elapsed: Duration,
    ) {
    }

    fn on_turn_failure(&self, _session_id: &SessionId, _error: &ChatError, _elapsed: Duration) {}

    fn on_persist_failure(&self, _session_id: &SessionId, _error: &ChatError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatTurnHooks;

impl ChatTurnHooks for NoopChatTurnHooks {}
