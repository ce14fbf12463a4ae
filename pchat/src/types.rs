//! Turn callbacks, turn states, policy, and turn result types.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use pcommon::{GenerationOptions, SessionId};
use ptooling::{InvocationObserver, ToolDispatchResult, ignore_invocations};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful voice assistant. Keep answers short \
and conversational. Use the available tools when they help answer the user.";

type TextCallback = dyn Fn(&str) + Send + Sync;

/// Caller-supplied observers for one turn.
///
/// `on_partial_text` fires once per non-empty streamed content slice, in
/// arrival order. `on_complete` fires once with the final answer.
pub struct TurnCallbacks {
    on_partial_text: Box<TextCallback>,
    on_complete: Box<TextCallback>,
    on_partial_reasoning: Option<Box<TextCallback>>,
    on_tool_invocation: Option<Box<InvocationObserver<'static>>>,
}

impl TurnCallbacks {
    pub fn new<P, C>(on_partial_text: P, on_complete: C) -> Self
    where
        P: Fn(&str) + Send + Sync + 'static,
        C: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            on_partial_text: Box::new(on_partial_text),
            on_complete: Box::new(on_complete),
            on_partial_reasoning: None,
            on_tool_invocation: None,
        }
    }

    pub fn silent() -> Self {
        Self::new(|_| {}, |_| {})
    }

    pub fn with_partial_reasoning<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_partial_reasoning = Some(Box::new(callback));
        self
    }

    pub fn with_tool_invocation<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, Option<&str>) + Send + Sync + 'static,
    {
        self.on_tool_invocation = Some(Box::new(callback));
        self
    }

    pub(crate) fn partial_text(&self, slice: &str) {
        (self.on_partial_text)(slice);
    }

    pub(crate) fn partial_reasoning(&self, slice: &str) {
        if let Some(callback) = &self.on_partial_reasoning {
            callback(slice);
        }
    }

    pub(crate) fn complete(&self, text: &str) {
        (self.on_complete)(text);
    }

    pub(crate) fn invocation_observer(&self) -> &InvocationObserver<'_> {
        match &self.on_tool_invocation {
            Some(callback) => callback.as_ref(),
            None => &ignore_invocations,
        }
    }
}

impl std::fmt::Debug for TurnCallbacks {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnCallbacks")
            .field("on_partial_reasoning", &self.on_partial_reasoning.is_some())
            .field("on_tool_invocation", &self.on_tool_invocation.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnState {
    Idle,
    Requesting,
    Accumulating,
    Dispatching,
    Completed,
}

impl TurnState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Accumulating => "accumulating",
            Self::Dispatching => "dispatching",
            Self::Completed => "completed",
        }
    }
}

impl Display for TurnState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPolicy {
    pub model: String,
    pub system_prompt: String,
    pub options: GenerationOptions,
    /// Idle gap after which history is discarded on the next caller turn.
    pub reset_after: Duration,
    /// Maximum tool dispatch cycles within one turn.
    pub max_tool_round_trips: u32,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            model: String::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            options: GenerationOptions::streaming(),
            reset_after: Duration::from_secs(300),
            max_tool_round_trips: 8,
        }
    }
}

impl ChatPolicy {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_reset_after(mut self, reset_after: Duration) -> Self {
        self.reset_after = reset_after;
        self
    }

    pub fn with_max_tool_round_trips(mut self, max_tool_round_trips: u32) -> Self {
        self.max_tool_round_trips = max_tool_round_trips;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurnResult {
    pub session_id: SessionId,
    pub assistant_message: String,
    /// Number of model requests issued during the turn.
    pub rounds: u32,
    pub tool_results: Vec<ToolDispatchResult>,
}
