//! Streaming turn loop for the parley conversational engine.
//!
//! A [`ChatService`] owns one conversation. Each call to
//! [`ChatService::run_turn`] streams a completion, combines any tool-call
//! fragments, dispatches the calls concurrently, and re-requests until the
//! model answers without tools.
//!
//! ```rust
//! use pchat::{ChatPolicy, TurnCallbacks, TurnState};
//!
//! let policy = ChatPolicy::new("gpt-4o-mini").with_max_tool_round_trips(4);
//! let _callbacks = TurnCallbacks::new(|slice| print!("{slice}"), |_| println!());
//!
//! assert_eq!(policy.max_tool_round_trips, 4);
//! assert_eq!(TurnState::Dispatching.as_str(), "dispatching");
//! ```

mod accumulator;
mod combine;
mod error;
mod hooks;
mod reset;
mod service;
mod state;
mod store;
mod types;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder, ChatTurnHooks,
        ChatTurnResult, ConversationState, HistoryResetPolicy, InMemoryTranscriptStore,
        TranscriptStore, TurnCallbacks, TurnState,
    };
    pub use pcommon::SessionId;
    pub use ptooling::{Tool, ToolError, ToolErrorKind, ToolExecutionContext, ToolRegistry};
}

pub use accumulator::{Accumulated, accumulate};
pub use combine::combine_fragments;
pub use error::{ChatError, ChatErrorKind};
pub use hooks::{ChatTurnHooks, NoopChatTurnHooks};
pub use pcommon::SessionId;
pub use reset::{Clock, HistoryResetPolicy, ManualClock, SystemClock};
pub use service::{ChatService, ChatServiceBuilder};
pub use state::ConversationState;
pub use store::{ChatFuture, InMemoryTranscriptStore, TranscriptStore};
pub use types::{ChatPolicy, ChatTurnResult, DEFAULT_SYSTEM_PROMPT, TurnCallbacks, TurnState};
