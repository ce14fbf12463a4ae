//! The turn loop: request, accumulate, dispatch tools, repeat until the model
//! answers without tool calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::lock::Mutex;
use pcommon::SessionId;
use pprovider::{Message, ModelProvider, ModelRequest, ToolDefinition};
use ptooling::{
    DefaultToolRuntime, ToolDispatcher, ToolExecutionContext, ToolRegistry, ToolRuntimeHooks,
};

use crate::{
    ChatError, ChatPolicy, ChatTurnHooks, ChatTurnResult, Clock, ConversationState,
    HistoryResetPolicy, InMemoryTranscriptStore, NoopChatTurnHooks, SystemClock, TranscriptStore,
    TurnCallbacks, TurnState, accumulate, combine_fragments,
};

/// Owns one conversation and drives its turns.
///
/// State sits behind an async mutex held for a whole turn, so concurrent
/// [`run_turn`](Self::run_turn) calls on one service run one after another.
pub struct ChatService {
    provider: Arc<dyn ModelProvider>,
    dispatcher: ToolDispatcher,
    tool_definitions: Vec<ToolDefinition>,
    store: Arc<dyn TranscriptStore>,
    policy: ChatPolicy,
    reset_policy: HistoryResetPolicy,
    hooks: Arc<dyn ChatTurnHooks>,
    session_id: SessionId,
    state: Mutex<ConversationState>,
}

impl ChatService {
    pub fn new(provider: Arc<dyn ModelProvider>, store: Arc<dyn TranscriptStore>) -> Self {
        Self::builder(provider).store(store).build()
    }

    pub fn builder(provider: Arc<dyn ModelProvider>) -> ChatServiceBuilder {
        ChatServiceBuilder::new(provider)
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn policy(&self) -> &ChatPolicy {
        &self.policy
    }

    /// Copy of the current transcript.
    pub async fn snapshot(&self) -> Vec<Message> {
        self.state.lock().await.messages().to_vec()
    }

    /// Drops history back to the system message without waiting for the
    /// idle threshold.
    pub async fn reset_history(&self) {
        self.state.lock().await.reset();
        tracing::info!(session_id = %self.session_id, "chat history reset on request");
    }

    /// Runs one caller turn to completion.
    ///
    /// Streamed content reaches `callbacks` as it arrives. The final answer
    /// goes to the completion callback before the transcript is persisted.
    pub async fn run_turn(
        &self,
        messages: Vec<Message>,
        callbacks: &TurnCallbacks,
    ) -> Result<ChatTurnResult, ChatError> {
        if messages.is_empty() {
            return Err(ChatError::invalid_request(
                "inbound message batch must not be empty",
            ));
        }

        let started = Instant::now();
        self.hooks.on_turn_start(&self.session_id, messages.len());

        let mut state = self.state.lock().await;
        self.apply_reset_policy(&mut state);
        state.extend(messages);

        match self.drive(&mut state, callbacks).await {
            Ok(result) => {
                callbacks.complete(&result.assistant_message);
                self.persist(&state).await;
                self.report_state(TurnState::Completed);
                self.hooks
                    .on_turn_success(&self.session_id, &result, started.elapsed());
                self.report_state(TurnState::Idle);
                Ok(result)
            }
            Err(error) => {
                tracing::warn!(session_id = %self.session_id, error = %error, "turn aborted");
                self.persist(&state).await;
                self.hooks
                    .on_turn_failure(&self.session_id, &error, started.elapsed());
                self.report_state(TurnState::Idle);
                Err(error)
            }
        }
    }

    async fn drive(
        &self,
        state: &mut ConversationState,
        callbacks: &TurnCallbacks,
    ) -> Result<ChatTurnResult, ChatError> {
        let mut rounds = 0_u32;
        let mut round_trips = 0_u32;
        let mut tool_results = Vec::new();

        loop {
            rounds += 1;
            self.report_state(TurnState::Requesting);
            let stream = self
                .provider
                .stream_completion(self.build_request(state.messages()))
                .await?;

            self.report_state(TurnState::Accumulating);
            let accumulated = accumulate(stream, callbacks).await;

            if let Some(error) = accumulated.interruption {
                if !accumulated.text.is_empty() {
                    state.push(Message::assistant(accumulated.text, Vec::new()));
                }
                return Err(error.into());
            }

            let calls = combine_fragments(&accumulated.fragments);
            if calls.is_empty() {
                state.push(Message::assistant(accumulated.text.clone(), Vec::new()));
                return Ok(ChatTurnResult {
                    session_id: self.session_id.clone(),
                    assistant_message: accumulated.text,
                    rounds,
                    tool_results,
                });
            }

            if round_trips >= self.policy.max_tool_round_trips {
                if !accumulated.text.is_empty() {
                    state.push(Message::assistant(accumulated.text, Vec::new()));
                }
                return Err(ChatError::tool_loop_limit(self.policy.max_tool_round_trips));
            }
            round_trips += 1;

            state.push(Message::assistant(accumulated.text, calls.clone()));

            self.report_state(TurnState::Dispatching);
            self.hooks
                .on_tool_batch(&self.session_id, rounds, calls.len());
            let context = ToolExecutionContext::new(self.session_id.clone()).with_round(rounds);
            let results = self
                .dispatcher
                .dispatch_all(&calls, &context, callbacks.invocation_observer())
                .await;

            state.extend(results.iter().map(|result| {
                Message::tool(result.tool_call_id.clone(), result.result.clone())
            }));
            tool_results.extend(results);
        }
    }

    fn apply_reset_policy(&self, state: &mut ConversationState) {
        let idle = state
            .last_activity()
            .map(|last| self.reset_policy.now().saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);

        if self.reset_policy.apply(state) {
            tracing::info!(
                session_id = %self.session_id,
                idle_secs = idle.as_secs(),
                "chat history reset after idle gap"
            );
            self.hooks.on_history_reset(&self.session_id, idle);
        }
    }

    fn build_request(&self, messages: &[Message]) -> ModelRequest {
        let tools = if self.provider.supports_tools() {
            self.tool_definitions.clone()
        } else {
            Vec::new()
        };

        ModelRequest {
            model: self.policy.model.clone(),
            messages: messages.to_vec(),
            options: self.policy.options,
            tools,
        }
    }

    async fn persist(&self, state: &ConversationState) {
        if let Err(error) = self.store.save(&self.session_id, state.messages()).await {
            tracing::warn!(
                session_id = %self.session_id,
                error = %error,
                "failed to persist transcript"
            );
            self.hooks.on_persist_failure(&self.session_id, &error);
        }
    }

    fn report_state(&self, state: TurnState) {
        tracing::debug!(session_id = %self.session_id, state = %state, "turn state");
        self.hooks.on_state(&self.session_id, state);
    }
}

pub struct ChatServiceBuilder {
    provider: Arc<dyn ModelProvider>,
    store: Option<Arc<dyn TranscriptStore>>,
    registry: Arc<ToolRegistry>,
    tool_hooks: Option<Arc<dyn ToolRuntimeHooks>>,
    policy: ChatPolicy,
    clock: Arc<dyn Clock>,
    hooks: Arc<dyn ChatTurnHooks>,
    session_id: Option<SessionId>,
}

impl ChatServiceBuilder {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            store: None,
            registry: Arc::new(ToolRegistry::new()),
            tool_hooks: None,
            policy: ChatPolicy::default(),
            clock: Arc::new(SystemClock),
            hooks: Arc::new(NoopChatTurnHooks),
            session_id: None,
        }
    }

    pub fn store(mut self, store: Arc<dyn TranscriptStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn tools(self, registry: ToolRegistry) -> Self {
        self.tool_registry(Arc::new(registry))
    }

    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn tool_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.tool_hooks = Some(hooks);
        self
    }

    pub fn policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ChatTurnHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn session_id(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn build(self) -> ChatService {
        let mut runtime = DefaultToolRuntime::new(self.registry.clone());
        if let Some(hooks) = self.tool_hooks {
            runtime = runtime.with_hooks(hooks);
        }

        let session_id = self
            .session_id
            .unwrap_or_else(|| SessionId::new(self.provider.id().as_str()));

        ChatService {
            dispatcher: ToolDispatcher::new(Arc::new(runtime)),
            tool_definitions: self.registry.definitions(),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryTranscriptStore::new())),
            reset_policy: HistoryResetPolicy::new(self.policy.reset_after, self.clock),
            state: Mutex::new(ConversationState::new(self.policy.system_prompt.clone())),
            provider: self.provider,
            policy: self.policy,
            hooks: self.hooks,
            session_id,
        }
    }
}
