//! The live transcript for one conversation.

use std::time::Instant;

use pprovider::Message;

/// Ordered messages plus the last caller activity.
///
/// Always starts with exactly one system message; [`reset`](Self::reset)
/// returns it to that shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationState {
    system_prompt: String,
    messages: Vec<Message>,
    last_activity: Option<Instant>,
}

impl ConversationState {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            messages: vec![Message::system(system_prompt.clone())],
            system_prompt,
            last_activity: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::system(self.system_prompt.clone()));
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_activity = Some(now);
    }

    pub fn last_activity(&self) -> Option<Instant> {
        self.last_activity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
