//! Transcript persistence contract and an in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use pcommon::{BoxFuture, SessionId};
use pprovider::Message;

use crate::ChatError;

pub type ChatFuture<'a, T> = BoxFuture<'a, T>;

/// Receives the full transcript after every terminal turn.
///
/// Each save replaces the previous snapshot for the session.
pub trait TranscriptStore: Send + Sync {
    fn save<'a>(
        &'a self,
        session_id: &'a SessionId,
        messages: &'a [Message],
    ) -> ChatFuture<'a, Result<(), ChatError>>;

    fn load<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> ChatFuture<'a, Result<Option<Vec<Message>>, ChatError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryTranscriptStore {
    sessions: Mutex<HashMap<SessionId, Vec<Message>>>,
    saves: Mutex<usize>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|saves| *saves).unwrap_or_default()
    }
}

impl TranscriptStore for InMemoryTranscriptStore {
    fn save<'a>(
        &'a self,
        session_id: &'a SessionId,
        messages: &'a [Message],
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|_| ChatError::store("transcript store lock poisoned"))?;
            sessions.insert(session_id.clone(), messages.to_vec());

            let mut saves = self
                .saves
                .lock()
                .map_err(|_| ChatError::store("transcript store lock poisoned"))?;
            *saves += 1;

            Ok(())
        })
    }

    fn load<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> ChatFuture<'a, Result<Option<Vec<Message>>, ChatError>> {
        Box::pin(async move {
            let sessions = self
                .sessions
                .lock()
                .map_err(|_| ChatError::store("transcript store lock poisoned"))?;

            Ok(sessions.get(session_id).cloned())
        })
    }
}
