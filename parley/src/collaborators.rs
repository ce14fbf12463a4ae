//! Interfaces for the speech collaborators around a voice turn.
//!
//! Audio capture, playback and the speech models themselves live outside this
//! workspace. A front end transcribes the user's audio, runs a chat turn with
//! the text, then synthesizes the answer.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

use crate::BoxFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorErrorKind {
    Unavailable,
    InvalidInput,
    Backend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorError {
    pub kind: CollaboratorErrorKind,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(kind: CollaboratorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorKind::Unavailable, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorKind::InvalidInput, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorKind::Backend, message)
    }
}

impl Display for CollaboratorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for CollaboratorError {}

/// Synthesized speech plus an estimate of how long it plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    pub duration_ms: u64,
}

pub trait SpeechToText: Send + Sync {
    /// Transcribes a recorded audio file.
    fn transcribe<'a>(
        &'a self,
        audio: &'a Path,
    ) -> BoxFuture<'a, Result<String, CollaboratorError>>;
}

pub trait TextToSpeech: Send + Sync {
    fn synthesize<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, Result<SpeechAudio, CollaboratorError>>;
}
