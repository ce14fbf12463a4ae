//! Memory-layer errors for transcript persistence.

use std::error::Error;
use std::fmt::{Display, Formatter};

use pchat::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryErrorKind {
    Storage,
    /// The transcript document does not match the expected JSON shape.
    Serialization,
    NotFound,
    InvalidRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryError {
    pub kind: MemoryErrorKind,
    pub message: String,
}

impl MemoryError {
    pub fn new(kind: MemoryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(MemoryErrorKind::Storage, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(MemoryErrorKind::Serialization, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(MemoryErrorKind::NotFound, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(MemoryErrorKind::InvalidRequest, message)
    }
}

impl Display for MemoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for MemoryError {}

impl From<MemoryError> for ChatError {
    fn from(value: MemoryError) -> Self {
        ChatError::store(value.to_string())
    }
}
