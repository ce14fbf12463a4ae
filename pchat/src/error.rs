//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use pprovider::{ProviderError, ProviderErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    /// The provider stream failed to start or dropped mid-turn.
    Provider,
    Store,
    /// The model kept requesting tools past the configured round-trip bound.
    ToolLoopLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub provider_kind: Option<ProviderErrorKind>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider_kind: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn tool_loop_limit(max_round_trips: u32) -> Self {
        Self::new(
            ChatErrorKind::ToolLoopLimit,
            format!("model requested tools after {max_round_trips} round trips"),
        )
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.provider_kind,
            Some(
                ProviderErrorKind::RateLimited
                    | ProviderErrorKind::Timeout
                    | ProviderErrorKind::Transport
                    | ProviderErrorKind::Unavailable
            )
        )
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        Self {
            kind: ChatErrorKind::Provider,
            message: value.to_string(),
            provider_kind: Some(value.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_kind() {
        let error = ChatError::from(ProviderError::timeout("stream stalled"));

        assert_eq!(error.kind, ChatErrorKind::Provider);
        assert_eq!(error.provider_kind, Some(ProviderErrorKind::Timeout));
        assert!(error.is_retryable());
        assert_eq!(error.to_string(), "Provider: Timeout: stream stalled");
    }

    #[test]
    fn loop_limit_is_not_retryable() {
        let error = ChatError::tool_loop_limit(8);
        assert_eq!(error.kind, ChatErrorKind::ToolLoopLimit);
        assert!(!error.is_retryable());
    }
}
