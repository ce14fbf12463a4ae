//! Provider error kinds and error value helpers.
//!
//! ```rust
//! use pprovider::{ProviderError, ProviderErrorKind};
//!
//! let auth = ProviderError::authentication("bad key");
//! assert!(!auth.retryable);
//!
//! let busy = ProviderError::from_http_status(503, "model is loading");
//! assert_eq!(busy.kind, ProviderErrorKind::Unavailable);
//! assert!(busy.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    InvalidRequest,
    Timeout,
    Transport,
    Unavailable,
    /// The backend sent bytes that do not decode as the expected wire shape.
    Protocol,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message, true)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, true)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message, true)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message, true)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Protocol, message, false)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message, false)
    }

    /// Maps a non-success HTTP status from any backend to a normalized error.
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::authentication(message),
            429 => Self::rate_limited(message),
            408 | 504 => Self::timeout(message),
            400 | 422 => Self::invalid_request(message),
            502 | 503 => Self::unavailable(message),
            _ => Self::transport(format!("http status {status}: {message}")),
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_kinds() {
        let cases = [
            (401, ProviderErrorKind::Authentication),
            (403, ProviderErrorKind::Authentication),
            (429, ProviderErrorKind::RateLimited),
            (408, ProviderErrorKind::Timeout),
            (504, ProviderErrorKind::Timeout),
            (400, ProviderErrorKind::InvalidRequest),
            (422, ProviderErrorKind::InvalidRequest),
            (502, ProviderErrorKind::Unavailable),
            (503, ProviderErrorKind::Unavailable),
            (500, ProviderErrorKind::Transport),
        ];

        for (status, kind) in cases {
            assert_eq!(ProviderError::from_http_status(status, "x").kind, kind);
        }
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = ProviderError::protocol("bad frame");
        assert_eq!(error.to_string(), "Protocol: bad frame");
    }
}
