//! Tool execution errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// No tool with the requested name is registered.
    Unregistered,
    /// A registered tool could not find what it was asked about.
    NotFound,
    InvalidArguments,
    Execution,
    /// A device or service the tool drives could not be reached.
    Unavailable,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
        }
    }

    pub fn unregistered(tool_name: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        Self::new(
            ToolErrorKind::Unregistered,
            format!("tool '{tool_name}' is not registered"),
        )
        .with_tool_name(tool_name)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Unavailable, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Other, message)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::InvalidArguments
                | ToolErrorKind::NotFound
                | ToolErrorKind::Unregistered
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.tool_name {
            Some(tool_name) => write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_classified() {
        assert!(ToolError::invalid_arguments("bad args").is_user_error());
        assert!(!ToolError::unavailable("speaker offline").is_user_error());
    }

    #[test]
    fn unregistered_is_distinct_from_not_found() {
        let error = ToolError::unregistered("launchRocket");
        assert_eq!(error.kind, ToolErrorKind::Unregistered);
        assert_eq!(
            error.to_string(),
            "Unregistered [tool=launchRocket]: tool 'launchRocket' is not registered"
        );
        assert_ne!(ToolError::not_found("note 42").kind, error.kind);
    }

    #[test]
    fn tool_name_is_included_in_display() {
        let error = ToolError::execution("lamp unreachable").with_tool_name("setLight");
        assert_eq!(
            error.to_string(),
            "Execution [tool=setLight]: lamp unreachable"
        );
    }
}
