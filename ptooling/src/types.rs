//! Tool runtime context, dispatch result, and result tag types.

use std::fmt::{Display, Formatter};

use pcommon::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionContext {
    pub session_id: SessionId,
    /// Model request round within the current turn, starting at 1.
    pub round: u32,
}

impl ToolExecutionContext {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            round: 1,
        }
    }

    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }
}

/// Outcome of one dispatched call, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDispatchResult {
    pub tool_call_id: Option<String>,
    pub tool_name: String,
    pub result: String,
}

impl ToolDispatchResult {
    pub fn new(
        tool_call_id: Option<String>,
        tool_name: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id,
            tool_name: tool_name.into(),
            result: result.into(),
        }
    }
}

/// Optional prefix a tool may put on its result text.
///
/// ```rust
/// use ptooling::ToolReturnTag;
///
/// let result = ToolReturnTag::Success.tag("light turned on");
/// assert_eq!(result, "[success]light turned on");
/// assert_eq!(ToolReturnTag::classify(&result), Some(ToolReturnTag::Success));
/// assert_eq!(ToolReturnTag::classify("18C, cloudy"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolReturnTag {
    Success,
    Error,
    Response,
}

impl ToolReturnTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "[success]",
            Self::Error => "[error]",
            Self::Response => "[response]",
        }
    }

    pub fn tag(self, body: impl AsRef<str>) -> String {
        format!("{}{}", self.as_str(), body.as_ref())
    }

    pub fn classify(result: &str) -> Option<Self> {
        let trimmed = result.trim_start();
        [Self::Success, Self::Error, Self::Response]
            .into_iter()
            .find(|tag| trimmed.starts_with(tag.as_str()))
    }
}

impl Display for ToolReturnTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
