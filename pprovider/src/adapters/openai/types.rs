//! OpenAI-compatible adapter types and provider-agnostic conversion logic.

use crate::{DeltaEvent, Message, Role, ToolCall, ToolCallFragment, ToolDefinition};

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiRequest {
    pub model: String,
    pub messages: Vec<OpenAiMessage>,
    pub tools: Vec<OpenAiTool>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiMessage {
    pub role: OpenAiRole,
    pub content: String,
    pub tool_calls: Vec<OpenAiToolCall>,
    pub tool_call_id: Option<String>,
}

impl From<Message> for OpenAiMessage {
    fn from(value: Message) -> Self {
        Self {
            role: value.role.into(),
            content: value.content,
            tool_calls: value
                .tool_calls
                .into_iter()
                .map(OpenAiToolCall::from)
                .collect(),
            tool_call_id: value.tool_call_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiRole {
    System,
    User,
    Assistant,
    Tool,
}

impl OpenAiRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl From<Role> for OpenAiRole {
    fn from(value: Role) -> Self {
        match value {
            Role::System => Self::System,
            Role::User => Self::User,
            Role::Assistant => Self::Assistant,
            Role::Tool => Self::Tool,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiTool {
    pub name: String,
    pub description: String,
    pub input_schema: String,
}

impl From<ToolDefinition> for OpenAiTool {
    fn from(value: ToolDefinition) -> Self {
        Self {
            name: value.name,
            description: value.description,
            input_schema: value.input_schema,
        }
    }
}

/// A complete tool call replayed to the backend on a prior assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiToolCall {
    pub id: Option<String>,
    pub index: u32,
    pub name: String,
    pub arguments: String,
}

impl From<ToolCall> for OpenAiToolCall {
    fn from(value: ToolCall) -> Self {
        Self {
            id: value.id,
            index: value.index,
            name: value.name,
            arguments: value.arguments,
        }
    }
}

/// One positional slice of a tool call, exactly as the backend streamed it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenAiToolCallDelta {
    pub index: u32,
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: Option<String>,
}

impl From<OpenAiToolCallDelta> for ToolCallFragment {
    fn from(value: OpenAiToolCallDelta) -> Self {
        Self {
            index: value.index,
            id: value.id.filter(|id| !id.is_empty()),
            name: value.name.filter(|name| !name.is_empty()),
            arguments: value.arguments.unwrap_or_default(),
        }
    }
}

/// The `choices[0].delta` of one SSE frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenAiStreamChunk {
    pub content: Option<String>,
    pub reasoning: Option<String>,
    pub tool_calls: Vec<OpenAiToolCallDelta>,
}

impl From<OpenAiStreamChunk> for DeltaEvent {
    fn from(value: OpenAiStreamChunk) -> Self {
        Self {
            content: value.content,
            reasoning: value.reasoning,
            tool_calls: value
                .tool_calls
                .into_iter()
                .map(ToolCallFragment::from)
                .collect(),
        }
    }
}
