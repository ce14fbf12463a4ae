//! OpenAI-compatible HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ProviderError;

use super::types::{
    OpenAiMessage, OpenAiRequest, OpenAiStreamChunk, OpenAiTool, OpenAiToolCall,
    OpenAiToolCallDelta,
};

pub(crate) fn build_api_request(request: OpenAiRequest) -> Result<OpenAiApiRequest, ProviderError> {
    let messages = request
        .messages
        .into_iter()
        .map(OpenAiApiMessage::from)
        .collect::<Vec<_>>();

    if messages.is_empty() {
        return Err(ProviderError::invalid_request(
            "OpenAI request requires at least one message",
        ));
    }

    let tools = if request.tools.is_empty() {
        None
    } else {
        Some(
            request
                .tools
                .into_iter()
                .map(OpenAiApiTool::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        )
    };

    Ok(OpenAiApiRequest {
        model: request.model,
        messages,
        tools,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        stream: request.stream,
    })
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<OpenAiApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

/// What one SSE `data:` payload means for the stream.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SseFrame {
    Chunk(OpenAiStreamChunk),
    Done,
}

/// Parses one SSE line; `None` for comments, blank lines, or other fields.
pub(crate) fn parse_sse_line(line: &str) -> Option<Result<SseFrame, ProviderError>> {
    let payload = line.trim().strip_prefix("data:")?.trim();
    if payload.is_empty() {
        return None;
    }

    if payload == "[DONE]" {
        return Some(Ok(SseFrame::Done));
    }

    let parsed = serde_json::from_str::<OpenAiApiStreamResponse>(payload)
        .map_err(|err| ProviderError::protocol(format!("malformed stream frame: {err}")));

    Some(parsed.and_then(|mut response| match response.error.take() {
        Some(error) => Err(error.into_provider_error()),
        None => Ok(SseFrame::Chunk(response.into_chunk())),
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiErrorEnvelope {
    pub error: OpenAiApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiError {
    pub message: String,
    #[serde(default)]
    pub code: Option<Value>,
}

impl OpenAiApiError {
    /// Error frames sent mid-stream; numeric codes are read as HTTP statuses.
    fn into_provider_error(self) -> ProviderError {
        let status = self
            .code
            .as_ref()
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok());

        match status {
            Some(status) => ProviderError::from_http_status(status, self.message),
            None => ProviderError::unavailable(format!("stream error: {}", self.message)),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiRequest {
    pub model: String,
    pub messages: Vec<OpenAiApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAiApiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAiApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

// Empty content is forwarded as-is; the backend decides whether to accept it.
impl From<OpenAiMessage> for OpenAiApiMessage {
    fn from(value: OpenAiMessage) -> Self {
        let tool_calls = if value.tool_calls.is_empty() {
            None
        } else {
            Some(
                value
                    .tool_calls
                    .into_iter()
                    .map(OpenAiApiToolCall::from)
                    .collect(),
            )
        };

        Self {
            role: value.role.as_str().to_string(),
            content: value.content,
            tool_calls,
            tool_call_id: value.tool_call_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiToolCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub index: u32,
    pub r#type: String,
    pub function: OpenAiApiToolCallFunction,
}

impl From<OpenAiToolCall> for OpenAiApiToolCall {
    fn from(value: OpenAiToolCall) -> Self {
        Self {
            id: value.id,
            index: value.index,
            r#type: "function".to_string(),
            function: OpenAiApiToolCallFunction {
                name: value.name,
                arguments: value.arguments,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiToolCallFunction {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiTool {
    pub r#type: String,
    pub function: OpenAiApiFunction,
}

impl TryFrom<OpenAiTool> for OpenAiApiTool {
    type Error = ProviderError;

    fn try_from(value: OpenAiTool) -> Result<Self, Self::Error> {
        let parameters = serde_json::from_str::<Value>(&value.input_schema)
            .map_err(|_| ProviderError::invalid_request("OpenAI tool schema must be valid JSON"))?;

        Ok(Self {
            r#type: "function".to_string(),
            function: OpenAiApiFunction {
                name: value.name,
                description: value.description,
                parameters,
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiStreamResponse {
    #[serde(default)]
    pub choices: Vec<OpenAiApiStreamChoice>,
    #[serde(default)]
    pub error: Option<OpenAiApiError>,
}

impl OpenAiApiStreamResponse {
    fn into_chunk(self) -> OpenAiStreamChunk {
        let Some(choice) = self.choices.into_iter().next() else {
            return OpenAiStreamChunk::default();
        };

        let delta = choice.delta;
        OpenAiStreamChunk {
            content: delta.content,
            reasoning: delta.reasoning_content,
            tool_calls: delta
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(position, call)| {
                    let function = call.function.unwrap_or_default();
                    OpenAiToolCallDelta {
                        index: call.index.unwrap_or(position as u32),
                        id: call.id,
                        name: function.name,
                        arguments: function.arguments,
                    }
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiStreamChoice {
    #[serde(default)]
    pub delta: OpenAiApiStreamDelta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OpenAiApiStreamDelta {
    pub content: Option<String>,
    pub reasoning_content: Option<String>,
    pub tool_calls: Option<Vec<OpenAiApiDeltaToolCall>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiDeltaToolCall {
    pub index: Option<u32>,
    pub id: Option<String>,
    pub function: Option<OpenAiApiDeltaToolFunction>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OpenAiApiDeltaToolFunction {
    pub name: Option<String>,
    pub arguments: Option<String>,
}
