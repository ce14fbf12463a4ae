//! Ollama `/api/chat` payload models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DeltaEvent, Message, ProviderError, Role, ToolCallFragment, ToolDefinition};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<OllamaTool>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<OllamaToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaToolCall {
    pub function: OllamaFunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaFunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OllamaTool {
    pub r#type: String,
    pub function: OllamaToolFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OllamaToolFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl TryFrom<ToolDefinition> for OllamaTool {
    type Error = ProviderError;

    fn try_from(value: ToolDefinition) -> Result<Self, Self::Error> {
        let parameters = serde_json::from_str::<Value>(&value.input_schema)
            .map_err(|_| ProviderError::invalid_request("Ollama tool schema must be valid JSON"))?;

        Ok(Self {
            r#type: "function".to_string(),
            function: OllamaToolFunction {
                name: value.name,
                description: value.description,
                parameters,
            },
        })
    }
}

/// One NDJSON line of a streamed `/api/chat` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OllamaChunk {
    #[serde(default)]
    pub message: Option<OllamaMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl OllamaChunk {
    pub(crate) fn parse(line: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(line)
            .map_err(|err| ProviderError::protocol(format!("malformed stream line: {err}")))
    }

    /// Converts to a delta, numbering tool calls from `next_index` when the
    /// backend omits `index`.
    pub(crate) fn into_delta(self, next_index: &mut u32) -> DeltaEvent {
        let Some(message) = self.message else {
            return DeltaEvent::default();
        };

        let tool_calls = message
            .tool_calls
            .into_iter()
            .map(|call| {
                let index = call.function.index.unwrap_or(*next_index);
                *next_index = (*next_index).max(index.saturating_add(1));
                let arguments = match call.function.arguments {
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                ToolCallFragment::atomic(
                    index,
                    Some(synthesized_call_id(index)),
                    call.function.name,
                    arguments,
                )
            })
            .collect();

        DeltaEvent {
            content: Some(message.content).filter(|content| !content.is_empty()),
            reasoning: message.thinking.filter(|thinking| !thinking.is_empty()),
            tool_calls,
        }
    }
}

pub(crate) fn synthesized_call_id(index: u32) -> String {
    format!("call_{index}")
}

/// Maps the transcript to Ollama messages, resolving each tool message's
/// `tool_name` from the assistant call it answers.
pub(crate) fn build_messages(messages: Vec<Message>) -> Vec<OllamaMessage> {
    let mut last_calls: Vec<(String, String)> = Vec::new();
    let mut mapped = Vec::with_capacity(messages.len());

    for message in messages {
        let tool_name = if message.role == Role::Tool {
            last_calls
                .iter()
                .find(|(id, _)| message.tool_call_id.as_ref() == Some(id))
                .map(|(_, name)| name.clone())
        } else {
            None
        };

        if message.role == Role::Assistant {
            last_calls = message
                .tool_calls
                .iter()
                .map(|call| {
                    let id = call
                        .id
                        .clone()
                        .unwrap_or_else(|| synthesized_call_id(call.index));
                    (id, call.name.clone())
                })
                .collect();
        }

        let tool_calls = message
            .tool_calls
            .into_iter()
            .map(|call| OllamaToolCall {
                function: OllamaFunctionCall {
                    index: Some(call.index),
                    name: call.name,
                    arguments: serde_json::from_str(&call.arguments)
                        .unwrap_or_else(|_| Value::Object(Default::default())),
                },
            })
            .collect();

        mapped.push(OllamaMessage {
            role: message.role.as_str().to_string(),
            content: message.content,
            thinking: None,
            tool_calls,
            tool_name,
        });
    }

    mapped
}
