//! On-disk transcript shape: a JSON array of messages in OpenAI chat form.

use pprovider::{Message, Role, ToolCall};
use serde::{Deserialize, Serialize};

use crate::MemoryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<StoredToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    index: u32,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: StoredFunction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

impl From<&Message> for StoredMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
            tool_calls: message
                .tool_calls
                .iter()
                .map(|call| StoredToolCall {
                    id: call.id.clone(),
                    index: call.index,
                    kind: function_type(),
                    function: StoredFunction {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect(),
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

impl TryFrom<StoredMessage> for Message {
    type Error = MemoryError;

    fn try_from(value: StoredMessage) -> Result<Self, Self::Error> {
        let role = Role::parse(&value.role).ok_or_else(|| {
            MemoryError::serialization(format!("unknown message role '{}'", value.role))
        })?;

        Ok(Message {
            role,
            content: value.content,
            tool_calls: value
                .tool_calls
                .into_iter()
                .map(|call| ToolCall {
                    id: call.id,
                    index: call.index,
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect(),
            tool_call_id: value.tool_call_id,
        })
    }
}

pub(crate) fn encode(messages: &[Message]) -> Result<Vec<u8>, MemoryError> {
    let stored = messages.iter().map(StoredMessage::from).collect::<Vec<_>>();
    serde_json::to_vec_pretty(&stored).map_err(|error| {
        MemoryError::serialization(format!("failed to serialize transcript: {error}"))
    })
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Vec<Message>, MemoryError> {
    let stored = serde_json::from_slice::<Vec<StoredMessage>>(bytes).map_err(|error| {
        MemoryError::serialization(format!("failed to deserialize transcript: {error}"))
    })?;

    stored.into_iter().map(Message::try_from).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn assistant_tool_calls_use_the_function_shape() {
        let messages = vec![
            Message::assistant(
                "",
                vec![ToolCall::new(0, "getWeather", "{\"city\":\"Paris\"}").with_id("call_1")],
            ),
            Message::tool(Some("call_1".to_string()), "18C, cloudy"),
        ];

        let value: Value = serde_json::from_slice(&encode(&messages).expect("encode"))
            .expect("valid json");

        assert_eq!(
            value,
            json!([
                {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{
                        "id": "call_1",
                        "index": 0,
                        "type": "function",
                        "function": { "name": "getWeather", "arguments": "{\"city\":\"Paris\"}" }
                    }]
                },
                { "role": "tool", "content": "18C, cloudy", "tool_call_id": "call_1" }
            ])
        );
    }

    #[test]
    fn unknown_roles_are_rejected() {
        let error = decode(br#"[{"role":"narrator","content":"once upon a time"}]"#)
            .expect_err("unknown role should fail");

        assert_eq!(error.kind, crate::MemoryErrorKind::Serialization);
    }

    #[test]
    fn missing_optional_fields_decode_with_defaults() {
        let messages =
            decode(br#"[{"role":"system"},{"role":"assistant","content":"hi","tool_calls":[{"function":{"name":"getTime"}}]}]"#)
                .expect("decode");

        assert_eq!(messages[0], Message::system(""));
        assert_eq!(messages[1].tool_calls, vec![ToolCall::new(0, "getTime", "")]);
    }
}
