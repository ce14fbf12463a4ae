//! Provider-agnostic request and message model types.
//!
//! ```rust
//! use pprovider::{Message, ModelRequest, ProviderErrorKind};
//!
//! let ok = ModelRequest::new_validated(
//!     "gpt-4o-mini",
//!     vec![Message::user("What's the weather in Paris?")],
//! );
//! assert!(ok.is_ok());
//!
//! let err = ModelRequest::new_validated("", vec![Message::user("hi")])
//!     .err()
//!     .expect("empty model should fail");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//! ```

use std::fmt::{Display, Formatter};

use pcommon::GenerationOptions;

use crate::{ProviderError, ProviderErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenAi,
    Ollama,
    Grok,
    Volcengine,
    Gemini,
    M5Stack,
}

impl ProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Grok => "grok",
            Self::Volcengine => "volcengine",
            Self::Gemini => "gemini",
            Self::M5Stack => "m5stack",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "tool" => Some(Self::Tool),
            _ => None,
        }
    }
}

/// One entry of a conversation transcript.
///
/// A `Tool` message's `tool_call_id` refers to a call emitted by the assistant
/// message directly before its batch of tool messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::new(Role::Assistant, content)
        }
    }

    pub fn tool(tool_call_id: Option<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id,
            ..Self::new(Role::Tool, content)
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the argument object, as JSON text.
    pub input_schema: String,
}

/// A complete, combined tool call as recorded on an assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: Option<String>,
    pub index: u32,
    pub name: String,
    /// Raw JSON argument text; may be empty.
    pub arguments: String,
}

impl ToolCall {
    pub fn new(index: u32, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: None,
            index,
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A partial tool call as delivered by one streamed delta.
///
/// Fragmented backends send many of these per index; atomic backends send
/// exactly one carrying everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolCallFragment {
    pub index: u32,
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: String,
}

impl ToolCallFragment {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn atomic(
        index: u32,
        id: Option<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            index,
            id,
            name: Some(name.into()),
            arguments: arguments.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
    pub tools: Vec<ToolDefinition>,
}

impl ModelRequest {
    pub fn builder(model: impl Into<String>) -> ModelRequestBuilder {
        ModelRequestBuilder::new(model)
    }

    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: GenerationOptions::default(),
            tools: Vec::new(),
        }
    }

    pub fn new_validated(
        model: impl Into<String>,
        messages: Vec<Message>,
    ) -> Result<Self, ProviderError> {
        let request = Self::new(model, messages);
        request.validate()?;
        Ok(request)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn enable_streaming(mut self) -> Self {
        self.options.stream = true;
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one message is required",
            ));
        }

        if let Some(max_tokens) = self.options.max_tokens
            && max_tokens == 0
        {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if let Some(temperature) = self.options.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ProviderError::new(
                ProviderErrorKind::InvalidRequest,
                "temperature must be in the inclusive range 0.0..=2.0",
                false,
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequestBuilder {
    model: String,
    messages: Vec<Message>,
    options: GenerationOptions,
    tools: Vec<ToolDefinition>,
}

impl ModelRequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            options: GenerationOptions::default(),
            tools: Vec::new(),
        }
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn streaming(mut self, stream: bool) -> Self {
        self.options.stream = stream;
        self
    }

    pub fn enable_streaming(self) -> Self {
        self.streaming(true)
    }

    pub fn build(self) -> Result<ModelRequest, ProviderError> {
        let request = ModelRequest {
            model: self.model,
            messages: self.messages,
            options: self.options,
            tools: self.tools,
        };

        request.validate()?;
        Ok(request)
    }
}
