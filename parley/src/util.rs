//! Small convenience constructors for common types.

use crate::{Message, ProviderId, ToolCall};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::system(content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::user(content)
}

pub fn assistant_message(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Message {
    Message::assistant(content, tool_calls)
}

pub fn tool_message(tool_call_id: impl Into<String>, content: impl Into<String>) -> Message {
    Message::tool(Some(tool_call_id.into()), content)
}

/// Maps an `LLM_SERVER` value to a backend, accepting a few common aliases.
pub fn parse_provider_id(value: &str) -> Option<ProviderId> {
    match value.trim().to_ascii_lowercase().as_str() {
        "openai" => Some(ProviderId::OpenAi),
        "ollama" => Some(ProviderId::Ollama),
        "grok" | "xai" => Some(ProviderId::Grok),
        "volcengine" | "doubao" | "ark" => Some(ProviderId::Volcengine),
        "gemini" | "google" => Some(ProviderId::Gemini),
        "m5stack" | "m5" => Some(ProviderId::M5Stack),
        _ => None,
    }
}

/// Environment prefix for a backend's `<P>_API_KEY`, `<P>_BASE_URL` and
/// `<P>_LLM_MODEL` variables. Ollama uses its own names.
pub fn env_prefix(provider: ProviderId) -> Option<&'static str> {
    match provider {
        ProviderId::OpenAi => Some("OPENAI"),
        ProviderId::Grok => Some("GROK"),
        ProviderId::Volcengine => Some("VOLCENGINE"),
        ProviderId::Gemini => Some("GEMINI"),
        ProviderId::M5Stack => Some("M5STACK"),
        ProviderId::Ollama => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::{ProviderId, Role};

    use super::{env_prefix, parse_provider_id, tool_message, user_message};

    #[test]
    fn parse_provider_id_supports_aliases() {
        assert_eq!(parse_provider_id("openai"), Some(ProviderId::OpenAi));
        assert_eq!(parse_provider_id(" Ollama "), Some(ProviderId::Ollama));
        assert_eq!(parse_provider_id("xai"), Some(ProviderId::Grok));
        assert_eq!(parse_provider_id("doubao"), Some(ProviderId::Volcengine));
        assert_eq!(parse_provider_id("M5STACK"), Some(ProviderId::M5Stack));
        assert_eq!(parse_provider_id("claude"), None);
    }

    #[test]
    fn ollama_has_no_shared_prefix() {
        assert_eq!(env_prefix(ProviderId::Gemini), Some("GEMINI"));
        assert_eq!(env_prefix(ProviderId::Ollama), None);
    }

    #[test]
    fn message_helpers_set_roles() {
        assert_eq!(user_message("hello").role, Role::User);

        let tool = tool_message("call_1", "18C, cloudy");
        assert_eq!(tool.role, Role::Tool);
        assert_eq!(tool.tool_call_id.as_deref(), Some("call_1"));
    }
}
