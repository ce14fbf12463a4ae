//! Environment configuration.
//!
//! Values come from process environment variables, after loading a `.env`
//! file when one exists. Every setting has a default, so an empty
//! environment yields a usable OpenAI configuration minus the API key.
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::time::Duration;
//!
//! use parley::{ParleyConfig, ProviderId};
//!
//! let vars = HashMap::from([
//!     ("LLM_SERVER", "ollama"),
//!     ("OLLAMA_MODEL", "llama3.2"),
//!     ("CHAT_HISTORY_RESET_TIME", "120"),
//! ]);
//! let config = ParleyConfig::from_lookup(|key| vars.get(key).map(|value| value.to_string()))
//!     .expect("valid configuration");
//!
//! assert_eq!(config.provider, ProviderId::Ollama);
//! assert_eq!(config.model.as_deref(), Some("llama3.2"));
//! assert_eq!(config.reset_after, Duration::from_secs(120));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::util::{env_prefix, parse_provider_id};
use crate::{ChatPolicy, DEFAULT_SYSTEM_PROMPT, ProviderBuildConfig, ProviderId};

pub const DEFAULT_HISTORY_DIR: &str = "./data/chat_history";
pub const DEFAULT_RESET_AFTER_SECS: u64 = 300;
pub const DEFAULT_MAX_TOOL_ROUND_TRIPS: u32 = 8;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;
pub const M5STACK_DEFAULT_API_KEY: &str = "sk-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    UnknownProvider,
    InvalidValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_provider(value: &str) -> Self {
        Self::new(
            ConfigErrorKind::UnknownProvider,
            format!(
                "unknown LLM_SERVER '{value}', expected one of openai, ollama, grok, volcengine, gemini, m5stack"
            ),
        )
    }

    pub fn invalid_value(key: &str, value: &str, expected: &str) -> Self {
        Self::new(
            ConfigErrorKind::InvalidValue,
            format!("{key} must be {expected}, got '{value}'"),
        )
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ParleyConfig {
    pub provider: ProviderId,
    pub api_key: Option<String>,
    /// Base URL for OpenAI-compatible backends, endpoint root for Ollama.
    pub base_url: Option<String>,
    /// `None` defers to the backend's default model.
    pub model: Option<String>,
    pub system_prompt: String,
    pub reset_after: Duration,
    pub history_dir: PathBuf,
    pub max_tool_round_trips: u32,
    pub request_timeout: Duration,
}

impl ParleyConfig {
    /// Defaults for `provider` with nothing read from the environment.
    pub fn for_provider(provider: ProviderId) -> Self {
        Self {
            provider,
            api_key: (provider == ProviderId::M5Stack)
                .then(|| M5STACK_DEFAULT_API_KEY.to_string()),
            base_url: None,
            model: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            reset_after: Duration::from_secs(DEFAULT_RESET_AFTER_SECS),
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            max_tool_round_trips: DEFAULT_MAX_TOOL_ROUND_TRIPS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&[])
    }

    /// Like [`Self::from_env`], with `overrides` taking precedence.
    pub fn from_env_with(overrides: &[(&str, &str)]) -> Result<Self, ConfigError> {
        if let Err(error) = dotenvy::dotenv()
            && !error.not_found()
        {
            tracing::warn!(error = %error, "failed to load .env file");
        }

        Self::from_lookup(|key| {
            overrides
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
                .or_else(|| std::env::var(key).ok())
        })
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let provider = match get("LLM_SERVER") {
            Some(value) => {
                parse_provider_id(&value).ok_or_else(|| ConfigError::unknown_provider(&value))?
            }
            None => ProviderId::OpenAi,
        };

        let mut config = Self::for_provider(provider);

        match env_prefix(provider) {
            Some(prefix) => {
                if let Some(api_key) = get(&format!("{prefix}_API_KEY")) {
                    config.api_key = Some(api_key);
                }
                config.base_url = get(&format!("{prefix}_BASE_URL"));
                config.model = get(&format!("{prefix}_LLM_MODEL"));
            }
            None => {
                config.base_url = get("OLLAMA_ENDPOINT");
                config.model = get("OLLAMA_MODEL");
            }
        }

        if let Some(system_prompt) = get("SYSTEM_PROMPT") {
            config.system_prompt = system_prompt;
        }

        let reset_after =
            parse_var::<u64>(&get, "CHAT_HISTORY_RESET_TIME", "a whole number of seconds")?;
        if let Some(secs) = reset_after {
            config.reset_after = Duration::from_secs(secs);
        }

        if let Some(dir) = get("CHAT_HISTORY_DIR") {
            config.history_dir = PathBuf::from(dir);
        }

        let max_round_trips =
            parse_var::<u32>(&get, "MAX_TOOL_ROUND_TRIPS", "a non-negative integer")?;
        if let Some(max) = max_round_trips {
            config.max_tool_round_trips = max;
        }

        let timeout =
            parse_var::<u64>(&get, "LLM_REQUEST_TIMEOUT_SECS", "a positive number of seconds")?;
        if let Some(secs) = timeout {
            if secs == 0 {
                return Err(ConfigError::invalid_value(
                    "LLM_REQUEST_TIMEOUT_SECS",
                    "0",
                    "a positive number of seconds",
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn chat_policy(&self) -> ChatPolicy {
        ChatPolicy::new(self.model.clone().unwrap_or_default())
            .with_system_prompt(self.system_prompt.clone())
            .with_reset_after(self.reset_after)
            .with_max_tool_round_trips(self.max_tool_round_trips)
    }

    pub fn provider_build_config(&self) -> ProviderBuildConfig {
        let mut build = ProviderBuildConfig::new(self.provider).with_timeout(self.request_timeout);
        if let Some(api_key) = &self.api_key {
            build = build.with_api_key(api_key.clone());
        }
        if let Some(base_url) = &self.base_url {
            build = build.with_base_url(base_url.clone());
        }
        if let Some(model) = &self.model {
            build = build.with_model(model.clone());
        }
        build
    }
}

fn parse_var<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    expected: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
{
    get(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| ConfigError::invalid_value(key, &value, expected))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ParleyConfig, ConfigError> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        ParleyConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).expect("defaults");

        assert_eq!(config.provider, ProviderId::OpenAi);
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, None);
        assert_eq!(config.reset_after, Duration::from_secs(300));
        assert_eq!(config.history_dir, PathBuf::from("./data/chat_history"));
        assert_eq!(config.max_tool_round_trips, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(90));
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn backend_prefixed_variables_are_read() {
        let config = config_from(&[
            ("LLM_SERVER", "volcengine"),
            ("VOLCENGINE_API_KEY", "ark-key"),
            ("VOLCENGINE_BASE_URL", "https://ark.example/api/v3"),
            ("VOLCENGINE_LLM_MODEL", "doubao-pro"),
            ("OPENAI_API_KEY", "ignored"),
        ])
        .expect("valid");

        assert_eq!(config.provider, ProviderId::Volcengine);
        assert_eq!(config.api_key.as_deref(), Some("ark-key"));
        assert_eq!(config.base_url.as_deref(), Some("https://ark.example/api/v3"));
        assert_eq!(config.model.as_deref(), Some("doubao-pro"));
    }

    #[test]
    fn m5stack_defaults_to_placeholder_key() {
        let config = config_from(&[("LLM_SERVER", "m5stack")]).expect("valid");

        assert_eq!(config.api_key.as_deref(), Some("sk-"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config =
            config_from(&[("LLM_SERVER", "  "), ("OPENAI_LLM_MODEL", "")]).expect("valid");

        assert_eq!(config.provider, ProviderId::OpenAi);
        assert_eq!(config.model, None);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let error = config_from(&[("LLM_SERVER", "claude")]).expect_err("unknown backend");

        assert_eq!(error.kind, ConfigErrorKind::UnknownProvider);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let error = config_from(&[("CHAT_HISTORY_RESET_TIME", "five minutes")])
            .expect_err("not a number");

        assert_eq!(error.kind, ConfigErrorKind::InvalidValue);
        assert!(error.message.contains("CHAT_HISTORY_RESET_TIME"));

        let error = config_from(&[("LLM_REQUEST_TIMEOUT_SECS", "0")]).expect_err("zero timeout");
        assert_eq!(error.kind, ConfigErrorKind::InvalidValue);
    }

    #[test]
    fn policy_carries_configured_values() {
        let config = config_from(&[
            ("LLM_SERVER", "ollama"),
            ("OLLAMA_MODEL", "llama3.2"),
            ("SYSTEM_PROMPT", "Answer tersely."),
            ("MAX_TOOL_ROUND_TRIPS", "3"),
        ])
        .expect("valid");

        let policy = config.chat_policy();
        assert_eq!(policy.model, "llama3.2");
        assert_eq!(policy.system_prompt, "Answer tersely.");
        assert_eq!(policy.max_tool_round_trips, 3);
        assert!(policy.options.stream);
    }
}
