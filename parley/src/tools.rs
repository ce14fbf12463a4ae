//! Built-in tools shipped with the CLI.

use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;

use crate::{
    Tool, ToolDefinition, ToolError, ToolExecutionContext, ToolFuture, ToolRegistry,
    ToolReturnTag,
};

pub const CURRENT_TIME_TOOL: &str = "getCurrentTime";

/// Reports the local date and time as a `[response]` tagged result.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentTimeTool;

impl CurrentTimeTool {
    pub fn describe<Tz>(now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        ToolReturnTag::Response.tag(format!(
            "It is {} on {}.",
            now.format("%H:%M"),
            now.format("%A, %B %-d, %Y")
        ))
    }
}

impl Tool for CurrentTimeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: CURRENT_TIME_TOOL.to_string(),
            description: "Get the current local date and time".to_string(),
            input_schema: r#"{"type":"object","properties":{}}"#.to_string(),
        }
    }

    fn invoke<'a>(
        &'a self,
        _args: Value,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        Box::pin(async move { Ok(Self::describe(&Local::now())) })
    }
}

/// Registry holding every built-in tool.
pub fn builtin_tools() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(CurrentTimeTool);
    registry
}
