//! Tool trait contract for registry-managed capabilities.
//!
//! ```rust
//! use pprovider::ToolDefinition;
//! use ptooling::{FunctionTool, Tool, ToolError};
//!
//! let tool = FunctionTool::new(
//!     ToolDefinition {
//!         name: "echo".to_string(),
//!         description: "Echoes input".to_string(),
//!         input_schema: r#"{"type":"object"}"#.to_string(),
//!     },
//!     |args, _ctx| async move { Ok::<_, ToolError>(args.to_string()) },
//! );
//!
//! assert_eq!(tool.definition().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use pcommon::BoxFuture;
use pprovider::ToolDefinition;
use serde_json::Value;

use crate::{ToolError, ToolExecutionContext};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Runs the tool with already-parsed arguments.
    fn invoke<'a>(
        &'a self,
        args: Value,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>>;
}

type ToolHandler =
    dyn Fn(Value, ToolExecutionContext) -> ToolFuture<'static, Result<String, ToolError>>
        + Send
        + Sync;

pub struct FunctionTool {
    definition: ToolDefinition,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Value, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |args, context| Box::pin(handler(args, context)));

        Self {
            definition,
            handler,
        }
    }
}

impl Tool for FunctionTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn invoke<'a>(
        &'a self,
        args: Value,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        (self.handler)(args, context.clone())
    }
}
