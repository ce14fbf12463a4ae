//! Tool runtime trait and default registry-backed executor.

use std::sync::Arc;
use std::time::Instant;

use pprovider::ToolCall;

use crate::{
    NoopToolRuntimeHooks, ToolError, ToolExecutionContext, ToolFuture, ToolRegistry,
    ToolRuntimeHooks, parse_arguments,
};

pub trait ToolRuntime: Send + Sync {
    /// Executes one call; `Err` with kind `Unregistered` when the name is unknown.
    fn execute<'a>(
        &'a self,
        tool_call: &'a ToolCall,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>>;
}

#[derive(Clone)]
pub struct DefaultToolRuntime {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl Default for DefaultToolRuntime {
    fn default() -> Self {
        Self::new(Arc::new(ToolRegistry::new()))
    }
}

impl DefaultToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }
}

impl ToolRuntime for DefaultToolRuntime {
    fn execute<'a>(
        &'a self,
        tool_call: &'a ToolCall,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks.on_execution_start(tool_call, context);

            let result = match self.registry.get(&tool_call.name) {
                Some(tool) => {
                    let args = parse_arguments(&tool_call.arguments);
                    tool.invoke(args, context)
                        .await
                        .map_err(|error| error.with_tool_name(&tool_call.name))
                }
                None => Err(ToolError::unregistered(&tool_call.name)),
            };

            match &result {
                Ok(output) => {
                    self.hooks
                        .on_execution_success(tool_call, context, output, started.elapsed())
                }
                Err(error) => {
                    self.hooks
                        .on_execution_failure(tool_call, context, error, started.elapsed())
                }
            }

            result
        })
    }
}
