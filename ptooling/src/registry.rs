//! Tool registry for lookup by tool definition name.
//!
//! ```rust
//! use pprovider::ToolDefinition;
//! use ptooling::ToolRegistry;
//!
//! let mut registry = ToolRegistry::new();
//! registry.register_sync_fn(
//!     ToolDefinition {
//!         name: "getWeather".to_string(),
//!         description: "Current weather for a city".to_string(),
//!         input_schema: r#"{"type":"object"}"#.to_string(),
//!     },
//!     |_args, _ctx| Ok("18C, cloudy".to_string()),
//! );
//!
//! assert!(registry.contains("getWeather"));
//! assert_eq!(registry.definitions().len(), 1);
//! ```

use std::future::Future;
use std::sync::Arc;

use pcommon::Registry;
use pprovider::ToolDefinition;
use serde_json::Value;

use crate::{FunctionTool, Tool, ToolError, ToolExecutionContext};

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under the definition name, replacing any earlier tool.
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        let name = tool.definition().name;
        if self.tools.insert(name.clone(), Arc::new(tool)).is_some() {
            tracing::debug!(tool = %name, "replaced registered tool");
        }
    }

    pub fn register_fn<F, Fut>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(Value, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(definition, handler));
    }

    pub fn register_sync_fn<F>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(Value, ToolExecutionContext) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register_fn(definition, move |args, context| {
            let output = handler(args, context);
            async move { output }
        });
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    /// Definitions to advertise to the model, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions = self
            .tools
            .values()
            .map(|tool| tool.definition())
            .collect::<Vec<_>>();
        definitions.sort_by(|left, right| left.name.cmp(&right.name));
        definitions
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
