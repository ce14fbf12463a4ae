//! Capability layer for registering, parsing arguments for, and concurrently
//! dispatching model-requested tool calls.

mod args;
mod dispatcher;
mod error;
mod hooks;
mod registry;
mod runtime;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        DefaultToolRuntime, InvocationObserver, Tool, ToolDispatchResult, ToolDispatcher,
        ToolError, ToolErrorKind, ToolExecutionContext, ToolFuture, ToolRegistry,
        ToolReturnTag, ToolRuntime, ToolRuntimeHooks, parse_arguments,
    };
}

pub use args::{optional_string, parse_arguments, parse_json_value, required_string};
pub use dispatcher::{InvocationObserver, ToolDispatcher, ignore_invocations};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::ToolRegistry;
pub use runtime::{DefaultToolRuntime, ToolRuntime};
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{ToolDispatchResult, ToolExecutionContext, ToolReturnTag};
