//! Observer seam around each tool execution.
//!
//! Hooks see the combined call, the dispatch context and the elapsed time.
//! Unknown tools never reach them; those settle in the dispatcher.
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use pprovider::ToolCall;
//! use ptooling::{ToolExecutionContext, ToolRuntimeHooks};
//!
//! #[derive(Default)]
//! struct CountStarts(AtomicUsize);
//!
//! impl ToolRuntimeHooks for CountStarts {
//!     fn on_execution_start(&self, _call: &ToolCall, _context: &ToolExecutionContext) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! let hooks = CountStarts::default();
//! hooks.on_execution_start(&ToolCall::new(0, "getWeather", "{}"), &ToolExecutionContext::new("s"));
//! assert_eq!(hooks.0.load(Ordering::Relaxed), 1);
//! ```

use std::time::Duration;

use pprovider::ToolCall;

use crate::{ToolError, ToolExecutionContext};

/// Every method defaults to a no-op.
pub trait ToolRuntimeHooks: Send + Sync {
    fn on_execution_start(&self, _call: &ToolCall, _context: &ToolExecutionContext) {}

    /// `output` is the result text exactly as the model will see it.
    fn on_execution_success(
        &self,
        _call: &ToolCall,
        _context: &ToolExecutionContext,
        _output: &str,
        _elapsed: Duration,
    ) {
    }

    fn on_execution_failure(
        &self,
        _call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToolRuntimeHooks;

impl ToolRuntimeHooks for NoopToolRuntimeHooks {}
