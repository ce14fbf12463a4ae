//! Concurrent dispatch of one batch of combined tool calls.
//!
//! Every call in a batch settles independently. Failures and panics become
//! result text for the model instead of errors, so a batch as a whole never
//! fails.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use pprovider::ToolCall;

use crate::{
    DefaultToolRuntime, ToolDispatchResult, ToolErrorKind, ToolExecutionContext, ToolRegistry,
    ToolRuntime,
};

/// Observes tool invocations: `(name, None)` when a call starts and
/// `(name, Some(result))` when a registered tool succeeds.
pub type InvocationObserver<'a> = dyn Fn(&str, Option<&str>) + Send + Sync + 'a;

pub fn ignore_invocations(_name: &str, _result: Option<&str>) {}

#[derive(Clone)]
pub struct ToolDispatcher {
    runtime: Arc<dyn ToolRuntime>,
}

impl ToolDispatcher {
    pub fn new(runtime: Arc<dyn ToolRuntime>) -> Self {
        Self { runtime }
    }

    pub fn from_registry(registry: Arc<ToolRegistry>) -> Self {
        Self::new(Arc::new(DefaultToolRuntime::new(registry)))
    }

    /// Runs every call concurrently and returns results in settlement order.
    pub async fn dispatch_all(
        &self,
        calls: &[ToolCall],
        context: &ToolExecutionContext,
        observer: &InvocationObserver<'_>,
    ) -> Vec<ToolDispatchResult> {
        let mut pending = FuturesUnordered::new();

        for call in calls {
            observer(&call.name, None);
            pending.push(async move {
                let execution = AssertUnwindSafe(async {
                    self.runtime.execute(call, context).await
                })
                .catch_unwind()
                .await;

                let result = match execution {
                    Ok(Ok(output)) => {
                        observer(&call.name, Some(&output));
                        output
                    }
                    Ok(Err(error)) if error.kind == ToolErrorKind::Unregistered => {
                        tracing::warn!(tool = %call.name, "model requested an unregistered tool");
                        format!("Function {} not found", call.name)
                    }
                    Ok(Err(error)) => {
                        tracing::warn!(tool = %call.name, error = %error, "tool execution failed");
                        format!("Error executing function {}: {}", call.name, error.message)
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        tracing::warn!(tool = %call.name, panic = message, "tool panicked");
                        format!("Error executing function {}: {}", call.name, message)
                    }
                };

                ToolDispatchResult::new(call.id.clone(), call.name.clone(), result)
            });
        }

        let mut results = Vec::with_capacity(calls.len());
        while let Some(result) = pending.next().await {
            results.push(result);
        }

        results
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("tool panicked")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use pprovider::ToolDefinition;
    use serde_json::Value;

    use super::*;
    use crate::{ToolError, required_string};

    fn definition(name: &str) -> ToolDefinition {
        ToolDefinition {
            name: name.to_string(),
            description: format!("{name} tool"),
            input_schema: "{\"type\":\"object\"}".to_string(),
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register_sync_fn(definition("getWeather"), |args: Value, _ctx| {
            let city = required_string(&args, "city")?;
            Ok(format!("18C, cloudy in {city}"))
        });
        registry.register_fn(definition("slow"), |_args, _ctx| async {
            tokio::time::sleep(Duration::from_millis(80)).await;
            Ok::<_, ToolError>("slow done".to_string())
        });
        registry.register_fn(definition("fast"), |_args, _ctx| async {
            Ok::<_, ToolError>("fast done".to_string())
        });
        registry.register_sync_fn(definition("broken"), |_args, _ctx| {
            Err(ToolError::unavailable("speaker offline"))
        });
        registry.register_sync_fn(definition("readNote"), |_args, _ctx| {
            Err(ToolError::not_found("note 42 does not exist"))
        });
        registry.register_sync_fn(
            definition("crashy"),
            |_args, _ctx| -> Result<String, ToolError> { panic!("device driver crashed") },
        );
        Arc::new(registry)
    }

    #[tokio::test]
    async fn empty_batch_dispatches_nothing() {
        let dispatcher = ToolDispatcher::from_registry(registry());

        let results = dispatcher
            .dispatch_all(&[], &ToolExecutionContext::new("s"), &ignore_invocations)
            .await;

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn unknown_tool_reports_exact_not_found_text() {
        let dispatcher = ToolDispatcher::from_registry(registry());
        let calls = vec![ToolCall::new(0, "launchRocket", "{}").with_id("call_1")];

        let results = dispatcher
            .dispatch_all(&calls, &ToolExecutionContext::new("s"), &ignore_invocations)
            .await;

        assert_eq!(
            results,
            vec![ToolDispatchResult::new(
                Some("call_1".to_string()),
                "launchRocket",
                "Function launchRocket not found"
            )]
        );
    }

    #[tokio::test]
    async fn failing_tool_reports_error_text() {
        let dispatcher = ToolDispatcher::from_registry(registry());
        let calls = vec![
            ToolCall::new(0, "broken", "{}").with_id("call_1"),
            ToolCall::new(1, "getWeather", "{}").with_id("call_2"),
        ];

        let results = dispatcher
            .dispatch_all(&calls, &ToolExecutionContext::new("s"), &ignore_invocations)
            .await;

        let broken = results
            .iter()
            .find(|result| result.tool_name == "broken")
            .expect("broken result");
        assert_eq!(
            broken.result,
            "Error executing function broken: speaker offline"
        );

        let weather = results
            .iter()
            .find(|result| result.tool_name == "getWeather")
            .expect("weather result");
        assert_eq!(
            weather.result,
            "Error executing function getWeather: missing required string: 'city'"
        );
    }

    #[tokio::test]
    async fn registered_tool_reporting_not_found_keeps_its_message() {
        let dispatcher = ToolDispatcher::from_registry(registry());
        let calls = vec![ToolCall::new(0, "readNote", "{\"id\":42}").with_id("call_1")];

        let results = dispatcher
            .dispatch_all(&calls, &ToolExecutionContext::new("s"), &ignore_invocations)
            .await;

        assert_eq!(
            results[0].result,
            "Error executing function readNote: note 42 does not exist"
        );
    }

    #[tokio::test]
    async fn panicking_tool_becomes_error_text_and_siblings_still_settle() {
        let dispatcher = ToolDispatcher::from_registry(registry());
        let calls = vec![
            ToolCall::new(0, "crashy", "{}").with_id("call_1"),
            ToolCall::new(1, "fast", "{}").with_id("call_2"),
        ];

        let results = dispatcher
            .dispatch_all(&calls, &ToolExecutionContext::new("s"), &ignore_invocations)
            .await;

        assert_eq!(results.len(), 2);
        let crashy = results
            .iter()
            .find(|result| result.tool_name == "crashy")
            .expect("crashy result");
        assert_eq!(crashy.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(
            crashy.result,
            "Error executing function crashy: device driver crashed"
        );
        assert!(
            results
                .iter()
                .any(|result| result.tool_name == "fast" && result.result == "fast done")
        );
    }

    #[tokio::test]
    async fn results_follow_settlement_order_and_keep_call_ids() {
        let dispatcher = ToolDispatcher::from_registry(registry());
        let calls = vec![
            ToolCall::new(0, "slow", "").with_id("call_slow"),
            ToolCall::new(1, "fast", "").with_id("call_fast"),
        ];

        let results = dispatcher
            .dispatch_all(&calls, &ToolExecutionContext::new("s"), &ignore_invocations)
            .await;

        assert_eq!(
            results,
            vec![
                ToolDispatchResult::new(Some("call_fast".to_string()), "fast", "fast done"),
                ToolDispatchResult::new(Some("call_slow".to_string()), "slow", "slow done"),
            ]
        );
    }

    #[tokio::test]
    async fn observer_sees_start_for_every_call_and_result_only_on_success() {
        let dispatcher = ToolDispatcher::from_registry(registry());
        let calls = vec![
            ToolCall::new(0, "getWeather", "{\"city\":\"Paris\"}"),
            ToolCall::new(1, "missing", "{}"),
        ];
        let seen = Mutex::new(Vec::new());
        let observer = |name: &str, result: Option<&str>| {
            seen.lock()
                .expect("seen lock")
                .push((name.to_string(), result.map(str::to_string)));
        };

        dispatcher
            .dispatch_all(&calls, &ToolExecutionContext::new("s"), &observer)
            .await;

        let seen = seen.into_inner().expect("seen lock");
        assert_eq!(
            seen,
            vec![
                ("getWeather".to_string(), None),
                ("missing".to_string(), None),
                (
                    "getWeather".to_string(),
                    Some("18C, cloudy in Paris".to_string())
                ),
            ]
        );
    }

    #[tokio::test]
    async fn dispatching_a_pure_call_twice_is_idempotent() {
        let dispatcher = ToolDispatcher::from_registry(registry());
        let calls = vec![ToolCall::new(0, "getWeather", "{\"city\":\"Paris\"}")];
        let context = ToolExecutionContext::new("s");

        let first = dispatcher
            .dispatch_all(&calls, &context, &ignore_invocations)
            .await;
        let second = dispatcher
            .dispatch_all(&calls, &context, &ignore_invocations)
            .await;

        assert_eq!(first, second);
    }
}
