//! Tool dispatch.
//!
//! Validates that the requested tool exists, invokes it, and converts every
//! failure into an observation. A single bad tool call must never crash the
//! loop.

use crate::tools::{ToolCall, ToolError, ToolRegistry};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// The result of executing one tool call, fed back to the model.
///
/// Never mutated after creation.
#[derive(Debug, Clone)]
pub enum Observation {
    /// The handler ran and returned a payload.
    Success { tool: String, payload: Value },
    /// The call could not be completed; `tool` is absent when the failure
    /// happened before a handler was identified (parse errors, unknown
    /// names).
    Failure { tool: Option<String>, message: String },
}

impl Observation {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            tool: None,
            message: message.into(),
        }
    }

    pub fn tool_failure(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure {
            tool: Some(tool.into()),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The observation line appended to the conversation.
    pub fn render(&self) -> String {
        match self {
            Self::Success { payload, .. } => format!("OBSERVATION: {payload}"),
            Self::Failure { message, .. } => format!("OBSERVATION: {message}"),
        }
    }

    /// The payload recorded in the trace.
    pub fn output(&self) -> Value {
        match self {
            Self::Success { payload, .. } => payload.clone(),
            Self::Failure { message, .. } => json!({"error": message}),
        }
    }

    /// The tool name, when one was identified.
    pub fn tool(&self) -> Option<&str> {
        match self {
            Self::Success { tool, .. } => Some(tool),
            Self::Failure { tool, .. } => tool.as_deref(),
        }
    }
}

/// Outcome of one dispatch: the observation plus any artifact revision the
/// tool returned.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub observation: Observation,
    pub revision: Option<Value>,
}

impl Dispatch {
    fn observed(observation: Observation) -> Self {
        Self {
            observation,
            revision: None,
        }
    }
}

/// Execute a tool call against the registry.
///
/// An unknown tool name produces an observation enumerating the valid
/// names; a handler error produces an observation describing the failure;
/// an expired `timeout` produces a timeout observation. Only a successful
/// handler run can carry an artifact revision.
pub async fn dispatch(
    registry: &ToolRegistry,
    call: &ToolCall,
    artifact: &Value,
    timeout: Option<Duration>,
) -> Dispatch {
    let Some(tool) = registry.get(&call.name) else {
        warn!(tool = %call.name, "unknown tool requested");
        return Dispatch::observed(Observation::failure(format!(
            "Unknown tool '{}'. Use one of: {}",
            call.name,
            registry.names().join(", ")
        )));
    };

    let invocation = tool.call(&call.arguments, artifact);
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, invocation).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::Timeout(limit.as_millis() as u64)),
        },
        None => invocation.await,
    };

    match result {
        Ok(output) => {
            debug!(tool = %call.name, "tool dispatched");
            Dispatch {
                observation: Observation::Success {
                    tool: call.name.clone(),
                    payload: output.payload,
                },
                revision: output.revision,
            }
        }
        Err(err) => {
            warn!(tool = %call.name, error = %err, "tool call failed");
            Dispatch::observed(Observation::tool_failure(
                call.name.clone(),
                format!("Tool '{}' failed: {err}", call.name),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Tool, ToolOutput, ToolSpec, required_str};
    use async_trait::async_trait;
    use serde_json::Map;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoTool {
        spec: ToolSpec,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn call(
            &self,
            arguments: &Map<String, Value>,
            _artifact: &Value,
        ) -> Result<ToolOutput, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = required_str(arguments, "text")?;
            Ok(ToolOutput::payload(json!({"echo": text})))
        }
    }

    fn registry_with_echo() -> (ToolRegistry, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(EchoTool {
                spec: ToolSpec::new("echo_tool", "echoes text", json!({"type": "object"})),
                calls: Arc::clone(&calls),
            }))
            .unwrap();
        (registry, calls)
    }

    fn call(name: &str, arguments: Value) -> ToolCall {
        ToolCall {
            name: name.into(),
            arguments: arguments.as_object().cloned().unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn unknown_tool_lists_names_and_runs_nothing() {
        let (registry, calls) = registry_with_echo();

        let dispatched = dispatch(
            &registry,
            &call("teleport_tool", json!({})),
            &Value::Null,
            None,
        )
        .await;

        assert!(!dispatched.observation.is_success());
        let rendered = dispatched.observation.render();
        assert!(rendered.contains("teleport_tool"));
        assert!(rendered.contains("echo_tool"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_success_carries_payload() {
        let (registry, _) = registry_with_echo();

        let dispatched = dispatch(
            &registry,
            &call("echo_tool", json!({"text": "hi"})),
            &Value::Null,
            None,
        )
        .await;

        match dispatched.observation {
            Observation::Success { tool, payload } => {
                assert_eq!(tool, "echo_tool");
                assert_eq!(payload, json!({"echo": "hi"}));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_argument_becomes_failure_observation() {
        let (registry, _) = registry_with_echo();

        let dispatched =
            dispatch(&registry, &call("echo_tool", json!({})), &Value::Null, None).await;

        match &dispatched.observation {
            Observation::Failure { tool, message } => {
                assert_eq!(tool.as_deref(), Some("echo_tool"));
                assert!(message.contains("missing required argument"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    struct StallTool {
        spec: ToolSpec,
    }

    #[async_trait]
    impl Tool for StallTool {
        fn spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn call(
            &self,
            _arguments: &Map<String, Value>,
            _artifact: &Value,
        ) -> Result<ToolOutput, ToolError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ToolOutput::payload(Value::Null))
        }
    }

    #[tokio::test]
    async fn timeout_becomes_failure_observation() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(StallTool {
                spec: ToolSpec::new("stall_tool", "never returns", json!({"type": "object"})),
            }))
            .unwrap();

        let dispatched = dispatch(
            &registry,
            &call("stall_tool", json!({})),
            &Value::Null,
            Some(Duration::from_millis(50)),
        )
        .await;

        let rendered = dispatched.observation.render();
        assert!(rendered.contains("timeout"), "got: {rendered}");
    }
}
