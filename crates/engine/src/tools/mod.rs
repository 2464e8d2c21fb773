//! Tool trait and registry.
//!
//! Tools are the boundary between the loop and side effects. Each tool is
//! a deterministic, locally-executed handler exposed to the model through
//! a name and a parameter schema.

mod registry;

pub use registry::ToolRegistry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A tool definition exposed to the model.
///
/// Immutable once registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description, shown in the prompt catalog.
    pub description: String,
    /// JSON Schema for the arguments map.
    pub parameters: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool call parsed from an action directive.
///
/// Constructed fresh each turn; not retained beyond the turn that
/// produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(rename = "tool_name")]
    pub name: String,
    pub arguments: Map<String, Value>,
}

/// What a tool produced on success.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Result payload, fed back to the model as an observation.
    pub payload: Value,
    /// Wholesale replacement for the working artifact, when the tool
    /// produced a revised version.
    pub revision: Option<Value>,
}

impl ToolOutput {
    /// A plain result with no artifact revision.
    pub fn payload(payload: Value) -> Self {
        Self {
            payload,
            revision: None,
        }
    }

    /// A result that also replaces the working artifact.
    pub fn with_revision(payload: Value, revision: Value) -> Self {
        Self {
            payload,
            revision: Some(revision),
        }
    }
}

/// Errors that can occur during tool execution.
///
/// All recoverable: the dispatcher converts them into failure
/// observations rather than propagating.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("execution failed: {0}")]
    Execution(String),
    #[error("timeout after {0}ms")]
    Timeout(u64),
}

/// Trait for tool handlers.
///
/// `artifact` is the loop's current working document; tools read it and
/// may return a replacement via [`ToolOutput::with_revision`], but never
/// mutate it in place.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's specification.
    fn spec(&self) -> &ToolSpec;

    /// Execute the tool with the supplied arguments.
    async fn call(
        &self,
        arguments: &Map<String, Value>,
        artifact: &Value,
    ) -> Result<ToolOutput, ToolError>;
}

/// Read a required string argument.
pub fn required_str<'a>(
    arguments: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a str, ToolError> {
    arguments
        .get(key)
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing required argument '{key}'")))?
        .as_str()
        .ok_or_else(|| ToolError::InvalidArguments(format!("argument '{key}' must be a string")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_call_wire_format() {
        let call: ToolCall = serde_json::from_value(json!({
            "tool_name": "calculator_tool",
            "arguments": {"x": 1},
        }))
        .unwrap();
        assert_eq!(call.name, "calculator_tool");
        assert_eq!(call.arguments.get("x"), Some(&json!(1)));
    }

    #[test]
    fn required_str_reports_missing_and_mistyped() {
        let mut args = Map::new();
        assert!(matches!(
            required_str(&args, "date_str"),
            Err(ToolError::InvalidArguments(_))
        ));

        args.insert("date_str".into(), json!(42));
        assert!(matches!(
            required_str(&args, "date_str"),
            Err(ToolError::InvalidArguments(_))
        ));

        args.insert("date_str".into(), json!("2025-06-10"));
        assert_eq!(required_str(&args, "date_str").unwrap(), "2025-06-10");
    }
}
