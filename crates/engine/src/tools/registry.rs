//! Name-keyed tool registry.

use super::{Tool, ToolSpec};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A fixed mapping from tool name to handler.
///
/// Populated once at startup; the loop never mutates it afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its spec name.
    ///
    /// Duplicate names are a fatal configuration error, never a silent
    /// overwrite.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.spec().name.clone();
        if self.tools.contains_key(&name) {
            return Err(Error::DuplicateTool(name));
        }
        debug!(tool = %name, "registered tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(Arc::clone)
    }

    /// Whether a tool with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All registered tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered tool specs, sorted by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.spec().clone()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Render the catalog text included in the system prompt: one entry
    /// per tool with its description and parameter schema.
    pub fn catalog(&self) -> String {
        self.specs()
            .iter()
            .map(|spec| {
                format!(
                    "- {}: {}\n  parameters JSON schema: {}",
                    spec.name, spec.description, spec.parameters
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolError, ToolOutput};
    use async_trait::async_trait;
    use serde_json::{Map, Value, json};

    struct NamedTool {
        spec: ToolSpec,
    }

    impl NamedTool {
        fn new(name: &str) -> Self {
            Self {
                spec: ToolSpec::new(name, "a test tool", json!({"type": "object"})),
            }
        }
    }

    #[async_trait]
    impl Tool for NamedTool {
        fn spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn call(
            &self,
            _arguments: &Map<String, Value>,
            _artifact: &Value,
        ) -> std::result::Result<ToolOutput, ToolError> {
            Ok(ToolOutput::payload(json!({"ok": true})))
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool::new("echo_tool"))).unwrap();

        assert!(registry.contains("echo_tool"));
        assert!(registry.get("echo_tool").is_some());
        assert!(registry.get("missing_tool").is_none());
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool::new("echo_tool"))).unwrap();

        let err = registry
            .register(Arc::new(NamedTool::new("echo_tool")))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateTool(name) if name == "echo_tool"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool::new("zeta_tool"))).unwrap();
        registry.register(Arc::new(NamedTool::new("alpha_tool"))).unwrap();

        assert_eq!(registry.names(), vec!["alpha_tool", "zeta_tool"]);
    }

    #[test]
    fn catalog_lists_every_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool::new("echo_tool"))).unwrap();

        let catalog = registry.catalog();
        assert!(catalog.contains("echo_tool"));
        assert!(catalog.contains("parameters JSON schema"));
    }
}
