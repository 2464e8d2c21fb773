//! Terminal final-answer tool.

use async_trait::async_trait;
use engine::{Tool, ToolError, ToolOutput, ToolSpec, required_str};
use serde_json::{Map, Value, json};

/// Packages the final itinerary and message; its successful dispatch ends
/// the loop.
pub struct FinalAnswerTool {
    spec: ToolSpec,
}

impl FinalAnswerTool {
    pub fn new() -> Self {
        Self {
            spec: ToolSpec::new(
                "final_answer_tool",
                "Provide the final answer and end the revision loop. Include a \
                 message for the travelers; the final itinerary defaults to the \
                 current working itinerary.",
                json!({
                    "type": "object",
                    "properties": {
                        "message": {"type": "string", "description": "Final message to the travelers"},
                        "final_itinerary": {
                            "type": "object",
                            "description": "Final itinerary JSON; defaults to the current working itinerary",
                        },
                    },
                    "required": ["message"],
                }),
            ),
        }
    }
}

impl Default for FinalAnswerTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FinalAnswerTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        arguments: &Map<String, Value>,
        artifact: &Value,
    ) -> Result<ToolOutput, ToolError> {
        let message = required_str(arguments, "message")?;
        let final_itinerary = arguments
            .get("final_itinerary")
            .unwrap_or(artifact)
            .clone();

        Ok(ToolOutput::payload(json!({
            "ok": true,
            "message": message,
            "final_itinerary": final_itinerary,
        })))
    }
}
