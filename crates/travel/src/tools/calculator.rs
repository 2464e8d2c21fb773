//! Itinerary cost calculator.

use super::itinerary_from;
use async_trait::async_trait;
use engine::{Tool, ToolError, ToolOutput, ToolSpec};
use serde_json::{Map, Value, json};

/// Recomputes the itinerary's total cost and returns the corrected
/// document as the new working artifact.
pub struct CalculatorTool {
    spec: ToolSpec,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            spec: ToolSpec::new(
                "calculator_tool",
                "Recalculate the itinerary's total cost by summing each activity's \
                 price. Returns the updated itinerary with the corrected total_cost.",
                json!({
                    "type": "object",
                    "properties": {
                        "itinerary": {
                            "type": "object",
                            "description": "Itinerary JSON; defaults to the current working itinerary",
                        },
                    },
                }),
            ),
        }
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        arguments: &Map<String, Value>,
        artifact: &Value,
    ) -> Result<ToolOutput, ToolError> {
        let mut itinerary = itinerary_from(arguments, artifact)?;
        itinerary.total_cost = itinerary.computed_total();

        let revised = serde_json::to_value(&itinerary)
            .map_err(|e| ToolError::Execution(e.to_string()))?;
        let payload = json!({
            "ok": true,
            "total_cost": itinerary.total_cost,
            "message": format!(
                "Calculated total cost: {} {}",
                itinerary.total_cost, itinerary.currency
            ),
            "updated_itinerary": revised.clone(),
        });

        Ok(ToolOutput::with_revision(payload, revised))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{args, itinerary};

    #[tokio::test]
    async fn recomputes_total_and_revises_artifact() {
        let tool = CalculatorTool::new();
        let out = tool.call(&Map::new(), &itinerary()).await.unwrap();

        assert_eq!(out.payload["total_cost"], json!(47.0));
        let revised = out.revision.unwrap();
        assert_eq!(revised["total_cost"], json!(47.0));
    }

    #[tokio::test]
    async fn explicit_itinerary_argument_wins() {
        let tool = CalculatorTool::new();
        let out = tool
            .call(&args(json!({"itinerary": itinerary()})), &Value::Null)
            .await
            .unwrap();
        assert_eq!(out.payload["total_cost"], json!(47.0));
    }

    #[tokio::test]
    async fn rejects_non_itinerary_artifact() {
        let tool = CalculatorTool::new();
        let err = tool
            .call(&Map::new(), &json!({"not": "an itinerary"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
