//! Weather forecast lookup.

use super::parse_date;
use crate::fixtures;
use async_trait::async_trait;
use engine::{Tool, ToolError, ToolOutput, ToolSpec, required_str};
use serde_json::{Map, Value, json};

/// Fetches the forecast for a given date.
pub struct WeatherTool {
    spec: ToolSpec,
}

impl WeatherTool {
    pub fn new() -> Self {
        Self {
            spec: ToolSpec::new(
                "get_weather_tool",
                "Retrieve the weather forecast for a specific date in AgentsVille.",
                json!({
                    "type": "object",
                    "properties": {
                        "date_str": {"type": "string", "description": "Date in YYYY-MM-DD"},
                    },
                    "required": ["date_str"],
                }),
            ),
        }
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        arguments: &Map<String, Value>,
        _artifact: &Value,
    ) -> Result<ToolOutput, ToolError> {
        let date_str = required_str(arguments, "date_str")?;
        let date = parse_date(date_str)?;

        let report = fixtures::weather_on(date).ok_or_else(|| {
            ToolError::Execution(format!("no forecast available for {date}"))
        })?;

        Ok(ToolOutput::payload(json!({
            "ok": true,
            "weather": report,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::args;

    #[tokio::test]
    async fn returns_forecast_in_range() {
        let tool = WeatherTool::new();
        let out = tool
            .call(&args(json!({"date_str": "2025-06-12"})), &Value::Null)
            .await
            .unwrap();
        assert_eq!(out.payload["weather"]["condition"], json!("rainy"));
    }

    #[tokio::test]
    async fn out_of_range_is_execution_error() {
        let tool = WeatherTool::new();
        let err = tool
            .call(&args(json!({"date_str": "2025-07-01"})), &Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Execution(_)));
    }
}
