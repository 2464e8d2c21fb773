//! Activity catalog lookup.

use super::parse_date;
use crate::fixtures;
use crate::models::CITY;
use async_trait::async_trait;
use engine::{Tool, ToolError, ToolOutput, ToolSpec, required_str};
use serde_json::{Map, Value, json};

/// Fetches the activities available on a given date.
pub struct ActivitiesTool {
    spec: ToolSpec,
}

impl ActivitiesTool {
    pub fn new() -> Self {
        Self {
            spec: ToolSpec::new(
                "get_activities_by_date_tool",
                "Retrieve the activities available on a specific date in AgentsVille.",
                json!({
                    "type": "object",
                    "properties": {
                        "date_str": {"type": "string", "description": "Date in YYYY-MM-DD"},
                        "city": {"type": "string", "description": "City name", "default": CITY},
                    },
                    "required": ["date_str"],
                }),
            ),
        }
    }
}

impl Default for ActivitiesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ActivitiesTool {
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

        if let Some(city) = arguments.get("city").and_then(Value::as_str)
            && city != CITY
        {
            return Err(ToolError::InvalidArguments(format!(
                "no activity data for '{city}', only {CITY}"
            )));
        }

        let activities = fixtures::activities_on(date);
        let count = activities.len();
        let payload = json!({
            "ok": true,
            "date": date,
            "activities": activities,
            "message": format!("Retrieved {count} activities for {date} in {CITY}"),
        });
        Ok(ToolOutput::payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::args;

    #[tokio::test]
    async fn returns_catalog_entries_for_date() {
        let tool = ActivitiesTool::new();
        let out = tool
            .call(&args(json!({"date_str": "2025-06-10"})), &Value::Null)
            .await
            .unwrap();

        let activities = out.payload["activities"].as_array().unwrap();
        assert_eq!(activities.len(), 3);
        assert!(out.payload["message"]
            .as_str()
            .unwrap()
            .contains("3 activities"));
    }

    #[tokio::test]
    async fn empty_outside_calendar_range() {
        let tool = ActivitiesTool::new();
        let out = tool
            .call(&args(json!({"date_str": "2025-07-01"})), &Value::Null)
            .await
            .unwrap();
        assert!(out.payload["activities"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_date_is_invalid_arguments() {
        let tool = ActivitiesTool::new();
        let err = tool.call(&Map::new(), &Value::Null).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn unparseable_date_is_invalid_arguments() {
        let tool = ActivitiesTool::new();
        let err = tool
            .call(&args(json!({"date_str": "June 10th"})), &Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn unknown_city_is_rejected() {
        let tool = ActivitiesTool::new();
        let err = tool
            .call(
                &args(json!({"date_str": "2025-06-10", "city": "Gotham"})),
                &Value::Null,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
