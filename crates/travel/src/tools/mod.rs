//! Tools exposed to the revision agent.

mod activities;
mod calculator;
mod evals;
mod final_answer;
mod weather;

pub use activities::ActivitiesTool;
pub use calculator::CalculatorTool;
pub use evals::EvalsTool;
pub use final_answer::FinalAnswerTool;
pub use weather::WeatherTool;

use crate::models::{TravelItinerary, VacationInfo};
use chrono::NaiveDate;
use engine::{ToolError, ToolRegistry};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Name of the tool whose successful dispatch ends the loop.
pub const FINAL_ANSWER_TOOL: &str = "final_answer_tool";
/// Name of the validation tool the guard policy watches for.
pub const EVALS_TOOL: &str = "run_evals_tool";

/// Register the full AgentsVille tool set.
pub fn register_all(registry: &mut ToolRegistry, vacation: VacationInfo) -> engine::Result<()> {
    registry.register(Arc::new(CalculatorTool::new()))?;
    registry.register(Arc::new(ActivitiesTool::new()))?;
    registry.register(Arc::new(WeatherTool::new()))?;
    registry.register(Arc::new(EvalsTool::new(vacation)))?;
    registry.register(Arc::new(FinalAnswerTool::new()))?;
    Ok(())
}

/// Resolve the itinerary a tool should operate on: an explicit
/// `itinerary` argument wins, otherwise the working artifact.
pub(crate) fn itinerary_from(
    arguments: &Map<String, Value>,
    artifact: &Value,
) -> Result<TravelItinerary, ToolError> {
    let source = arguments.get("itinerary").unwrap_or(artifact);
    serde_json::from_value(source.clone())
        .map_err(|e| ToolError::InvalidArguments(format!("not a valid itinerary: {e}")))
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, ToolError> {
    s.parse()
        .map_err(|_| ToolError::InvalidArguments(format!("'{s}' is not a YYYY-MM-DD date")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{CITY, Interest};
    use serde_json::json;

    pub fn vacation() -> VacationInfo {
        VacationInfo {
            city: CITY.into(),
            start_date: "2025-06-10".parse().unwrap(),
            end_date: "2025-06-11".parse().unwrap(),
            travelers: vec!["Ada Lovelace".into(), "Alan Turing".into()],
            interests: vec![Interest::Technology, Interest::Art],
            budget_currency: "USD".into(),
            budget_amount: 120.0,
        }
    }

    /// A valid two-day itinerary built from real catalog entries.
    pub fn itinerary() -> Value {
        json!({
            "city": CITY,
            "start_date": "2025-06-10",
            "end_date": "2025-06-11",
            "travelers": ["Ada Lovelace", "Alan Turing"],
            "interests": ["technology", "art"],
            "currency": "USD",
            "total_cost": 0.0,
            "days": [
                {
                    "date": "2025-06-10",
                    "activities": [{
                        "activity_id": "event-0610-01",
                        "name": "Robotics Lab Open House",
                        "start_time": "2025-06-10 10:00",
                        "end_time": "2025-06-10 12:00",
                        "location": "Tinker Quarter",
                        "description": "Indoor tour of the city robotics lab with live demos.",
                        "price": 25.0,
                        "related_interests": ["technology"],
                    }],
                },
                {
                    "date": "2025-06-11",
                    "activities": [{
                        "activity_id": "event-0611-01",
                        "name": "Modern Art Museum Tour",
                        "start_time": "2025-06-11 09:30",
                        "end_time": "2025-06-11 11:30",
                        "location": "Museum District",
                        "description": "Guided indoor tour of the modern art wing.",
                        "price": 22.0,
                        "related_interests": ["art"],
                    }],
                },
            ],
        })
    }

    pub fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }
}
