//! Prompt templates for the planner and the revision agent.

use crate::fixtures;
use crate::models::{TravelItinerary, VacationInfo};
use serde_json::json;

/// System prompt for the single-call itinerary planner.
pub const PLANNER_SYSTEM_PROMPT: &str = "\
You are an expert travel planner for the fictional city AgentsVille.

Task:
- Create a day-by-day itinerary from the vacation info (city, dates, travelers, \
interests, budget). Use ONLY activities from the provided catalog.
- Plan coherently: at least one and preferably two activities per day, matching \
the travelers' interests and respecting start/end times.
- Output STRICTLY one JSON object with these keys and no others: city, \
start_date (YYYY-MM-DD), end_date, travelers, interests, currency, total_cost, \
days. Each day has: date, activities, and optional notes. Each activity repeats \
the catalog entry verbatim: activity_id, name, start_time (YYYY-MM-DD HH:MM), \
end_time, location, description, price, related_interests.

Guidance:
- Never invent activities; copy catalog entries for the dates in range.
- Set total_cost to the sum of the chosen activities' prices (a calculator tool \
corrects it later if needed).
- Reply with just the JSON object, no commentary.";

/// User message for the planner: vacation info plus the catalog and
/// forecast for the requested dates.
pub fn planner_task(vacation: &VacationInfo) -> String {
    let dates = vacation.dates();
    let activities_by_date: serde_json::Map<String, serde_json::Value> = dates
        .iter()
        .map(|d| (d.to_string(), json!(fixtures::activities_on(*d))))
        .collect();
    let weather_by_date: serde_json::Map<String, serde_json::Value> = dates
        .iter()
        .map(|d| (d.to_string(), json!(fixtures::weather_on(*d))))
        .collect();

    format!(
        "VacationInfo:\n{}\n\nActivitiesByDate (use only these):\n{}\n\n\
         WeatherByDate:\n{}\n\nReturn ONLY the itinerary JSON as specified.",
        json!(vacation),
        serde_json::Value::Object(activities_by_date),
        serde_json::Value::Object(weather_by_date),
    )
}

/// System prompt for the ReAct revision agent.
///
/// `catalog` is the registry's rendered tool listing.
pub fn revision_system_prompt(catalog: &str) -> String {
    format!(
        "You are the itinerary revision agent for AgentsVille, working in a \
THOUGHT -> ACTION -> OBSERVATION cycle.

Task:
- Iteratively refine the current itinerary. First run run_evals_tool to collect \
feedback, then use the other tools to add, remove, or replace activities. Aim \
for at least two activities per day when feasible.
- Before calling final_answer_tool, run run_evals_tool again and make sure \
every check passes.

Available tools (name, purpose, parameters):
{catalog}

Action format (exactly one JSON object on the line after the word ACTION:):
{{\"tool_name\": \"<name>\", \"arguments\": {{\"arg\": \"value\"}}}}

Cycle protocol:
- Reply with a single message containing both sections:
  THOUGHT: your reasoning about what to do next.
  ACTION: the JSON tool call.
- After each OBSERVATION, continue with another THOUGHT/ACTION, or call \
final_answer_tool when the itinerary is ready.
- Only one ACTION per reply."
    )
}

/// Seed task for the revision agent: the current itinerary and the
/// vacation it must satisfy.
pub fn revision_task(vacation: &VacationInfo, itinerary: &TravelItinerary) -> String {
    format!(
        "Here is the current itinerary and the vacation info it must satisfy. \
Run run_evals_tool first, iterate as needed, and run it again before \
final_answer_tool.\n\nVacationInfo:\n{}\n\nItinerary:\n{}",
        json!(vacation),
        json!(itinerary),
    )
}
