//! Itinerary evaluation suite.

use super::itinerary_from;
use crate::fixtures;
use crate::models::{TravelItinerary, VacationInfo};
use async_trait::async_trait;
use engine::{Tool, ToolError, ToolOutput, ToolSpec};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use tracing::debug;

/// Runs the validation checks the revision agent must satisfy before the
/// final answer: city/dates match the vacation, the total stays within
/// budget, every activity exists in the catalog on its day, and no outdoor
/// activity is scheduled into inclement weather.
pub struct EvalsTool {
    spec: ToolSpec,
    vacation: VacationInfo,
}

impl EvalsTool {
    pub fn new(vacation: VacationInfo) -> Self {
        Self {
            spec: ToolSpec::new(
                "run_evals_tool",
                "Evaluate the current itinerary: city/dates match, within budget, \
                 no hallucinated activities, weather compatibility.",
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
            vacation,
        }
    }

    fn check_city_and_dates(&self, itinerary: &TravelItinerary) -> (bool, String) {
        let city_ok = itinerary.city == self.vacation.city;
        let wanted: HashSet<_> = self.vacation.dates().into_iter().collect();
        let dates_ok = wanted.contains(&itinerary.start_date)
            && wanted.contains(&itinerary.end_date)
            && itinerary.days.iter().all(|d| wanted.contains(&d.date));
        (
            city_ok && dates_ok,
            format!("city_ok={city_ok}, dates_ok={dates_ok}"),
        )
    }

    fn check_budget(&self, itinerary: &TravelItinerary) -> (bool, String) {
        let total = itinerary.computed_total();
        let budget = self.vacation.budget_amount;
        (
            total <= budget,
            format!("total_cost={total} <= budget={budget}"),
        )
    }

    fn check_hallucinations(&self, itinerary: &TravelItinerary) -> (bool, String) {
        let mut invalid = Vec::new();
        for day in &itinerary.days {
            let allowed = fixtures::activity_ids_on(day.date);
            for activity in &day.activities {
                if !allowed.contains(&activity.activity_id) {
                    invalid.push(activity.activity_id.clone());
                }
            }
        }
        (invalid.is_empty(), format!("invalid_ids={invalid:?}"))
    }

    fn check_weather(&self, itinerary: &TravelItinerary) -> (bool, String) {
        let mut issues = Vec::new();
        for day in &itinerary.days {
            let Some(report) = fixtures::weather_on(day.date) else {
                continue;
            };
            if !report.is_inclement() {
                continue;
            }
            for activity in &day.activities {
                if fixtures::looks_outdoor(&activity.description) {
                    issues.push(format!(
                        "{}:{} unsuitable in {} weather",
                        day.date, activity.activity_id, report.condition
                    ));
                }
            }
        }
        (issues.is_empty(), format!("issues={issues:?}"))
    }
}

#[async_trait]
impl Tool for EvalsTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        arguments: &Map<String, Value>,
        artifact: &Value,
    ) -> Result<ToolOutput, ToolError> {
        let itinerary = itinerary_from(arguments, artifact)?;

        let checks = [
            ("city_and_dates_match", self.check_city_and_dates(&itinerary)),
            ("within_budget", self.check_budget(&itinerary)),
            ("no_hallucinated_activities", self.check_hallucinations(&itinerary)),
            ("weather_compatibility", self.check_weather(&itinerary)),
        ];

        let results: Vec<Value> = checks
            .iter()
            .map(|(name, (passed, detail))| {
                json!({"name": name, "passed": passed, "detail": detail})
            })
            .collect();
        let all_passed = checks.iter().all(|(_, (passed, _))| *passed);
        debug!(all_passed, "itinerary evaluated");

        Ok(ToolOutput::payload(json!({
            "ok": true,
            "all_passed": all_passed,
            "results": results,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{itinerary, vacation};

    async fn run(artifact: Value) -> Value {
        EvalsTool::new(vacation())
            .call(&Map::new(), &artifact)
            .await
            .unwrap()
            .payload
    }

    fn result<'a>(payload: &'a Value, name: &str) -> &'a Value {
        payload["results"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["name"] == name)
            .unwrap()
    }

    #[tokio::test]
    async fn valid_itinerary_passes_all_checks() {
        let payload = run(itinerary()).await;
        assert_eq!(payload["all_passed"], json!(true));
    }

    #[tokio::test]
    async fn over_budget_fails_budget_check() {
        let mut doc = itinerary();
        doc["days"][0]["activities"][0]["price"] = json!(500.0);
        let payload = run(doc).await;
        assert_eq!(payload["all_passed"], json!(false));
        assert_eq!(result(&payload, "within_budget")["passed"], json!(false));
    }

    #[tokio::test]
    async fn invented_activity_fails_hallucination_check() {
        let mut doc = itinerary();
        doc["days"][0]["activities"][0]["activity_id"] = json!("event-9999-99");
        let payload = run(doc).await;
        let check = result(&payload, "no_hallucinated_activities");
        assert_eq!(check["passed"], json!(false));
        assert!(check["detail"].as_str().unwrap().contains("event-9999-99"));
    }

    #[tokio::test]
    async fn activity_on_wrong_day_counts_as_hallucinated() {
        let mut doc = itinerary();
        // real catalog id, scheduled on the wrong date
        doc["days"][0]["activities"][0]["activity_id"] = json!("event-0611-01");
        let payload = run(doc).await;
        assert_eq!(
            result(&payload, "no_hallucinated_activities")["passed"],
            json!(false)
        );
    }

    #[tokio::test]
    async fn outdoor_activity_in_rain_fails_weather_check() {
        let mut doc = itinerary();
        doc["days"][1]["date"] = json!("2025-06-12");
        doc["days"][1]["activities"][0]["activity_id"] = json!("event-0612-01");
        doc["days"][1]["activities"][0]["start_time"] = json!("2025-06-12 10:00");
        doc["days"][1]["activities"][0]["end_time"] = json!("2025-06-12 12:30");
        doc["days"][1]["activities"][0]["description"] =
            json!("Outdoor walking tour of the old town's street murals.");
        doc["end_date"] = json!("2025-06-12");

        let vacation = VacationInfo {
            end_date: "2025-06-12".parse().unwrap(),
            ..crate::tools::test_support::vacation()
        };
        let payload = EvalsTool::new(vacation)
            .call(&Map::new(), &doc)
            .await
            .unwrap()
            .payload;

        let check = result(&payload, "weather_compatibility");
        assert_eq!(check["passed"], json!(false));
        assert!(check["detail"].as_str().unwrap().contains("rainy"));
    }

    #[tokio::test]
    async fn wrong_city_fails_city_check() {
        let mut doc = itinerary();
        doc["city"] = json!("Gotham");
        let payload = run(doc).await;
        assert_eq!(
            result(&payload, "city_and_dates_match")["passed"],
            json!(false)
        );
    }
}
