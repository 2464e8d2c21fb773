//! Vacation and itinerary data models.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The only city the mocked data covers.
pub const CITY: &str = "AgentsVille";

/// Traveler interest categories used by the activity catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Art,
    Dancing,
    Food,
    Music,
    Nature,
    Technology,
}

impl Interest {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Art => "art",
            Self::Dancing => "dancing",
            Self::Food => "food",
            Self::Music => "music",
            Self::Nature => "nature",
            Self::Technology => "technology",
        }
    }
}

impl FromStr for Interest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "art" => Ok(Self::Art),
            "dancing" => Ok(Self::Dancing),
            "food" => Ok(Self::Food),
            "music" => Ok(Self::Music),
            "nature" => Ok(Self::Nature),
            "technology" => Ok(Self::Technology),
            other => Err(ValidationError::UnknownInterest(other.to_string())),
        }
    }
}

/// Validation failures for vacation and itinerary data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("only {CITY} is supported, got '{0}'")]
    UnsupportedCity(String),

    #[error("end_date must be on or after start_date")]
    DateOrder,

    #[error("unknown interest '{0}'")]
    UnknownInterest(String),
}

/// What the travelers asked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationInfo {
    #[serde(default = "default_city")]
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: Vec<String>,
    pub interests: Vec<Interest>,
    #[serde(default = "default_currency")]
    pub budget_currency: String,
    #[serde(default)]
    pub budget_amount: f64,
}

fn default_city() -> String {
    CITY.to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

impl VacationInfo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.city != CITY {
            return Err(ValidationError::UnsupportedCity(self.city.clone()));
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::DateOrder);
        }
        Ok(())
    }

    /// Every date of the stay, inclusive.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        let mut day = self.start_date;
        while day <= self.end_date {
            out.push(day);
            match day.checked_add_days(Days::new(1)) {
                Some(next) => day = next,
                None => break,
            }
        }
        out
    }
}

/// Serde adapter for the catalog's "YYYY-MM-DD HH:MM" timestamps.
pub mod minute_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(de::Error::custom)
    }
}

/// One bookable activity from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: String,
    pub name: String,
    #[serde(with = "minute_format")]
    pub start_time: chrono::NaiveDateTime,
    #[serde(with = "minute_format")]
    pub end_time: chrono::NaiveDateTime,
    pub location: String,
    pub description: String,
    pub price: f64,
    pub related_interests: Vec<Interest>,
}

impl Activity {
    /// The calendar date this activity starts on.
    pub fn date(&self) -> NaiveDate {
        self.start_time.date()
    }
}

/// The planned activities for one day of the stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The evolving itinerary document — the loop's working artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelItinerary {
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: Vec<String>,
    pub interests: Vec<Interest>,
    pub currency: String,
    pub total_cost: f64,
    pub days: Vec<DayPlan>,
}

impl TravelItinerary {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.city != CITY {
            return Err(ValidationError::UnsupportedCity(self.city.clone()));
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::DateOrder);
        }
        Ok(())
    }

    /// Sum of the scheduled activities' prices, rounded to cents.
    pub fn computed_total(&self) -> f64 {
        round2(
            self.days
                .iter()
                .flat_map(|d| &d.activities)
                .map(|a| a.price)
                .sum(),
        )
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn vacation() -> VacationInfo {
        VacationInfo {
            city: CITY.into(),
            start_date: date("2025-06-10"),
            end_date: date("2025-06-12"),
            travelers: vec!["Ada Lovelace".into(), "Alan Turing".into()],
            interests: vec![Interest::Technology, Interest::Art],
            budget_currency: "USD".into(),
            budget_amount: 200.0,
        }
    }

    #[test]
    fn vacation_dates_are_inclusive() {
        assert_eq!(
            vacation().dates(),
            vec![date("2025-06-10"), date("2025-06-11"), date("2025-06-12")]
        );
    }

    #[test]
    fn vacation_rejects_other_cities() {
        let mut v = vacation();
        v.city = "Gotham".into();
        assert_eq!(
            v.validate(),
            Err(ValidationError::UnsupportedCity("Gotham".into()))
        );
    }

    #[test]
    fn vacation_rejects_reversed_dates() {
        let mut v = vacation();
        v.end_date = date("2025-06-01");
        assert_eq!(v.validate(), Err(ValidationError::DateOrder));
    }

    #[test]
    fn interest_parsing() {
        assert_eq!("Technology".parse::<Interest>(), Ok(Interest::Technology));
        assert_eq!(" art ".parse::<Interest>(), Ok(Interest::Art));
        assert!(matches!(
            "skydiving".parse::<Interest>(),
            Err(ValidationError::UnknownInterest(_))
        ));
    }

    #[test]
    fn activity_timestamp_round_trip() {
        let value = json!({
            "activity_id": "event-001",
            "name": "Gallery Walk",
            "start_time": "2025-06-10 10:00",
            "end_time": "2025-06-10 12:00",
            "location": "Old Town",
            "description": "Indoor gallery stroll",
            "price": 20.0,
            "related_interests": ["art"],
        });
        let activity: Activity = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(activity.date(), date("2025-06-10"));
        assert_eq!(serde_json::to_value(&activity).unwrap(), value);
    }

    #[test]
    fn activity_rejects_bad_timestamp() {
        let value = json!({
            "activity_id": "event-001",
            "name": "Gallery Walk",
            "start_time": "10:00 on June 10th",
            "end_time": "2025-06-10 12:00",
            "location": "Old Town",
            "description": "Indoor gallery stroll",
            "price": 20.0,
            "related_interests": ["art"],
        });
        assert!(serde_json::from_value::<Activity>(value).is_err());
    }

    #[test]
    fn computed_total_sums_and_rounds() {
        let itinerary: TravelItinerary = serde_json::from_value(json!({
            "city": CITY,
            "start_date": "2025-06-10",
            "end_date": "2025-06-10",
            "travelers": ["Ada Lovelace"],
            "interests": ["art"],
            "currency": "USD",
            "total_cost": 0.0,
            "days": [{
                "date": "2025-06-10",
                "activities": [
                    {
                        "activity_id": "event-001",
                        "name": "A",
                        "start_time": "2025-06-10 10:00",
                        "end_time": "2025-06-10 11:00",
                        "location": "x",
                        "description": "indoor",
                        "price": 10.105,
                        "related_interests": ["art"],
                    },
                    {
                        "activity_id": "event-002",
                        "name": "B",
                        "start_time": "2025-06-10 12:00",
                        "end_time": "2025-06-10 13:00",
                        "location": "x",
                        "description": "indoor",
                        "price": 5.0,
                        "related_interests": ["art"],
                    }
                ],
            }],
        }))
        .unwrap();

        assert_eq!(itinerary.computed_total(), 15.11);
    }
}
