//! Mocked reference data for AgentsVille.
//!
//! Stands in for the activities and weather APIs: a fixed activity
//! calendar and forecast covering 2025-06-10 through 2025-06-15. Tools
//! treat this data as read-only.

use crate::models::{Activity, Interest, minute_format};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// First date with mocked data.
pub const CALENDAR_START: &str = "2025-06-10";
/// Last date with mocked data.
pub const CALENDAR_END: &str = "2025-06-15";

/// Weather conditions that make outdoor activities unsuitable.
pub const INCLEMENT_CONDITIONS: &[&str] = &["rainy", "thunderstorm", "snowy", "hail"];

/// One day of the mocked forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub date: NaiveDate,
    pub temperature_celsius: f64,
    pub condition: String,
    pub description: String,
}

impl WeatherReport {
    /// Whether this forecast rules out outdoor activities.
    pub fn is_inclement(&self) -> bool {
        INCLEMENT_CONDITIONS.contains(&self.condition.as_str())
    }
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, minute_format::FORMAT).expect("fixture timestamp")
}

fn day(s: &str) -> NaiveDate {
    s.parse().expect("fixture date")
}

#[allow(clippy::too_many_arguments)]
fn activity(
    id: &str,
    name: &str,
    start: &str,
    end: &str,
    location: &str,
    description: &str,
    price: f64,
    interests: &[Interest],
) -> Activity {
    Activity {
        activity_id: id.into(),
        name: name.into(),
        start_time: ts(start),
        end_time: ts(end),
        location: location.into(),
        description: description.into(),
        price,
        related_interests: interests.to_vec(),
    }
}

/// The full mocked activity calendar.
pub static ACTIVITY_CALENDAR: LazyLock<Vec<Activity>> = LazyLock::new(|| {
    use Interest::*;
    vec![
        activity(
            "event-0610-01",
            "Robotics Lab Open House",
            "2025-06-10 10:00",
            "2025-06-10 12:00",
            "Tinker Quarter",
            "Indoor tour of the city robotics lab with live demos.",
            25.0,
            &[Technology],
        ),
        activity(
            "event-0610-02",
            "Sunset Salsa Social",
            "2025-06-10 19:00",
            "2025-06-10 22:00",
            "Riverside Plaza",
            "Open-air dance social on the riverside plaza, beginners welcome.",
            15.0,
            &[Dancing, Music],
        ),
        activity(
            "event-0610-03",
            "Night Market Tasting",
            "2025-06-10 18:00",
            "2025-06-10 20:00",
            "Lantern Street",
            "Outdoor street-food crawl through the lantern-lit night market.",
            30.0,
            &[Food],
        ),
        activity(
            "event-0611-01",
            "Modern Art Museum Tour",
            "2025-06-11 09:30",
            "2025-06-11 11:30",
            "Museum District",
            "Guided indoor tour of the modern art wing.",
            22.0,
            &[Art],
        ),
        activity(
            "event-0611-02",
            "Synth Workshop",
            "2025-06-11 14:00",
            "2025-06-11 17:00",
            "Tinker Quarter",
            "Hands-on indoor workshop building a small synthesizer.",
            45.0,
            &[Technology, Music],
        ),
        activity(
            "event-0611-03",
            "Botanical Garden Walk",
            "2025-06-11 16:00",
            "2025-06-11 18:00",
            "North Gardens",
            "Outdoor guided walk through the botanical garden terraces.",
            12.0,
            &[Nature],
        ),
        activity(
            "event-0612-01",
            "Street Mural Safari",
            "2025-06-12 10:00",
            "2025-06-12 12:30",
            "Old Town",
            "Outdoor walking tour of the old town's street murals.",
            18.0,
            &[Art],
        ),
        activity(
            "event-0612-02",
            "Chocolate Making Class",
            "2025-06-12 14:00",
            "2025-06-12 16:00",
            "Cocoa House",
            "Indoor chocolate-making class with tastings.",
            40.0,
            &[Food],
        ),
        activity(
            "event-0613-01",
            "Retro Gaming Expo",
            "2025-06-13 11:00",
            "2025-06-13 15:00",
            "Convention Hall",
            "Indoor expo of playable retro computers and consoles.",
            28.0,
            &[Technology],
        ),
        activity(
            "event-0613-02",
            "Tango Under the Stars",
            "2025-06-13 20:00",
            "2025-06-13 23:00",
            "Riverside Plaza",
            "Outdoor evening tango with a live orchestra.",
            20.0,
            &[Dancing, Music],
        ),
        activity(
            "event-0614-01",
            "Ridge Trail Hike",
            "2025-06-14 08:00",
            "2025-06-14 12:00",
            "East Ridge",
            "Outdoor hike along the ridge trail with panoramic views.",
            10.0,
            &[Nature],
        ),
        activity(
            "event-0614-02",
            "Jazz Cellar Session",
            "2025-06-14 19:00",
            "2025-06-14 22:00",
            "Basement 42",
            "Intimate indoor jazz session in a cellar club.",
            35.0,
            &[Music],
        ),
        activity(
            "event-0615-01",
            "Maker Faire Finale",
            "2025-06-15 10:00",
            "2025-06-15 16:00",
            "Convention Hall",
            "Indoor maker fair with printing, soldering, and drone cages.",
            32.0,
            &[Technology, Art],
        ),
        activity(
            "event-0615-02",
            "Farewell Food Truck Rally",
            "2025-06-15 17:00",
            "2025-06-15 21:00",
            "Harbor Park",
            "Outdoor food truck rally in the harbor park.",
            26.0,
            &[Food, Music],
        ),
    ]
});

/// The full mocked forecast.
pub static WEATHER_FORECAST: LazyLock<Vec<WeatherReport>> = LazyLock::new(|| {
    [
        ("2025-06-10", 24.0, "sunny", "Clear skies all day."),
        ("2025-06-11", 22.0, "cloudy", "Overcast but dry."),
        ("2025-06-12", 18.0, "rainy", "Steady rain from noon onward."),
        ("2025-06-13", 21.0, "sunny", "Bright with a light breeze."),
        (
            "2025-06-14",
            17.0,
            "thunderstorm",
            "Afternoon thunderstorms expected.",
        ),
        ("2025-06-15", 25.0, "sunny", "Warm and clear."),
    ]
    .into_iter()
    .map(|(date, temperature_celsius, condition, description)| WeatherReport {
        date: day(date),
        temperature_celsius,
        condition: condition.into(),
        description: description.into(),
    })
    .collect()
});

/// Activities starting on the given date.
pub fn activities_on(date: NaiveDate) -> Vec<Activity> {
    ACTIVITY_CALENDAR
        .iter()
        .filter(|a| a.date() == date)
        .cloned()
        .collect()
}

/// Valid activity ids for the given date.
pub fn activity_ids_on(date: NaiveDate) -> HashSet<String> {
    ACTIVITY_CALENDAR
        .iter()
        .filter(|a| a.date() == date)
        .map(|a| a.activity_id.clone())
        .collect()
}

/// Forecast for the given date, when the calendar covers it.
pub fn weather_on(date: NaiveDate) -> Option<WeatherReport> {
    WEATHER_FORECAST.iter().find(|w| w.date == date).cloned()
}

/// Heuristic: does the description read as an outdoor activity?
pub fn looks_outdoor(description: &str) -> bool {
    const OUTDOOR_HINTS: &[&str] = &[
        "outdoor", "open-air", "park", "garden", "street", "ridge", "trail", "plaza", "harbor",
        "under the stars",
    ];
    let lower = description.to_ascii_lowercase();
    OUTDOOR_HINTS.iter().any(|hint| lower.contains(hint))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_covers_every_date_in_range() {
        let mut date = day(CALENDAR_START);
        while date <= day(CALENDAR_END) {
            assert!(
                !activities_on(date).is_empty(),
                "no activities on {date}"
            );
            assert!(weather_on(date).is_some(), "no forecast on {date}");
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn no_duplicate_activity_ids() {
        let ids: HashSet<_> = ACTIVITY_CALENDAR.iter().map(|a| &a.activity_id).collect();
        assert_eq!(ids.len(), ACTIVITY_CALENDAR.len());
    }

    #[test]
    fn ids_match_their_dates() {
        let ids = activity_ids_on(day("2025-06-10"));
        assert!(ids.contains("event-0610-01"));
        assert!(!ids.contains("event-0611-01"));
    }

    #[test]
    fn out_of_range_date_is_empty() {
        assert!(activities_on(day("2025-07-01")).is_empty());
        assert!(weather_on(day("2025-07-01")).is_none());
    }

    #[test]
    fn inclement_detection() {
        assert!(weather_on(day("2025-06-12")).unwrap().is_inclement());
        assert!(!weather_on(day("2025-06-10")).unwrap().is_inclement());
    }

    #[test]
    fn outdoor_heuristic() {
        assert!(looks_outdoor("Open-air dance social on the riverside plaza"));
        assert!(looks_outdoor("Outdoor hike along the ridge trail"));
        assert!(!looks_outdoor("Indoor tour of the city robotics lab"));
    }
}
