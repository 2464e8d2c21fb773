//! AgentsVille travel-planning domain.
//!
//! The demo domain for the Waypoint engine: data models for vacations and
//! itineraries, a mock activity calendar and weather forecast for the
//! fictional city of AgentsVille, the tool set exposed to the revision
//! agent, and the single-call itinerary planner.
//!
//! The mocked data covers 2025-06-10 through 2025-06-15; vacations must
//! fall inside that window.

pub mod fixtures;
pub mod models;
mod planner;
pub mod prompts;
pub mod tools;

pub use models::{
    Activity, DayPlan, Interest, TravelItinerary, VacationInfo, ValidationError,
};
pub use planner::{PlannerError, generate_itinerary};
pub use tools::register_all;
