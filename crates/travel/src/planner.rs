//! Initial itinerary generation.
//!
//! One model call drafts the whole itinerary; the reply is expected to be
//! a bare JSON document, extracted with the same balanced-object scan the
//! action parser uses and validated before use. Refinement is the revision
//! agent's job.

use crate::models::{TravelItinerary, VacationInfo, ValidationError};
use crate::prompts;
use engine::parser::first_json_object;
use engine::{ChatRequest, Message, ModelBackend, ModelError};
use thiserror::Error;
use tracing::info;

/// Errors from itinerary generation.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The model call failed.
    #[error("model backend: {0}")]
    Model(#[from] ModelError),

    /// The reply did not contain a parseable itinerary document.
    #[error("malformed itinerary reply: {0}")]
    Malformed(String),

    /// The itinerary parsed but violates the vacation constraints.
    #[error("invalid itinerary: {0}")]
    Invalid(#[from] ValidationError),
}

/// Draft an itinerary for the given vacation with a single model call.
pub async fn generate_itinerary<B: ModelBackend>(
    backend: &B,
    vacation: &VacationInfo,
) -> Result<TravelItinerary, PlannerError> {
    let task = prompts::planner_task(vacation);
    let response = backend
        .chat(ChatRequest {
            messages: &[Message::user(task)],
            system: Some(prompts::PLANNER_SYSTEM_PROMPT),
        })
        .await?;

    let span = first_json_object(&response.content)
        .map_err(|e| PlannerError::Malformed(e.to_string()))?;
    let itinerary: TravelItinerary =
        serde_json::from_str(span).map_err(|e| PlannerError::Malformed(e.to_string()))?;
    itinerary.validate()?;

    info!(
        days = itinerary.days.len(),
        total_cost = itinerary.total_cost,
        "drafted itinerary"
    );
    Ok(itinerary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{itinerary, vacation};
    use engine::{ChatResponse, Usage};

    struct CannedBackend {
        reply: String,
    }

    impl ModelBackend for CannedBackend {
        async fn chat(
            &self,
            _request: ChatRequest<'_>,
        ) -> Result<ChatResponse, ModelError> {
            Ok(ChatResponse {
                content: self.reply.clone(),
                usage: Usage::default(),
            })
        }
    }

    #[tokio::test]
    async fn parses_itinerary_with_surrounding_commentary() {
        let backend = CannedBackend {
            reply: format!("Here is your plan:\n{}\nEnjoy!", itinerary()),
        };

        let itin = generate_itinerary(&backend, &vacation()).await.unwrap();
        assert_eq!(itin.city, "AgentsVille");
        assert_eq!(itin.days.len(), 2);
    }

    #[tokio::test]
    async fn reply_without_json_is_malformed() {
        let backend = CannedBackend {
            reply: "I cannot plan this trip.".into(),
        };
        let err = generate_itinerary(&backend, &vacation()).await.unwrap_err();
        assert!(matches!(err, PlannerError::Malformed(_)));
    }

    #[tokio::test]
    async fn wrong_city_is_invalid() {
        let mut doc = itinerary();
        doc["city"] = serde_json::json!("Gotham");
        let backend = CannedBackend {
            reply: doc.to_string(),
        };
        let err = generate_itinerary(&backend, &vacation()).await.unwrap_err();
        assert!(matches!(err, PlannerError::Invalid(_)));
    }
}
