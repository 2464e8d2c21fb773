//! Action directive parsing.
//!
//! A model reply carries at most one action directive: the literal marker
//! `ACTION:` followed by a JSON object with exactly two top-level keys,
//! `tool_name` and `arguments`. Commentary before and after the directive
//! is allowed and ignored.
//!
//! Extraction is a marker scan plus an incremental brace-depth walk to the
//! matching close brace. The scan does not understand string-escaped
//! braces; a `{` or `}` inside a JSON string value can fool it. Known
//! limitation, tolerable for this wire format — a miscaptured span fails
//! JSON decoding and is reported back to the model as an observation.

use crate::tools::ToolCall;
use thiserror::Error;

/// The literal token that introduces an action directive.
pub const ACTION_MARKER: &str = "ACTION:";

/// Errors from action extraction.
///
/// All variants are recoverable: the loop reports them back to the model
/// as an observation and retries, consuming one step of budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The marker token was not found in the reply.
    #[error("no {ACTION_MARKER} directive found in the reply")]
    NoActionMarker,

    /// An opening brace was found but never balanced.
    #[error("action directive braces never balance")]
    UnbalancedDelimiters,

    /// The captured span is not a valid tool call object.
    #[error("malformed action payload: {0}")]
    MalformedPayload(String),
}

/// Strategy for extracting a tool call from free-form model text.
///
/// The loop controller only sees this interface, so the matching algorithm
/// can be swapped (e.g. for strict structured-output modes) without
/// touching the loop.
pub trait ActionParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ToolCall, ParseError>;
}

/// Marker-token parser: `ACTION:` followed by a balanced JSON object.
#[derive(Debug, Clone)]
pub struct MarkerParser {
    marker: String,
}

impl MarkerParser {
    pub fn new() -> Self {
        Self {
            marker: ACTION_MARKER.to_string(),
        }
    }

    /// Use a different marker token.
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for MarkerParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionParser for MarkerParser {
    fn parse(&self, text: &str) -> Result<ToolCall, ParseError> {
        let start = text.find(&self.marker).ok_or(ParseError::NoActionMarker)?;
        let tail = &text[start + self.marker.len()..];

        let span = first_json_object(tail)?;
        let call: ToolCall = serde_json::from_str(span)
            .map_err(|e| ParseError::MalformedPayload(e.to_string()))?;
        Ok(call)
    }
}

/// Extract the first balanced `{...}` span from `text`.
///
/// Shared with callers that expect a bare JSON document without a marker
/// (e.g. the itinerary planner's reply).
pub fn first_json_object(text: &str) -> Result<&str, ParseError> {
    let open = text.find('{').ok_or(ParseError::UnbalancedDelimiters)?;

    let mut depth = 0usize;
    for (offset, byte) in text[open..].bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[open..open + offset + 1]);
                }
            }
            _ => {}
        }
    }

    Err(ParseError::UnbalancedDelimiters)
}
