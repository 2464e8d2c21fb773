//! Event types for the run trace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// The kind of event that occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// A message was added to the conversation.
    Message { role: Role, content: String },
    /// An action directive was parsed and a tool dispatched.
    ToolCall {
        name: String,
        arguments: serde_json::Value,
    },
    /// A dispatch produced an observation.
    Observation {
        /// Name of the tool, when one was identified.
        tool: Option<String>,
        /// Whether the dispatch succeeded.
        ok: bool,
        /// Observation payload (result value or failure description).
        output: serde_json::Value,
    },
    /// Run started.
    RunStart,
    /// Run ended.
    RunEnd { status: String, steps: usize },
}

impl EventKind {
    /// Stable name used for storage and filtering.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Message { .. } => "message",
            EventKind::ToolCall { .. } => "tool_call",
            EventKind::Observation { .. } => "observation",
            EventKind::RunStart => "run_start",
            EventKind::RunEnd { .. } => "run_end",
        }
    }
}

/// An event in the run trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub run_id: RunId,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

impl Event {
    pub fn new(run_id: RunId, kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_id,
            timestamp: Utc::now(),
            kind,
        }
    }

    pub fn message(run_id: RunId, role: Role, content: impl Into<String>) -> Self {
        Self::new(
            run_id,
            EventKind::Message {
                role,
                content: content.into(),
            },
        )
    }

    pub fn tool_call(run_id: RunId, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self::new(
            run_id,
            EventKind::ToolCall {
                name: name.into(),
                arguments,
            },
        )
    }

    pub fn observation(
        run_id: RunId,
        tool: Option<String>,
        ok: bool,
        output: serde_json::Value,
    ) -> Self {
        Self::new(run_id, EventKind::Observation { tool, ok, output })
    }
}
