//! Waypoint engine — the bounded ReAct tool-dispatch loop.
//!
//! This crate provides the core runtime for agent loops that alternate
//! model calls with deterministic tool execution: a model reply is parsed
//! for an `ACTION:` directive, the named tool is dispatched, and the result
//! is fed back into the conversation as an observation, until a designated
//! final-answer tool is dispatched or the step budget runs out.
//!
//! # Overview
//!
//! The engine is organized around these concepts:
//!
//! - **ModelBackend**: a trait abstracting the completion endpoint
//!   (OpenAI-compatible HTTP backend included).
//! - **ActionParser**: extracts one structured tool call from free-form
//!   model text.
//! - **Tool / ToolRegistry**: a fixed name-keyed table of tool handlers,
//!   populated once at startup.
//! - **AgentLoop**: the loop controller — owns the conversation, the
//!   working artifact, the step budget, and termination.
//!
//! # Example
//!
//! ```ignore
//! use engine::{AgentLoop, OpenAiBackend, Seed, ToolRegistry};
//! use policy::Policy;
//! use storage::TraceStore;
//!
//! # async fn example() -> engine::Result<()> {
//! let backend = OpenAiBackend::builder("sk-...", "gpt-4o-mini").build();
//! let mut registry = ToolRegistry::new();
//! // registry.register(...)?;
//!
//! let agent = AgentLoop::builder(backend, registry, TraceStore::in_memory()?)
//!     .policy(Policy::default())
//!     .final_tool("final_answer_tool")
//!     .validator_tool("run_evals_tool")
//!     .max_steps(6)
//!     .build()?;
//!
//! let outcome = agent.run(Seed::new("system prompt", "task", serde_json::json!({}))).await?;
//! println!("{:?}", outcome.status);
//! # Ok(())
//! # }
//! ```

mod agent;
mod dispatch;
mod error;
pub mod model;
pub mod parser;
pub mod tools;

pub use agent::{AgentLoop, AgentLoopBuilder, DEFAULT_MAX_STEPS, RunOutcome, RunStatus, Seed, Turn};
pub use dispatch::{Dispatch, Observation, dispatch};
pub use error::{Error, Result};
pub use model::{ChatRequest, ChatResponse, Message, ModelBackend, ModelError, OpenAiBackend, Role, Usage};
pub use parser::{ACTION_MARKER, ActionParser, MarkerParser, ParseError};
pub use tools::{Tool, ToolCall, ToolError, ToolOutput, ToolRegistry, ToolSpec, required_str};
