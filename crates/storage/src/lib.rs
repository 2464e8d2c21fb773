//! SQLite-backed trace storage for Waypoint agent runs.
//!
//! This crate persists the trace of every agent loop run — the complete
//! record of model messages, dispatched tool calls, observations, and run
//! lifecycle events. Every run is queryable after the fact, enabling
//! "why did it do that?" debugging of the THOUGHT/ACTION/OBSERVATION cycle.
//!
//! # Core concepts
//!
//! ## TraceStore
//!
//! The [`TraceStore`] is the primary interface for persistence. It wraps a
//! SQLite database and provides methods to append events and query run
//! history.
//!
//! ## Event
//!
//! An [`Event`] represents something that happened during a run: a unique
//! ID, the owning [`RunId`], a timestamp, and an [`EventKind`] describing
//! what happened (messages, tool calls, observations, run start/end).
//!
//! ## RunId
//!
//! A [`RunId`] is a UUID identifying one loop run. It displays as a string
//! and parses back, enabling CLI commands like `waypoint logs --run abc123`.
//!
//! # Example
//!
//! ```no_run
//! use storage::{Event, EventKind, Role, RunId, TraceStore};
//!
//! let store = TraceStore::open("trace.db")?;
//!
//! let run_id = RunId::new();
//! store.append(&Event::new(run_id, EventKind::RunStart))?;
//! store.append(&Event::message(run_id, Role::Assistant, "THOUGHT: ..."))?;
//! store.append(&Event::new(
//!     run_id,
//!     EventKind::RunEnd {
//!         status: "completed".into(),
//!         steps: 3,
//!     },
//! ))?;
//!
//! for event in store.load_run(run_id)? {
//!     println!("{}: {:?}", event.timestamp, event.kind);
//! }
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod event;
mod store;

pub use error::{Error, Result};
pub use event::{Event, EventKind, Role, RunId};
pub use store::{RunSummary, TraceStore};
