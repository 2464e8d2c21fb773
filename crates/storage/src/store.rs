//! SQLite trace store implementation.

use crate::{Event, EventKind, Result, RunId};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::path::Path;

/// SQLite-backed trace store.
pub struct TraceStore {
    conn: Connection,
}

/// Summary of a stored run, for listings.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub id: RunId,
    pub started_at: DateTime<Utc>,
    pub event_count: usize,
    /// Final status ("completed", "budget_exhausted"), if the run ended.
    pub status: Option<String>,
}

impl TraceStore {
    /// Open or create a trace store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory trace store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                run_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                kind TEXT NOT NULL,
                data TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_events_run
                ON events(run_id, timestamp);
            "#,
        )?;
        Ok(())
    }

    /// Append an event to the store.
    pub fn append(&self, event: &Event) -> Result<()> {
        self.conn.execute(
            "INSERT INTO events (id, run_id, timestamp, kind, data) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.id.to_string(),
                event.run_id.to_string(),
                event.timestamp.to_rfc3339(),
                event.kind.name(),
                serde_json::to_string(&event.kind)?,
            ],
        )?;
        Ok(())
    }

    /// Load all events for a run, ordered by timestamp.
    pub fn load_run(&self, run_id: RunId) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, timestamp, data FROM events
             WHERE run_id = ?1 ORDER BY timestamp",
        )?;

        let events = stmt
            .query_map([run_id.to_string()], |row| {
                let id: String = row.get(0)?;
                let run_id: String = row.get(1)?;
                let timestamp: String = row.get(2)?;
                let data: String = row.get(3)?;
                Ok((id, run_id, timestamp, data))
            })?
            .filter_map(|r| r.ok())
            .filter_map(|(id, run_id, timestamp, data)| {
                Some(Event {
                    id: id.parse().ok()?,
                    run_id: RunId(run_id.parse().ok()?),
                    timestamp: timestamp.parse().ok()?,
                    kind: serde_json::from_str(&data).ok()?,
                })
            })
            .collect();

        Ok(events)
    }

    /// List all stored runs, most recent first.
    pub fn list_runs(&self) -> Result<Vec<RunSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, MIN(timestamp), COUNT(*) FROM events
             GROUP BY run_id ORDER BY MIN(timestamp) DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let run_id: String = row.get(0)?;
                let started_at: String = row.get(1)?;
                let event_count: usize = row.get::<_, i64>(2)? as usize;
                Ok((run_id, started_at, event_count))
            })?
            .filter_map(|r| r.ok())
            .collect::<Vec<_>>();

        let mut summaries = Vec::with_capacity(rows.len());
        for (run_id, started_at, event_count) in rows {
            let Some(id) = run_id.parse().ok().map(RunId) else {
                continue;
            };
            let Some(started_at) = started_at.parse().ok() else {
                continue;
            };
            summaries.push(RunSummary {
                id,
                started_at,
                event_count,
                status: self.run_status(id)?,
            });
        }

        Ok(summaries)
    }

    fn run_status(&self, run_id: RunId) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT data FROM events WHERE run_id = ?1 AND kind = 'run_end' LIMIT 1",
        )?;
        let data: Option<String> = stmt
            .query_map([run_id.to_string()], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .next();

        Ok(data.and_then(|d| {
            let kind: EventKind = serde_json::from_str(&d).ok()?;
            match kind {
                EventKind::RunEnd { status, .. } => Some(status),
                _ => None,
            }
        }))
    }
}
