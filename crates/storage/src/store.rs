//! SQLite audit store implementation.

use crate::{AuditEvent, AuditKind, Error, Result, SessionId};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

/// Summary of one audit session, as shown by `pavefleet audit sessions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub check_count: usize,
    pub denied_count: usize,
}

/// SQLite-backed audit store.
pub struct AuditStore {
    conn: Connection,
}

impl AuditStore {
    /// Open or create an audit store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory audit store (useful for testing).
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
                session_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                kind TEXT NOT NULL,
                allowed INTEGER,
                data TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_events_session
                ON events(session_id, timestamp);
            "#,
        )?;
        Ok(())
    }

    /// Append an event to the store.
    pub fn append(&self, event: &AuditEvent) -> Result<()> {
        self.conn.execute(
            "INSERT INTO events (id, session_id, timestamp, kind, allowed, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.id.to_string(),
                event.session_id.to_string(),
                // Fixed-width so lexical order matches time order.
                event.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                event.kind.name(),
                event.kind.allowed(),
                serde_json::to_string(&event.kind)?,
            ],
        )?;
        Ok(())
    }

    /// Load all events for a session, ordered by timestamp.
    pub fn load_session(&self, session_id: SessionId) -> Result<Vec<AuditEvent>> {
        self.load_events(session_id, None)
    }

    /// Load events for a session, optionally restricted to one kind
    /// (`capability_check`, `panel_check`, ...).
    pub fn load_events(
        &self,
        session_id: SessionId,
        kind: Option<&str>,
    ) -> Result<Vec<AuditEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, timestamp, data FROM events
             WHERE session_id = ?1 AND (?2 IS NULL OR kind = ?2)
             ORDER BY timestamp, rowid",
        )?;

        let rows = stmt.query_map(params![session_id.to_string(), kind], raw_event)?;
        rows.map(|row| decode(row?)).collect()
    }

    /// Most recent denied checks across all sessions, newest first.
    pub fn recent_denials(&self, limit: usize) -> Result<Vec<AuditEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, timestamp, data FROM events
             WHERE allowed = 0
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map([limit], raw_event)?;
        rows.map(|row| decode(row?)).collect()
    }

    /// List all sessions, newest first.
    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUMMARY_SELECT} GROUP BY session_id ORDER BY started_at DESC"
        ))?;

        let rows = stmt.query_map([], raw_summary)?;
        rows.map(|row| decode_summary(row?)).collect()
    }

    /// Summary of a single session.
    pub fn session_summary(&self, session_id: SessionId) -> Result<SessionSummary> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUMMARY_SELECT} WHERE session_id = ?1 GROUP BY session_id"
        ))?;

        let raw = stmt
            .query_row([session_id.to_string()], raw_summary)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("session {session_id}")))?;
        decode_summary(raw)
    }
}

const SUMMARY_SELECT: &str = "SELECT session_id,
        MIN(timestamp) AS started_at,
        MAX(CASE WHEN kind = 'session_end' THEN timestamp END),
        COUNT(allowed),
        COALESCE(SUM(CASE WHEN allowed = 0 THEN 1 ELSE 0 END), 0)
     FROM events";

type RawEvent = (String, String, String, String);
type RawSummary = (String, String, Option<String>, i64, i64);

fn raw_event(row: &Row<'_>) -> rusqlite::Result<RawEvent> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn raw_summary(row: &Row<'_>) -> rusqlite::Result<RawSummary> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode((id, session_id, timestamp, data): RawEvent) -> Result<AuditEvent> {
    let corrupt = |reason: String| Error::Corrupt {
        id: id.clone(),
        reason,
    };

    Ok(AuditEvent {
        id: id.parse().map_err(|e: uuid::Error| corrupt(e.to_string()))?,
        session_id: session_id
            .parse()
            .map_err(|e: uuid::Error| corrupt(e.to_string()))?,
        timestamp: parse_time(&timestamp).map_err(corrupt)?,
        kind: serde_json::from_str::<AuditKind>(&data)?,
    })
}

fn decode_summary(
    (session_id, started_at, ended_at, checks, denied): RawSummary,
) -> Result<SessionSummary> {
    let corrupt = |reason: String| Error::Corrupt {
        id: session_id.clone(),
        reason,
    };

    Ok(SessionSummary {
        id: session_id
            .parse()
            .map_err(|e: uuid::Error| corrupt(e.to_string()))?,
        started_at: parse_time(&started_at).map_err(corrupt)?,
        ended_at: ended_at
            .as_deref()
            .map(parse_time)
            .transpose()
            .map_err(corrupt)?,
        check_count: usize::try_from(checks).unwrap_or_default(),
        denied_count: usize::try_from(denied).unwrap_or_default(),
    })
}

fn parse_time(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| e.to_string())
}
