//! SQLite-backed interval storage.
//!
//! One row per interval in the `interval` table. Identifiers are SQLite
//! rowids, so they are assigned by the database and never reused.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Category, Interval, IntervalId, IntervalState};
use crate::{Error, Result};

use super::Repository;

const SELECT_COLUMNS: &str =
    "SELECT id, start_time, planned_duration, actual_duration, category, state FROM interval";

/// Raw column values before category/state decoding.
struct IntervalRow {
    id: IntervalId,
    start_time: Option<DateTime<Utc>>,
    planned_secs: i64,
    actual_secs: i64,
    category: String,
    state: i64,
}

impl IntervalRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let start_time = row
            .get::<_, Option<String>>(1)?
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))
            })
            .transpose()?;

        Ok(Self {
            id: row.get(0)?,
            start_time,
            planned_secs: row.get(2)?,
            actual_secs: row.get(3)?,
            category: row.get(4)?,
            state: row.get(5)?,
        })
    }

    fn into_interval(self) -> Result<Interval> {
        Ok(Interval {
            id: self.id,
            start_time: self.start_time,
            planned_duration: Duration::from_secs(self.planned_secs.max(0) as u64),
            actual_duration: Duration::from_secs(self.actual_secs.max(0) as u64),
            category: self.category.parse::<Category>()?,
            state: IntervalState::try_from(self.state)?,
        })
    }
}

pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Opens (or creates) the database file and applies the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        tracing::info!("Opened interval database at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS interval (
                id               INTEGER PRIMARY KEY,
                start_time       TEXT,
                planned_duration INTEGER NOT NULL DEFAULT 0,
                actual_duration  INTEGER NOT NULL DEFAULT 0,
                category         TEXT NOT NULL,
                state            INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_interval_category ON interval(category);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Repository for SqliteRepository {
    fn create(&self, interval: &Interval) -> Result<IntervalId> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO interval (start_time, planned_duration, actual_duration, category, state)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                interval.start_time.map(|t| t.to_rfc3339()),
                interval.planned_duration.as_secs() as i64,
                interval.actual_duration.as_secs() as i64,
                interval.category.as_str(),
                interval.state.code(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::debug!("Created interval {} ({})", id, interval.category.as_str());
        Ok(id)
    }

    fn update(&self, interval: &Interval) -> Result<()> {
        if interval.id <= 0 {
            return Err(Error::InvalidId(interval.id));
        }

        let affected = self.conn().execute(
            "UPDATE interval SET start_time = ?1, actual_duration = ?2, state = ?3 WHERE id = ?4",
            params![
                interval.start_time.map(|t| t.to_rfc3339()),
                interval.actual_duration.as_secs() as i64,
                interval.state.code(),
                interval.id,
            ],
        )?;

        if affected == 0 {
            return Err(Error::NotFound(interval.id));
        }

        Ok(())
    }

    fn by_id(&self, id: IntervalId) -> Result<Interval> {
        if id <= 0 {
            return Err(Error::InvalidId(id));
        }

        let row = self
            .conn()
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                IntervalRow::from_row,
            )
            .optional()?;

        row.ok_or(Error::NotFound(id))?.into_interval()
    }

    fn last(&self) -> Result<Interval> {
        let row = self
            .conn()
            .query_row(
                &format!("{} ORDER BY id DESC LIMIT 1", SELECT_COLUMNS),
                [],
                IntervalRow::from_row,
            )
            .optional()?;

        row.ok_or(Error::NoIntervals)?.into_interval()
    }

    fn breaks(&self, n: usize) -> Result<Vec<Interval>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{} WHERE category IN ('ShortBreak', 'LongBreak') ORDER BY id DESC LIMIT ?1",
            SELECT_COLUMNS
        ))?;

        let rows = stmt
            .query_map(params![n as i64], IntervalRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(IntervalRow::into_interval).collect()
    }

    fn record_progress(&self, id: IntervalId, actual_duration: Duration) -> Result<Interval> {
        if id <= 0 {
            return Err(Error::InvalidId(id));
        }

        let conn = self.conn();
        let affected = conn.execute(
            "UPDATE interval SET actual_duration = ?1 WHERE id = ?2 AND state = ?3",
            params![
                actual_duration.as_secs() as i64,
                id,
                IntervalState::Running.code(),
            ],
        )?;
        if affected == 0 {
            tracing::debug!("Interval {} no longer running; progress not stored", id);
        }

        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                IntervalRow::from_row,
            )
            .optional()?;

        row.ok_or(Error::NotFound(id))?.into_interval()
    }
}
