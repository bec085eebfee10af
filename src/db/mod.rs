//! Database module - SQLite storage for workout days

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, ToSql, params};
use tracing::{debug, info, warn};

use crate::models::{DATE_FORMAT, DateRange, Entry, WorkoutDay, WorkoutSet};

/// Default and maximum page size for recent days
pub const DEFAULT_RECENT_LIMIT: usize = 30;
pub const MAX_RECENT_LIMIT: usize = 100;

/// Source of a user's day records.
///
/// Returned days are in no particular order.
pub trait DaySource {
    fn list_days(&self, user_id: &str, range: Option<&DateRange>) -> Result<Vec<WorkoutDay>>;
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("cannot open database {}", path))?;
        let db = Self { conn };
        db.init_schema()?;
        info!("Opened database {}", path);
        Ok(db)
    }

    /// Private database for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        // One row per user per day; entries stored as a JSON document
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS workout_days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                workout_type TEXT NOT NULL DEFAULT '',
                entries TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_workout_days_user_date
                ON workout_days (user_id, date);",
        )?;
        Ok(())
    }

    /// Insert or replace the day for this user; out-of-limit days are rejected
    pub fn upsert_day(&self, user_id: &str, day: &WorkoutDay) -> Result<()> {
        day.validate()
            .with_context(|| format!("cannot save {}", day.date_label()))?;
        let entries = serde_json::to_string(&day.entries)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO workout_days (user_id, date, workout_type, entries, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT (user_id, date) DO UPDATE SET
                workout_type = excluded.workout_type,
                entries = excluded.entries,
                updated_at = excluded.updated_at",
            params![user_id, day.date_label(), day.workout_type.trim(), entries, now],
        )?;
        debug!("Saved {} for {} ({} sets)", day.date_label(), user_id, day.set_count());
        Ok(())
    }

    /// Stored day, or an empty one if nothing was logged yet
    pub fn get_day(&self, user_id: &str, date: NaiveDate) -> Result<WorkoutDay> {
        let label = date.format(DATE_FORMAT).to_string();
        let row = self
            .conn
            .query_row(
                "SELECT date, workout_type, entries FROM workout_days WHERE user_id = ?1 AND date = ?2",
                params![user_id, label],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
            )
            .optional()?;

        match row {
            Some((date, workout_type, entries)) => parse_day(&date, workout_type, &entries),
            None => Ok(WorkoutDay::empty(date)),
        }
    }

    /// Newest days first; `limit` clamped to 1..=100
    pub fn list_recent_days(&self, user_id: &str, limit: usize) -> Result<Vec<WorkoutDay>> {
        let limit = limit.clamp(1, MAX_RECENT_LIMIT) as i64;
        self.query_days(
            "SELECT date, workout_type, entries FROM workout_days
             WHERE user_id = ?1 ORDER BY date DESC LIMIT ?2",
            &[&user_id, &limit],
        )
    }

    /// Append a set to the named exercise of a day, creating both as needed
    pub fn log_set(
        &self,
        user_id: &str,
        date: NaiveDate,
        exercise_name: &str,
        set: WorkoutSet,
    ) -> Result<WorkoutDay> {
        let name = exercise_name.trim();
        anyhow::ensure!(!name.is_empty(), "exercise name is empty");

        let mut day = self.get_day(user_id, date)?;
        if let Some(entry) = day.entries.iter_mut().find(|e| e.exercise_name.trim() == name) {
            entry.sets.push(set);
        } else {
            let mut entry = Entry::new(name);
            entry.sets.push(set);
            day.entries.push(entry);
        }

        self.upsert_day(user_id, &day)?;
        Ok(day)
    }

    /// Run a day query, skipping rows that no longer parse
    fn query_days(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Vec<WorkoutDay>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(args, |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut days = Vec::with_capacity(rows.len());
        for (date, workout_type, entries) in rows {
            match parse_day(&date, workout_type, &entries) {
                Ok(day) => days.push(day),
                Err(e) => warn!("Skipping unreadable day {}: {:#}", date, e),
            }
        }
        Ok(days)
    }
}

impl DaySource for Database {
    fn list_days(&self, user_id: &str, range: Option<&DateRange>) -> Result<Vec<WorkoutDay>> {
        // Ordered by date so e1RM ties resolve to the earliest day for this backend
        let days = match range {
            Some(r) => self.query_days(
                "SELECT date, workout_type, entries FROM workout_days
                 WHERE user_id = ?1 AND date >= ?2 AND date <= ?3 ORDER BY date",
                &[&user_id, &r.from, &r.to],
            )?,
            None => self.query_days(
                "SELECT date, workout_type, entries FROM workout_days
                 WHERE user_id = ?1 ORDER BY date",
                &[&user_id],
            )?,
        };
        debug!("Loaded {} days for {}", days.len(), user_id);
        Ok(days)
    }
}

fn parse_day(date: &str, workout_type: String, entries: &str) -> Result<WorkoutDay> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .with_context(|| format!("bad stored date {:?}", date))?;
    let entries: Vec<Entry> = serde_json::from_str(entries).context("bad stored entries")?;
    Ok(WorkoutDay {
        date,
        workout_type,
        entries,
    })
}
