use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use thiserror::Error;

use crate::error::PlannerError;
use crate::models::{CycleRecord, Event, EventDraft, NewCycle, Priority, Task, TaskChanges, TaskDraft};
use crate::projection::DateRange;
use crate::store::{Store, TaskDateField};

/// Title of the event recorded alongside every tracked cycle
pub const CYCLE_EVENT_TITLE: &str = "Menstrual Cycle";
pub const CYCLE_EVENT_CATEGORY: &str = "Health";

const TASK_COLUMNS: &str =
    "id, owner, title, description, priority, due_date, category, completed, created_at, completed_at";
const EVENT_COLUMNS: &str = "id, owner, title, date, category, description, created_at";
const CYCLE_COLUMNS: &str = "id, owner, last_date, cycle_length, period_length, next_date, \
     fertility_start, fertility_end, tracked_at";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        tracing::debug!(path = %db_path.display(), "opened database");

        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// Private in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                owner           TEXT NOT NULL,
                title           TEXT NOT NULL,
                description     TEXT,
                priority        TEXT NOT NULL,
                due_date        TEXT,
                category        TEXT NOT NULL DEFAULT 'General',
                completed       INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL,
                completed_at    TEXT
            );

            CREATE TABLE IF NOT EXISTS events (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                owner           TEXT NOT NULL,
                title           TEXT NOT NULL,
                date            TEXT NOT NULL,
                category        TEXT NOT NULL,
                description     TEXT,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cycles (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                owner           TEXT NOT NULL,
                last_date       TEXT NOT NULL,
                cycle_length    INTEGER NOT NULL,
                period_length   INTEGER NOT NULL DEFAULT 5,
                next_date       TEXT NOT NULL,
                fertility_start TEXT NOT NULL,
                fertility_end   TEXT NOT NULL,
                tracked_at      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_owner_due_date ON tasks(owner, due_date);
            CREATE INDEX IF NOT EXISTS idx_tasks_owner_completed ON tasks(owner, completed);
            CREATE INDEX IF NOT EXISTS idx_events_owner_date ON events(owner, date);
            CREATE INDEX IF NOT EXISTS idx_cycles_owner_next_date ON cycles(owner, next_date);",
        )?;
        Ok(())
    }

    /// Helper function to map a row to a Task
    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        Ok(Task {
            id: row.get(0)?,
            owner: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            priority: Priority::parse(&row.get::<_, String>(4)?),
            due_date: row.get(5)?,
            category: row.get(6)?,
            completed: row.get::<_, i64>(7)? != 0,
            created_at: row.get(8)?,
            completed_at: row.get(9)?,
        })
    }

    fn row_to_event(row: &rusqlite::Row) -> Result<Event, rusqlite::Error> {
        Ok(Event {
            id: row.get(0)?,
            owner: row.get(1)?,
            title: row.get(2)?,
            date: row.get(3)?,
            category: row.get(4)?,
            description: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn row_to_cycle(row: &rusqlite::Row) -> Result<CycleRecord, rusqlite::Error> {
        Ok(CycleRecord {
            id: row.get(0)?,
            owner: row.get(1)?,
            last_date: row.get(2)?,
            cycle_length: row.get(3)?,
            period_length: row.get(4)?,
            next_date: row.get(5)?,
            fertility_start: row.get(6)?,
            fertility_end: row.get(7)?,
            tracked_at: row.get(8)?,
        })
    }

    /// Get a single task by id, scoped to its owner
    pub fn get_task(&self, owner: &str, id: i64) -> Result<Task, PlannerError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE id = ?1 AND owner = ?2",
            TASK_COLUMNS
        ))?;
        stmt.query_row(rusqlite::params![id, owner], Self::row_to_task)
            .optional()?
            .ok_or_else(|| PlannerError::task_not_found(id))
    }

    fn get_event(&self, owner: &str, id: i64) -> Result<Event, PlannerError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events WHERE id = ?1 AND owner = ?2",
            EVENT_COLUMNS
        ))?;
        stmt.query_row(rusqlite::params![id, owner], Self::row_to_event)
            .optional()?
            .ok_or_else(|| PlannerError::event_not_found(id))
    }
}

impl Store for Database {
    fn find_tasks(&self, owner: &str) -> Result<Vec<Task>, PlannerError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE owner = ?1 ORDER BY id ASC",
            TASK_COLUMNS
        ))?;
        let tasks = stmt
            .query_map(rusqlite::params![owner], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn find_tasks_in_range(
        &self,
        owner: &str,
        field: TaskDateField,
        range: &DateRange,
    ) -> Result<Vec<Task>, PlannerError> {
        // Timestamps are stored as "YYYY-MM-DD HH:MM:SS..." so a text comparison
        // against bare dates keeps half-open semantics for both columns
        let column = match field {
            TaskDateField::DueDate => "due_date",
            TaskDateField::CompletedAt => "completed_at",
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE owner = ?1 AND {col} >= ?2 AND {col} < ?3 ORDER BY id ASC",
            TASK_COLUMNS,
            col = column
        ))?;
        let tasks = stmt
            .query_map(
                rusqlite::params![owner, range.start(), range.end()],
                Self::row_to_task,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn find_events(&self, owner: &str, sorted_by_date: bool) -> Result<Vec<Event>, PlannerError> {
        let order = if sorted_by_date { "date ASC, id ASC" } else { "id ASC" };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events WHERE owner = ?1 ORDER BY {}",
            EVENT_COLUMNS, order
        ))?;
        let events = stmt
            .query_map(rusqlite::params![owner], Self::row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn find_events_in_range(&self, owner: &str, range: &DateRange) -> Result<Vec<Event>, PlannerError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM events WHERE owner = ?1 AND date >= ?2 AND date < ?3 ORDER BY id ASC",
            EVENT_COLUMNS
        ))?;
        let events = stmt
            .query_map(
                rusqlite::params![owner, range.start(), range.end()],
                Self::row_to_event,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn find_latest_cycle(&self, owner: &str) -> Result<Option<CycleRecord>, PlannerError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM cycles WHERE owner = ?1 ORDER BY id DESC LIMIT 1",
            CYCLE_COLUMNS
        ))?;
        let cycle = stmt
            .query_row(rusqlite::params![owner], Self::row_to_cycle)
            .optional()?;
        Ok(cycle)
    }

    fn find_cycles(&self, owner: &str) -> Result<Vec<CycleRecord>, PlannerError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM cycles WHERE owner = ?1 ORDER BY last_date DESC, id DESC",
            CYCLE_COLUMNS
        ))?;
        let cycles = stmt
            .query_map(rusqlite::params![owner], Self::row_to_cycle)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cycles)
    }

    fn insert_task(&self, owner: &str, draft: &TaskDraft, now: DateTime<Utc>) -> Result<Task, PlannerError> {
        self.conn.execute(
            "INSERT INTO tasks (owner, title, description, priority, due_date, category, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
            rusqlite::params![
                owner,
                draft.title,
                draft.description,
                draft.priority.as_str(),
                draft.due_date,
                draft.category,
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(owner, task_id = id, priority = %draft.priority, "task created");

        Ok(Task {
            id,
            owner: owner.to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            due_date: draft.due_date,
            category: draft.category.clone(),
            completed: false,
            created_at: now,
            completed_at: None,
        })
    }

    fn update_task(&self, owner: &str, id: i64, changes: &TaskChanges) -> Result<Task, PlannerError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut task = self.get_task(owner, id)?;
        changes.apply(&mut task);
        tx.execute(
            "UPDATE tasks SET title = ?1, description = ?2, priority = ?3, due_date = ?4, category = ?5
             WHERE id = ?6 AND owner = ?7",
            rusqlite::params![
                task.title,
                task.description,
                task.priority.as_str(),
                task.due_date,
                task.category,
                id,
                owner
            ],
        )?;
        tx.commit()?;
        tracing::info!(owner, task_id = id, "task updated");
        Ok(task)
    }

    fn complete_task(&self, owner: &str, id: i64, now: DateTime<Utc>) -> Result<Task, PlannerError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET completed = 1, completed_at = ?1 WHERE id = ?2 AND owner = ?3",
            rusqlite::params![now, id, owner],
        )?;
        if changed == 0 {
            return Err(PlannerError::task_not_found(id));
        }
        tracing::info!(owner, task_id = id, "task completed");
        self.get_task(owner, id)
    }

    fn delete_task(&self, owner: &str, id: i64) -> Result<(), PlannerError> {
        let deleted = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner = ?2",
            rusqlite::params![id, owner],
        )?;
        if deleted == 0 {
            return Err(PlannerError::task_not_found(id));
        }
        tracing::info!(owner, task_id = id, "task deleted");
        Ok(())
    }

    fn insert_event(&self, owner: &str, draft: &EventDraft, now: DateTime<Utc>) -> Result<Event, PlannerError> {
        self.conn.execute(
            "INSERT INTO events (owner, title, date, category, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                owner,
                draft.title,
                draft.date,
                draft.category,
                draft.description,
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(owner, event_id = id, category = %draft.category, "event created");
        self.get_event(owner, id)
    }

    fn delete_event(&self, owner: &str, id: i64) -> Result<(), PlannerError> {
        let deleted = self.conn.execute(
            "DELETE FROM events WHERE id = ?1 AND owner = ?2",
            rusqlite::params![id, owner],
        )?;
        if deleted == 0 {
            return Err(PlannerError::event_not_found(id));
        }
        tracing::info!(owner, event_id = id, "event deleted");
        Ok(())
    }

    fn insert_cycle(&self, owner: &str, cycle: &NewCycle, now: DateTime<Utc>) -> Result<CycleRecord, PlannerError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO cycles (owner, last_date, cycle_length, period_length, next_date,
                                 fertility_start, fertility_end, tracked_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                owner,
                cycle.last_date,
                cycle.cycle_length,
                cycle.period_length,
                cycle.next_date,
                cycle.fertility_start,
                cycle.fertility_end,
                now
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO events (owner, title, date, category, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                owner,
                CYCLE_EVENT_TITLE,
                cycle.next_date,
                CYCLE_EVENT_CATEGORY,
                format!("Expected menstrual cycle (Duration: {} days)", cycle.period_length),
                now
            ],
        )?;
        tx.commit()?;
        tracing::info!(owner, cycle_id = id, next_date = %cycle.next_date, "cycle tracked");

        Ok(CycleRecord {
            id,
            owner: owner.to_string(),
            last_date: cycle.last_date,
            cycle_length: cycle.cycle_length,
            period_length: cycle.period_length,
            next_date: cycle.next_date,
            fertility_start: cycle.fertility_start,
            fertility_end: cycle.fertility_end,
            tracked_at: now,
        })
    }

    fn delete_owner_data(&self, owner: &str) -> Result<usize, PlannerError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        for table in ["tasks", "events", "cycles"] {
            removed += tx.execute(
                &format!("DELETE FROM {} WHERE owner = ?1", table),
                rusqlite::params![owner],
            )?;
        }
        tx.commit()?;
        tracing::info!(owner, removed, "owner data deleted");
        Ok(removed)
    }
}
