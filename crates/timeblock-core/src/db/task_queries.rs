//! Task CRUD operations and queries.
//!
//! Every write runs in one transaction and checks the affected dates for
//! overlapping scheduled tasks before committing. Returning early drops the
//! transaction, which rolls everything back.

use std::collections::{BTreeMap, HashSet};

use jiff::{
    civil::{Date, DateTime},
    Timestamp,
};
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, ScheduleError},
    models::{Category, Day, Outcome, Task, TaskStatus},
    params::{PostponeTask, TaskTimeUpdate},
};

const TASK_COLUMNS: &str = "id, description, category, scheduled_date, scheduled_start, scheduled_end, status, outcome, postponed_from, created_at";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (description, category, scheduled_date, scheduled_start, scheduled_end, status, outcome, postponed_from, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const UPDATE_TASK_SQL: &str = "UPDATE tasks SET description = ?1, category = ?2, scheduled_date = ?3, scheduled_start = ?4, scheduled_end = ?5 WHERE id = ?6";
const UPDATE_STATUS_SQL: &str = "UPDATE tasks SET status = ?1 WHERE id = ?2";
const UPDATE_OUTCOME_SQL: &str = "UPDATE tasks SET outcome = ?1 WHERE id = ?2";
const UPDATE_DESCRIPTION_SQL: &str = "UPDATE tasks SET description = ?1 WHERE id = ?2";
const UPDATE_TIMES_SQL: &str =
    "UPDATE tasks SET scheduled_start = ?1, scheduled_end = ?2 WHERE id = ?3";

fn select_by_id_sql() -> String {
    format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1")
}

fn select_scheduled_on_date_sql() -> String {
    format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE scheduled_date = ?1 AND status = 'scheduled' ORDER BY scheduled_start, id"
    )
}

fn select_range_sql() -> String {
    format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE scheduled_date BETWEEN ?1 AND ?2 ORDER BY scheduled_date, scheduled_start, id"
    )
}

fn conversion_error(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}

/// Helper function to construct a Task from a database row
fn build_task_from_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let category_str: String = row.get(2)?;
    let category = category_str
        .parse::<Category>()
        .map_err(|_| conversion_error(2, format!("Invalid category: {category_str}")))?;

    let date_str: String = row.get(3)?;
    let scheduled_date = date_str
        .parse::<Date>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    let status_str: String = row.get(6)?;
    let status = status_str
        .parse::<TaskStatus>()
        .map_err(|_| conversion_error(6, format!("Invalid status: {status_str}")))?;

    let outcome = row
        .get::<_, Option<String>>(7)?
        .map(|s| {
            s.parse::<Outcome>()
                .map_err(|_| conversion_error(7, format!("Invalid outcome: {s}")))
        })
        .transpose()?;

    Ok(Task {
        id: row.get::<_, i64>(0)? as u64,
        description: row.get(1)?,
        category,
        scheduled_date,
        scheduled_start: row.get(4)?,
        scheduled_end: row.get(5)?,
        status,
        outcome,
        postponed_from: row.get::<_, Option<i64>>(8)?.map(|id| id as u64),
        created_at: row
            .get::<_, String>(9)?
            .parse::<Timestamp>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?,
    })
}

fn fetch_task(conn: &Connection, id: u64) -> Result<Option<Task>> {
    conn.query_row(&select_by_id_sql(), params![id as i64], build_task_from_row)
        .optional()
        .db_context("Failed to load task")
}

fn require_task(conn: &Connection, id: u64) -> Result<Task> {
    fetch_task(conn, id)?.ok_or(ScheduleError::TaskNotFound { id })
}

fn insert_task(conn: &Connection, task: &Task) -> Result<Task> {
    conn.execute(
        INSERT_TASK_SQL,
        params![
            task.description,
            task.category.as_str(),
            task.scheduled_date.to_string(),
            task.scheduled_start,
            task.scheduled_end,
            task.status.as_str(),
            task.outcome.map(|o| o.as_str()),
            task.postponed_from.map(|id| id as i64),
            task.created_at.to_string(),
        ],
    )
    .db_context("Failed to insert task")?;

    Ok(Task {
        id: conn.last_insert_rowid() as u64,
        ..task.clone()
    })
}

/// Scheduled tasks of `date`, leaving out the ids in `excluded`.
fn load_scheduled_day(conn: &Connection, date: Date, excluded: &HashSet<u64>) -> Result<Day> {
    let mut stmt = conn
        .prepare(&select_scheduled_on_date_sql())
        .db_context("Failed to prepare day query")?;
    let tasks = stmt
        .query_map(params![date.to_string()], build_task_from_row)
        .db_context("Failed to query day")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read day")?;

    let mut day = Day::new(date);
    for task in tasks.into_iter().filter(|t| !excluded.contains(&t.id)) {
        day.insert(task)?;
    }
    Ok(day)
}

/// Fails with `Overlap` if `candidates` clash with each other or with the
/// stored scheduled tasks of their dates.
///
/// Stored rows for candidates that already have an id are ignored, so a
/// batch may swap or shift its own tasks freely.
fn ensure_no_overlap(conn: &Connection, candidates: &[Task]) -> Result<()> {
    let excluded: HashSet<u64> = candidates
        .iter()
        .map(|t| t.id)
        .filter(|&id| id != 0)
        .collect();

    let mut by_date: BTreeMap<Date, Vec<&Task>> = BTreeMap::new();
    for task in candidates.iter().filter(|t| t.is_scheduled()) {
        by_date.entry(task.scheduled_date).or_default().push(task);
    }

    for (date, tasks) in by_date {
        let mut day = load_scheduled_day(conn, date, &excluded)?;
        for task in tasks {
            day.insert(task.clone())?;
        }
    }
    Ok(())
}

impl super::Database {
    /// Inserts a new task after checking it against the tasks of its date.
    pub fn create_task(&mut self, task: &Task) -> Result<Task> {
        self.create_tasks(std::slice::from_ref(task))
            .map(|mut created| created.remove(0))
    }

    /// Inserts all tasks or none of them.
    pub fn create_tasks(&mut self, tasks: &[Task]) -> Result<Vec<Task>> {
        for task in tasks {
            task.validate()?;
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let fresh: Vec<Task> = tasks.iter().map(|t| Task { id: 0, ..t.clone() }).collect();
        ensure_no_overlap(&tx, &fresh)?;

        let created = fresh
            .iter()
            .map(|task| insert_task(&tx, task))
            .collect::<Result<Vec<_>>>()?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(created)
    }

    pub fn get_task(&self, id: u64) -> Result<Option<Task>> {
        fetch_task(&self.connection, id)
    }

    /// Tasks dated between `start` and `end` inclusive, ordered by date,
    /// then start time.
    pub fn list_tasks_by_date_range(&self, start: Date, end: Date) -> Result<Vec<Task>> {
        let mut stmt = self
            .connection
            .prepare(&select_range_sql())
            .db_context("Failed to prepare range query")?;
        let tasks = stmt
            .query_map(
                params![start.to_string(), end.to_string()],
                build_task_from_row,
            )
            .db_context("Failed to query tasks")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read tasks")?;
        Ok(tasks)
    }

    pub fn cancel_task(&mut self, id: u64) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut task = require_task(&tx, id)?;
        task.cancel()?;
        tx.execute(UPDATE_STATUS_SQL, params![task.status.as_str(), id as i64])
            .db_context("Failed to cancel task")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Records an outcome once the task's window has passed at `now`.
    pub fn set_task_outcome(&mut self, id: u64, outcome: Outcome, now: DateTime) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut task = require_task(&tx, id)?;
        task.set_outcome(outcome, now)?;
        tx.execute(UPDATE_OUTCOME_SQL, params![outcome.as_str(), id as i64])
            .db_context("Failed to set outcome")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Closes the task and inserts its replacement in one transaction.
    ///
    /// Returns `(original, replacement)`.
    pub fn postpone_task(&mut self, params: &PostponeTask) -> Result<(Task, Task)> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut original = require_task(&tx, params.id)?;
        let replacement = original.postpone(
            &params.scheduled_date,
            &params.scheduled_start,
            &params.scheduled_end,
        )?;

        tx.execute(
            UPDATE_STATUS_SQL,
            params![original.status.as_str(), original.id as i64],
        )
        .db_context("Failed to postpone task")?;

        ensure_no_overlap(&tx, std::slice::from_ref(&replacement))?;
        let replacement = insert_task(&tx, &replacement)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok((original, replacement))
    }

    /// Replaces the description, category, date and times of a stored task.
    ///
    /// Status and outcome only change through `cancel_task`, `postpone_task`
    /// and `set_task_outcome`; a task whose status or outcome differs from
    /// the stored row is rejected.
    pub fn update_task(&mut self, task: &Task) -> Result<Task> {
        task.validate()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let stored = require_task(&tx, task.id)?;
        if stored.status != task.status || stored.outcome != task.outcome {
            return Err(ScheduleError::InvalidTransition {
                id: stored.id,
                status: stored.status.as_str().to_string(),
                action: "change status or outcome of",
            });
        }

        ensure_no_overlap(&tx, std::slice::from_ref(task))?;
        tx.execute(
            UPDATE_TASK_SQL,
            params![
                task.description,
                task.category.as_str(),
                task.scheduled_date.to_string(),
                task.scheduled_start,
                task.scheduled_end,
                task.id as i64,
            ],
        )
        .db_context("Failed to update task")?;
        let updated = require_task(&tx, task.id)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(updated)
    }

    pub fn update_task_description(&mut self, id: u64, description: &str) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut task = require_task(&tx, id)?;
        task.set_description(description)?;
        tx.execute(UPDATE_DESCRIPTION_SQL, params![task.description, id as i64])
            .db_context("Failed to update description")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Moves several tasks at once; all moves apply or none do.
    ///
    /// The final arrangement is what gets checked, so tasks in the batch may
    /// trade places.
    pub fn batch_update_task_times(&mut self, updates: &[TaskTimeUpdate]) -> Result<Vec<Task>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut moved = Vec::with_capacity(updates.len());
        for update in updates {
            let mut task = require_task(&tx, update.id)?;
            task.reschedule(&update.scheduled_start, &update.scheduled_end)?;
            moved.push(task);
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = moved.iter().find(|t| !seen.insert(t.id)) {
            return Err(ScheduleError::invalid_input("id")
                .with_reason(format!("task {} appears more than once", duplicate.id)));
        }

        ensure_no_overlap(&tx, &moved)?;
        for task in &moved {
            tx.execute(
                UPDATE_TIMES_SQL,
                params![task.scheduled_start, task.scheduled_end, task.id as i64],
            )
            .db_context("Failed to update task times")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(moved)
    }
}
