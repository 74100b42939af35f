//! Storage seam used by the planner and the CLI.
//!
//! [`Repository`] is the only persistence interface the engine depends on.
//! [`SqliteRepository`] implements it on top of [`Database`](crate::db::Database).

use async_trait::async_trait;
use jiff::civil::{Date, DateTime};

use crate::{
    error::Result,
    models::{Outcome, Task},
    params::{PostponeTask, TaskTimeUpdate},
};

mod sqlite;

pub use sqlite::SqliteRepository;

/// Async task storage.
///
/// Writes that could create overlapping scheduled tasks fail with
/// [`ScheduleError::Overlap`](crate::ScheduleError::Overlap) and leave the
/// store unchanged. Unknown ids fail with
/// [`ScheduleError::TaskNotFound`](crate::ScheduleError::TaskNotFound).
#[async_trait]
pub trait Repository: Send + Sync {
    async fn create_task(&self, task: &Task) -> Result<Task>;

    /// Stores all tasks or none; returns them with their new ids.
    async fn create_tasks(&self, tasks: &[Task]) -> Result<Vec<Task>>;

    async fn get_task(&self, id: u64) -> Result<Option<Task>>;

    async fn cancel_task(&self, id: u64) -> Result<Task>;

    async fn set_task_outcome(&self, id: u64, outcome: Outcome, now: DateTime) -> Result<Task>;

    /// Tasks from `start` to `end` inclusive, ordered by date then start time.
    async fn list_tasks_by_date_range(&self, start: Date, end: Date) -> Result<Vec<Task>>;

    /// Returns `(original, replacement)`.
    async fn postpone_task(&self, params: &PostponeTask) -> Result<(Task, Task)>;

    /// Rewrites description, category, date and times; a changed status or
    /// outcome fails with `InvalidTransition`.
    async fn update_task(&self, task: &Task) -> Result<Task>;

    async fn update_task_description(&self, id: u64, description: &str) -> Result<Task>;

    /// Applies every time change or none.
    async fn batch_update_task_times(&self, updates: &[TaskTimeUpdate]) -> Result<Vec<Task>>;
}
