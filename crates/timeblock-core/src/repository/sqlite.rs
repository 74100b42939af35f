//! SQLite-backed repository.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jiff::civil::{Date, DateTime};
use tokio::task;

use super::Repository;
use crate::{
    config::default_database_path,
    db::Database,
    error::{Result, ScheduleError},
    models::{Outcome, Task},
    params::{PostponeTask, TaskTimeUpdate},
};

/// Repository that opens a fresh [`Database`] connection for every call on
/// the blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    db_path: PathBuf,
}

impl SqliteRepository {
    /// Opens the database at `path`, creating parent directories and the
    /// schema as needed.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::FileSystem` if the parent directory cannot be
    /// created and `ScheduleError::Database` if initialization fails.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ScheduleError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let repository = Self { db_path };
        repository.run(|_db| Ok(())).await?;
        Ok(repository)
    }

    /// Opens the database at the XDG default location.
    pub async fn open_default() -> Result<Self> {
        Self::open(default_database_path()?).await
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            operation(&mut db)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn create_task(&self, task: &Task) -> Result<Task> {
        let task = task.clone();
        self.run(move |db| db.create_task(&task)).await
    }

    async fn create_tasks(&self, tasks: &[Task]) -> Result<Vec<Task>> {
        let tasks = tasks.to_vec();
        self.run(move |db| db.create_tasks(&tasks)).await
    }

    async fn get_task(&self, id: u64) -> Result<Option<Task>> {
        self.run(move |db| db.get_task(id)).await
    }

    async fn cancel_task(&self, id: u64) -> Result<Task> {
        self.run(move |db| db.cancel_task(id)).await
    }

    async fn set_task_outcome(&self, id: u64, outcome: Outcome, now: DateTime) -> Result<Task> {
        self.run(move |db| db.set_task_outcome(id, outcome, now))
            .await
    }

    async fn list_tasks_by_date_range(&self, start: Date, end: Date) -> Result<Vec<Task>> {
        self.run(move |db| db.list_tasks_by_date_range(start, end))
            .await
    }

    async fn postpone_task(&self, params: &PostponeTask) -> Result<(Task, Task)> {
        let params = params.clone();
        self.run(move |db| db.postpone_task(&params)).await
    }

    async fn update_task(&self, task: &Task) -> Result<Task> {
        let task = task.clone();
        self.run(move |db| db.update_task(&task)).await
    }

    async fn update_task_description(&self, id: u64, description: &str) -> Result<Task> {
        let description = description.to_string();
        self.run(move |db| db.update_task_description(id, &description))
            .await
    }

    async fn batch_update_task_times(&self, updates: &[TaskTimeUpdate]) -> Result<Vec<Task>> {
        let updates = updates.to_vec();
        self.run(move |db| db.batch_update_task_times(&updates))
            .await
    }
}
