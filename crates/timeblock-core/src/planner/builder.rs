//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use super::{Clock, Planner, SystemClock};
use crate::{
    error::{Result, ScheduleError},
    llm::LlmClient,
    repository::{Repository, SqliteRepository},
    scheduler::Scheduler,
};

/// Builder for creating and configuring Planner instances.
///
/// Only the LLM client is required. Without a repository the builder opens
/// a [`SqliteRepository`] at the configured path, or at
/// `$XDG_DATA_HOME/timeblock/timeblock.db`. The scheduler defaults to
/// Monday to Friday, 09:00 to 17:00, and the clock to the system clock.
#[derive(Default)]
pub struct PlannerBuilder {
    llm: Option<Arc<dyn LlmClient>>,
    repository: Option<Arc<dyn Repository>>,
    database_path: Option<PathBuf>,
    scheduler: Option<Scheduler>,
    clock: Option<Arc<dyn Clock>>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_llm<L: LlmClient + 'static>(self, llm: L) -> Self {
        self.with_llm_client(Arc::new(llm))
    }

    pub fn with_llm_client(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_repository(mut self, repository: Arc<dyn Repository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Sets a custom database file path; ignored when a repository is set.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::Configuration` without an LLM client, and
    /// file system or database errors if the default repository cannot be
    /// opened.
    pub async fn build(self) -> Result<Planner> {
        let llm = self.llm.ok_or_else(|| ScheduleError::Configuration {
            message: "Planner requires an LLM client".to_string(),
        })?;

        let repository: Arc<dyn Repository> = match (self.repository, self.database_path) {
            (Some(repository), _) => repository,
            (None, Some(path)) => Arc::new(SqliteRepository::open(path).await?),
            (None, None) => Arc::new(SqliteRepository::open_default().await?),
        };

        Ok(Planner::new(
            llm,
            repository,
            self.scheduler.unwrap_or_default(),
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        ))
    }
}
